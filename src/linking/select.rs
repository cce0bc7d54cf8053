//! Primary/secondary selection policies.

use std::str::FromStr;

use crate::profile::Profile;

/// Which profile survives when several share a verified email.
///
/// Exactly one policy applies per deployment. Switching policies
/// mid-rollout makes the surviving profile flip between logins, so the
/// choice is configuration, not code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimarySelectionPolicy {
    /// A subject that has completed onboarding (has app metadata) stays
    /// primary; otherwise the most recently updated candidate wins and the
    /// subject is folded into it. One pair is linked per login.
    #[default]
    MostRecentlyUpdated,
    /// The oldest account (by creation time) wins; every other profile,
    /// the subject included, is folded into it in one pass.
    OldestCreated,
}

impl FromStr for PrimarySelectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "most-recently-updated" => Ok(Self::MostRecentlyUpdated),
            "oldest-created" => Ok(Self::OldestCreated),
            other => Err(format!(
                "Unknown selection policy: {other}. Expected most-recently-updated or oldest-created"
            )),
        }
    }
}

/// Outcome of selection: the surviving profile and the profiles to fold
/// into it, in link order.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// The profile that survives the merge.
    pub primary: Profile,
    /// Profiles whose identities get attached to the primary.
    pub secondaries: Vec<Profile>,
}

/// Picks the primary and the secondaries from a candidate list.
///
/// `candidates` must already be filtered by
/// [`find_link_candidates`](crate::linking::find_link_candidates); order is
/// the directory's discovery order, which breaks timestamp ties (sorts are
/// stable). Returns `None` when there are no candidates, i.e. nothing to
/// link.
#[must_use]
pub fn select_primary(
    policy: PrimarySelectionPolicy,
    subject: &Profile,
    candidates: Vec<Profile>,
) -> Option<Selection> {
    if candidates.is_empty() {
        return None;
    }
    match policy {
        PrimarySelectionPolicy::MostRecentlyUpdated => {
            if subject.has_app_metadata() {
                // Subject finished onboarding before: it stays primary and
                // absorbs the first discovered candidate. Leftover
                // candidates link on a later login.
                let secondary = candidates.into_iter().next()?;
                Some(Selection { primary: subject.clone(), secondaries: vec![secondary] })
            } else {
                let mut sorted = candidates;
                sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
                let primary = sorted.into_iter().next()?;
                Some(Selection { primary, secondaries: vec![subject.clone()] })
            }
        }
        PrimarySelectionPolicy::OldestCreated => {
            let mut all = Vec::with_capacity(candidates.len() + 1);
            all.push(subject.clone());
            all.extend(candidates);
            all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            let mut iter = all.into_iter();
            let primary = iter.next()?;
            Some(Selection { primary, secondaries: iter.collect() })
        }
    }
}
