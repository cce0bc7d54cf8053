//! Adapter implementations of the port traits.
//!
//! `live` adapters talk to real services over HTTP; `memory` adapters keep
//! everything in-process for tests and offline simulation.

pub mod live;
pub mod memory;
