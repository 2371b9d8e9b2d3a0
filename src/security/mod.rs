//! Security module for MechaSqueak.
//!
//! - **Denylist**: passive monitoring of flagged identities on dispatching
//!   commands. Matches never block a command; they alert the operations
//!   channel.

pub mod denylist;

pub use denylist::{Denylist, DenylistHit};
