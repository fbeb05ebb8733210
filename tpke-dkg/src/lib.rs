//! Dealerless distributed key generation for `tpke` committees.
//!
//! [`Dkg`] drives the `Prepare -> VerifyPrepare -> Ready` state machine
//! (and its `Reshare -> VerifyReshare -> Ready` proactive-resharing
//! counterpart) described in SPEC_FULL.md §4.5, orchestrating one
//! [`Participant`] per committee member. There is no network transport
//! here (an explicit Non-goal): this crate holds every participant's
//! local state side by side and exchanges sealed mailbox envelopes and
//! public PVSS transcripts between them directly, the way a caller
//! embedding this crate into an actual networked deployment would
//! instead ferry those same envelopes and transcripts over the wire.

pub mod dkg;
pub mod error;
pub mod participant;
pub mod state;

pub use dkg::Dkg;
pub use error::{Error, Result};
pub use participant::Participant;
pub use state::DkgState;
