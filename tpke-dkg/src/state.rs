/// The DKG session state machine (SPEC_FULL.md §4.5):
///
/// ```text
/// Idle ──Prepare──► Prepared ──VerifyPrepare──► Ready
///                                   │
///                                (fail) ──► Aborted
/// Ready ──Reshare──► Reshared ──VerifyReshare──► Ready
/// ```
///
/// `Ready` is reentered after a successful reshare rather than modeled as
/// a distinct `Ready'`: nothing downstream of `Ready` (publishing the
/// global public key, fetching private keys, starting another reshare)
/// cares whether the current round came from `Prepare` or `Reshare`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DkgState {
    Idle,
    Prepared,
    Ready,
    Reshared,
    Aborted(String),
}

impl DkgState {
    pub fn is_ready(&self) -> bool {
        matches!(self, DkgState::Ready)
    }
}
