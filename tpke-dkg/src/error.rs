use thiserror::Error;

/// Categorical failure reasons for a DKG session.
///
/// A session is all-or-nothing (SPEC_FULL.md §4.5): any invalid
/// commitment, any invalid pairing, any failed decrypt aborts the whole
/// session. There is no partial-retry path; the caller restarts.
#[derive(Debug, Error)]
pub enum Error {
    #[error("participant {0} published a PVSS transcript that failed verification")]
    InvalidPvss(u32),

    #[error("participant {recipient} could not validate the share sent by participant {dealer}")]
    InvalidSecret { recipient: u32, dealer: u32 },

    #[error("a resharing transcript failed VerifyRenovate against its predecessor")]
    InvalidRenovation(u32),

    #[error(transparent)]
    Tpke(#[from] tpke::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
