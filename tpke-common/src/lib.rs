//! Identity and wire-format helpers shared by the `tpke` threshold
//! cryptography crate and the `tpke-dkg` orchestrator: per-session
//! transport keypairs and a `serde` bridge for `ark-serialize` types.

pub mod error;
pub mod keypair;
pub mod serialization;

pub use error::{Error, Result};
pub use keypair::{TransportKeypair, TransportPrivateKey, TransportPublicKey};
