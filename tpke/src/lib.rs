//! Threshold public-key encryption and threshold BLS signatures over
//! BLS12-381, without a trusted dealer.
//!
//! A committee of `n` participants runs a dealerless DKG (built from the
//! PVSS transcripts in [`pvss`]) to arrive at a shared [`keys::PublicKey`]
//! and one [`keys::PrivateKey`] share per participant, such that any
//! `threshold` of them can jointly decrypt a [`ciphertext::CipherText`]
//! ([`decryption`]) or produce a valid aggregate BLS signature
//! ([`signature`]) without ever reconstructing the shared private key.
//! [`aes`] layers a hybrid envelope on top for payloads too large to
//! encode as a single curve point. Proactive resharing
//! ([`keys::Secret::renovate`], [`pvss::Pvss::verify_renovate`]) lets a
//! committee periodically refresh every share while the public key and
//! every participant's combined private key both survive unchanged.

pub mod aes;
pub mod ciphertext;
pub mod decryption;
pub mod error;
pub mod hash;
pub mod keys;
pub mod lagrange;
pub mod participant;
pub mod poly;
pub mod pvss;
pub mod scalar;
pub mod signature;

pub use ciphertext::CipherText;
pub use error::{Error, Result};
pub use keys::{PrivateKey, PublicKey, Secret};
pub use participant::ParticipantId;
pub use pvss::Pvss;
