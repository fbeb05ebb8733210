use thiserror::Error;

/// Categorical failure reasons for the `tpke` crate.
///
/// Cryptographic invariants (pairing equalities, structural sizes) are
/// checked eagerly; any violation surfaces one of these variants rather
/// than panicking. Combiner routines (decryption, signature aggregation)
/// treat a bad share set as recoverable and only return the terminal
/// `*Failed` variant once every candidate subset has been exhausted.
#[derive(Debug, Error)]
pub enum Error {
    #[error("AES envelope was given an empty message")]
    AesEmptyMessage,

    #[error("AES envelope was given an empty ciphertext")]
    AesEmptyCiphertext,

    #[error("AES encryption failed")]
    AesEncryptFailed,

    #[error("AES decryption failed")]
    AesDecryptFailed,

    #[error("AES PKCS#7 unpadding failed")]
    AesUnpadFailed,

    #[error("fewer than the threshold number of shares were supplied ({supplied} < {threshold})")]
    NotEnoughShares { supplied: usize, threshold: usize },

    #[error("ciphertext failed its structural pairing check")]
    InvalidCiphertext,

    #[error("no subset of the supplied shares decrypted to a valid plaintext")]
    DecryptionFailed,

    #[error("no subset of the supplied signature shares aggregated to a valid signature")]
    AggregationFailed,

    #[error("PVSS commitment failed verification")]
    InvalidPvss,

    #[error("a participant's decrypted secret share failed its pairing check")]
    InvalidSecret,

    #[error(transparent)]
    Serialization(#[from] ark_serialize::SerializationError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
