//! Hash-to-curve for BLS signature hashing, using the domain separation
//! tag the BLS draft assigns to the proof-of-possession signature variant.
//!
//! The teacher crate carried its own `miracl_core`-backed implementation
//! (needed because its pinned arkworks generation had no hash-to-curve
//! support); on the newer arkworks generation this crate standardizes on,
//! `ark_ec::hashing` supplies an IETF-conformant SSWU hasher directly, so
//! no extra curve-hashing dependency is needed.

use ark_bls12_381::{g2, G2Projective};
use ark_ec::hashing::{
    curve_maps::wb::WBMap, map_to_curve_hasher::MapToCurveBasedHasher, HashToCurve,
};
use ark_ff::field_hashers::DefaultFieldHasher;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use sha2::Sha256;

/// `BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_`, as named in SPEC_FULL.md
/// §6 (External Interfaces).
pub const SIG_DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

type G2Hasher = MapToCurveBasedHasher<G2Projective, DefaultFieldHasher<Sha256, 128>, WBMap<g2::Config>>;

/// `H2(message)`: hashes an arbitrary byte string into `G2` under the
/// BLS proof-of-possession domain separation tag.
///
/// The hash-to-curve map itself is only defined over the concrete
/// `ark-bls12-381` curve; every type this crate parameterizes over
/// (`E: Pairing`) is instantiated with that curve in practice, so — exactly
/// as the teacher's `hash_to_g2<T: CanonicalDeserialize>` bridges its
/// concrete `htp_bls12381_g2` output into a generic target type — this
/// serializes the concrete point and deserializes it into the caller's `G`.
pub fn hash_to_g2<G: CanonicalDeserialize>(message: &[u8]) -> G {
    let hasher = G2Hasher::new(SIG_DST).expect("BLS signature DST is a valid hash-to-curve domain");
    let point = hasher
        .hash(message)
        .expect("hashing an arbitrary byte string to G2 does not fail");
    let mut bytes = Vec::new();
    point
        .serialize_compressed(&mut bytes)
        .expect("serialization of a fixed-size point cannot fail");
    G::deserialize_compressed(&bytes[..])
        .expect("a compressed bls12-381 G2 point deserializes into any G2Affine representation of the same curve")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::G2Affine;

    #[test]
    fn hash_to_g2_is_deterministic() {
        assert_eq!(
            hash_to_g2::<G2Affine>(b"pizza pizza pizza"),
            hash_to_g2::<G2Affine>(b"pizza pizza pizza")
        );
    }

    #[test]
    fn hash_to_g2_is_sensitive_to_input() {
        assert_ne!(hash_to_g2::<G2Affine>(b"pizza"), hash_to_g2::<G2Affine>(b"not pizza"));
    }
}
