use std::collections::BTreeMap;

use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use num_bigint::BigInt;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::ciphertext::CipherText;
use crate::error::{Error, Result};
use crate::keys::PublicKey;
use crate::lagrange::{combinations_of_ids, feldman};
use crate::participant::ParticipantId;
use crate::scalar::{bigint_to_field, signed_combination};

/// `bigR . sk_i`, one holder's contribution toward decrypting a single
/// ciphertext.
pub type DecryptionShare<E> = <E as Pairing>::G1Affine;

/// Threshold decryption of a batch of ciphertexts (SPEC_FULL.md C7).
///
/// `shares` maps each contributing participant to the decryption shares it
/// produced, one per ciphertext in `ciphertexts`, aligned by index.
/// Iteration order of `shares` is never relied on: indices are collected
/// and sorted before building any Vandermonde matrix.
///
/// Tries successive `threshold`-sized subsets of the contributing
/// participants (via [`combinations_of_ids`]) until one subset's
/// reconstruction passes the pairing validity check for every ciphertext
/// in the batch, recovering that subset's fault tolerance: up to
/// `shares.len() - threshold` bad shares are tolerated.
pub fn decrypt_batch<E: Pairing>(
    ciphertexts: &[CipherText<E>],
    shares: &BTreeMap<ParticipantId, Vec<DecryptionShare<E>>>,
    threshold: usize,
    scaler: &BigInt,
    public_key: &PublicKey<E>,
) -> Result<Vec<E::G1Affine>> {
    if shares.len() < threshold {
        return Err(Error::NotEnoughShares {
            supplied: shares.len(),
            threshold,
        });
    }
    for ct in ciphertexts {
        ct.verify()?;
    }

    let ids: Vec<ParticipantId> = shares.keys().copied().collect();
    for subset in combinations_of_ids(&ids, threshold) {
        let indices: Vec<u32> = subset.iter().map(|p| p.one_indexed()).collect();
        let (d, coeffs) = feldman(&indices);
        if d == 0 {
            continue;
        }
        let d_prime = scaler / BigInt::from(d);
        debug_assert_eq!(&d_prime * BigInt::from(d), scaler.clone(), "scaler must be exactly divisible by every subset determinant");
        let d_prime_field: E::ScalarField = bigint_to_field(&d_prime);

        // R_k = d' . sum_r (-c_r) . share_{r,k}; M_k = cMsg_k + R_k. The
        // validity pairing check (SPEC_FULL.md C7 step 5) is against R_k
        // itself, not the recovered plaintext M_k: e(pk,-commitment) = e(R_k,g2).
        let combined: Vec<(E::G1Affine, E::G1Affine)> = (0..ciphertexts.len())
            .into_par_iter()
            .map(|k| {
                let points: Vec<E::G1Affine> = subset.iter().map(|p| shares[p][k]).collect();
                let r = (signed_combination::<E::G1>(&coeffs, &points) * d_prime_field).into_affine();
                let m = (ciphertexts[k].c_msg.into_group() + r).into_affine();
                (r, m)
            })
            .collect();

        if validate_subset(ciphertexts, &combined, public_key) {
            debug!(subset = ?indices, "decryption subset validated");
            return Ok(combined.into_iter().map(|(_, m)| m).collect());
        }
        warn!(subset = ?indices, "decryption subset failed validity check, retrying with another subset");
    }

    Err(Error::DecryptionFailed)
}

fn validate_subset<E: Pairing>(
    ciphertexts: &[CipherText<E>],
    combined: &[(E::G1Affine, E::G1Affine)],
    public_key: &PublicKey<E>,
) -> bool {
    let g2 = E::G2Affine::generator();
    ciphertexts
        .par_iter()
        .zip(combined.par_iter())
        .all(|(ct, (r, _m))| {
            let lhs = E::pairing(public_key.0, -ct.commitment);
            let rhs = E::pairing(*r, g2);
            lhs == rhs
        })
}
