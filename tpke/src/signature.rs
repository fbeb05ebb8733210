use std::collections::BTreeMap;

use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use num_bigint::BigInt;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::keys::PublicKey;
use crate::lagrange::{combinations_of_ids, feldman};
use crate::participant::ParticipantId;
use crate::scalar::{bigint_to_field, signed_combination_conjugate};

/// Threshold BLS signature aggregation (SPEC_FULL.md C8): given at least
/// `threshold` of `shares = { i: H2(message).sk_i }`, reconstructs
/// `scaler.H2(message).sk`, trying successive `threshold`-sized subsets of
/// the contributing participants until one subset's aggregate verifies
/// against `public_key`. The aggregate must *equal* the scaled global
/// signature rather than cancel a blinding term, so it uses the opposite
/// signed-coefficient convention from [`crate::decryption::decrypt_batch`]
/// (SPEC_FULL.md Open Question 3) — see
/// [`crate::scalar::signed_combination_conjugate`].
pub fn aggregate_and_verify<E: Pairing>(
    message: &[u8],
    shares: &BTreeMap<ParticipantId, E::G2Affine>,
    threshold: usize,
    scaler: &BigInt,
    public_key: &PublicKey<E>,
) -> Result<E::G2Affine> {
    if shares.len() < threshold {
        return Err(Error::NotEnoughShares {
            supplied: shares.len(),
            threshold,
        });
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

        let points: Vec<E::G2Affine> = subset.iter().map(|p| shares[p]).collect();
        let signature = (signed_combination_conjugate::<E::G2>(&coeffs, &points) * d_prime_field).into_affine();

        if public_key.verify_signature(message, signature) {
            debug!(subset = ?indices, "signature subset validated");
            return Ok(signature);
        }
        warn!(subset = ?indices, "signature subset failed validity check, retrying with another subset");
    }

    Err(Error::AggregationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Bls12_381;
    use ark_ec::{CurveGroup, Group};
    use ark_ff::UniformRand;
    use ark_std::test_rng;

    type E = Bls12_381;

    fn toy_committee(
        n: u32,
        t: usize,
        rng: &mut (impl ark_std::rand::RngCore + ark_std::rand::CryptoRng),
    ) -> (PublicKey<E>, BigInt, BTreeMap<ParticipantId, <E as Pairing>::ScalarField>) {
        let poly = crate::poly::Poly::<<E as Pairing>::ScalarField>::random(t, rng);
        let g1 = <E as Pairing>::G1Affine::generator();
        let pk = PublicKey::<E>((g1 * poly.constant_term()).into_affine());
        let scaler = crate::lagrange::scaler(n, t);
        let sks = ParticipantId::range(n)
            .map(|id| {
                let x = <E as Pairing>::ScalarField::from(id.one_indexed());
                (id, poly.evaluate(x))
            })
            .collect();
        (pk, scaler, sks)
    }

    #[test]
    fn aggregation_over_two_subsets_agrees() {
        let rng = &mut test_rng();
        let n = 7u32;
        let t = 5usize;
        let (pk, scaler, sks) = toy_committee(n, t, rng);
        let message = b"pizza pizza pizza pizza pizza";

        let all_shares: BTreeMap<_, _> = sks
            .iter()
            .map(|(id, sk)| (*id, crate::keys::PrivateKey::<E>::from_shares([*sk]).sign_share(message)))
            .collect();

        let first_five: BTreeMap<_, _> = all_shares
            .iter()
            .filter(|(id, _)| id.one_indexed() <= 5)
            .map(|(id, s)| (*id, *s))
            .collect();
        let last_five: BTreeMap<_, _> = all_shares
            .iter()
            .filter(|(id, _)| id.one_indexed() >= 3)
            .map(|(id, s)| (*id, *s))
            .collect();

        let sig_a = aggregate_and_verify(message, &first_five, t, &scaler, &pk).unwrap();
        let sig_b = aggregate_and_verify(message, &last_five, t, &scaler, &pk).unwrap();
        assert_eq!(sig_a, sig_b);
        assert!(pk.verify_signature(message, sig_a));
    }

    #[test]
    fn bad_signature_share_is_tolerated() {
        let rng = &mut test_rng();
        let n = 7u32;
        let t = 5usize;
        let (pk, scaler, sks) = toy_committee(n, t, rng);
        let message = b"pizza pizza pizza pizza pizza";
        let mut shares: BTreeMap<_, _> = sks
            .iter()
            .map(|(id, sk)| (*id, crate::keys::PrivateKey::<E>::from_shares([*sk]).sign_share(message)))
            .collect();
        let corrupt_id = ParticipantId::new(2).unwrap();
        shares.insert(corrupt_id, (<E as Pairing>::G2::generator() * <E as Pairing>::ScalarField::rand(rng)).into_affine());

        let signature = aggregate_and_verify(message, &shares, t, &scaler, &pk).unwrap();
        assert!(pk.verify_signature(message, signature));
    }

    #[test]
    fn below_threshold_is_rejected() {
        let rng = &mut test_rng();
        let n = 7u32;
        let t = 5usize;
        let (pk, scaler, sks) = toy_committee(n, t, rng);
        let message = b"pizza pizza pizza pizza pizza";
        let shares: BTreeMap<_, _> = sks
            .iter()
            .filter(|(id, _)| id.one_indexed() <= 2)
            .map(|(id, sk)| (*id, crate::keys::PrivateKey::<E>::from_shares([*sk]).sign_share(message)))
            .collect();
        let err = aggregate_and_verify(message, &shares, t, &scaler, &pk).unwrap_err();
        assert!(matches!(err, Error::NotEnoughShares { .. }));
    }
}
