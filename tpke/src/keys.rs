use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::{UniformRand, Zero};
use ark_std::rand::{CryptoRng, RngCore};
use num_bigint::BigInt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::hash::hash_to_g2;
use crate::poly::Poly;
use crate::scalar::bigint_to_field;

/// A participant's share of the committee's secret: a degree-`(t-1)`
/// polynomial whose constant term is this participant's contribution to
/// the global private key, plus the renovation delta from its most recent
/// reshare (if any). Never serialized; zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Secret<E: Pairing> {
    poly: Poly<E::ScalarField>,
    #[zeroize(skip)]
    last_delta: Option<E::ScalarField>,
}

impl<E: Pairing> Secret<E> {
    pub fn random<R: RngCore + CryptoRng>(t: usize, rng: &mut R) -> Self {
        Self {
            poly: Poly::random(t, rng),
            last_delta: None,
        }
    }

    pub fn poly(&self) -> &Poly<E::ScalarField> {
        &self.poly
    }

    pub fn constant_term(&self) -> E::ScalarField {
        self.poly.constant_term()
    }

    /// Proactive resharing (renovation): samples one fresh `delta` and adds
    /// it to every coefficient but the constant term, which is left
    /// untouched so the global public key survives the reshare. Returns
    /// `delta`, which the caller commits to as `delta_point = delta . g1`
    /// for `VerifyRenovate` (SPEC_FULL.md C4).
    pub fn renovate<R: RngCore + CryptoRng>(&mut self, rng: &mut R) -> E::ScalarField {
        let delta = E::ScalarField::rand(rng);
        let coeffs: Vec<E::ScalarField> = self
            .poly
            .coeffs()
            .iter()
            .enumerate()
            .map(|(i, c)| if i == 0 { *c } else { *c + delta })
            .collect();
        self.poly = Poly::from_coeffs(coeffs);
        self.last_delta = Some(delta);
        delta
    }

    pub fn last_delta(&self) -> Option<E::ScalarField> {
        self.last_delta
    }
}

/// A participant's combined private key, `sk_i = sum_j f_j(i)` of the
/// shares it accepted from every dealer in a completed DKG session.
/// Replaced wholesale on a successful reshare.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey<E: Pairing>(E::ScalarField);

impl<E: Pairing> PrivateKey<E> {
    pub fn from_shares<I: IntoIterator<Item = E::ScalarField>>(shares: I) -> Self {
        Self(shares.into_iter().fold(E::ScalarField::zero(), |a, b| a + b))
    }

    pub fn as_scalar(&self) -> E::ScalarField {
        self.0
    }

    /// `H2(m) . sk_i`: this holder's share of a threshold BLS signature
    /// over `m` (SPEC_FULL.md C8).
    pub fn sign_share(&self, message: &[u8]) -> E::G2Affine {
        (hash_to_g2::<E::G2Affine>(message) * self.0).into_affine()
    }

    /// `bigR . sk_i`: this holder's share of a threshold decryption
    /// (SPEC_FULL.md C7).
    pub fn decryption_share(&self, big_r: E::G1Affine) -> E::G1Affine {
        (big_r * self.0).into_affine()
    }
}

/// The committee's global public key, `pk = scaler . sum_j A_{j,0}`.
/// Stable across reshares since it is derived only from constant-term
/// commitments, which renovation never touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey<E: Pairing>(pub E::G1Affine);

impl<E: Pairing> PublicKey<E> {
    /// Sums the constant-term commitments of every participant and scales
    /// by the committee's scaler, reduced into the scalar field.
    pub fn derive(constant_term_commitments: &[E::G1Affine], scaler: &BigInt) -> Self {
        let sum = constant_term_commitments
            .iter()
            .fold(E::G1::zero(), |acc, p| acc + p);
        let s: E::ScalarField = bigint_to_field(scaler);
        Self((sum * s).into_affine())
    }

    pub fn verify_signature(&self, message: &[u8], signature: E::G2Affine) -> bool {
        let h = hash_to_g2::<E::G2Affine>(message);
        E::pairing(self.0, h) == E::pairing(E::G1Affine::generator(), signature)
    }
}
