use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{PrimeField, UniformRand, Zero};
use ark_std::rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

/// A dense univariate polynomial `f(x) = a_0 + a_1 x + ... + a_{k-1} x^{k-1}`
/// over a pairing curve's scalar field.
///
/// Coefficients are zeroized on drop since, in this crate, every `Poly`
/// that matters cryptographically is someone's secret-sharing polynomial.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poly<F> {
    coeffs: Vec<F>,
}

impl<F: Zeroize> Zeroize for Poly<F> {
    fn zeroize(&mut self) {
        for c in self.coeffs.iter_mut() {
            c.zeroize();
        }
    }
}

// `#[derive(ZeroizeOnDrop)]` on a struct holding a `Poly` field requires
// `Poly: Zeroize`, which `ark_ff` scalar field elements satisfy but `Poly`
// itself must opt into explicitly (the derive can't see through to
// `Vec<F>`'s element type). Implemented manually here rather than derived,
// mirroring the same fix applied to `SecretPolynomial` elsewhere in this
// ecosystem.
impl<F: Zeroize> Drop for Poly<F> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<F: PrimeField> Poly<F> {
    /// Samples `k` independent uniformly random coefficients, producing a
    /// degree-`(k-1)` polynomial.
    pub fn random<R: RngCore + CryptoRng>(k: usize, rng: &mut R) -> Self {
        assert!(k >= 1, "a polynomial must have at least one coefficient");
        let coeffs = (0..k).map(|_| F::rand(rng)).collect();
        Self { coeffs }
    }

    pub fn from_coeffs(coeffs: Vec<F>) -> Self {
        assert!(!coeffs.is_empty(), "a polynomial must have at least one coefficient");
        Self { coeffs }
    }

    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn coeffs(&self) -> &[F] {
        &self.coeffs
    }

    pub fn constant_term(&self) -> F {
        self.coeffs[0]
    }

    /// Horner evaluation of `f(x)`.
    pub fn evaluate(&self, x: F) -> F {
        let mut acc = F::zero();
        for c in self.coeffs.iter().rev() {
            acc = acc * x + c;
        }
        acc
    }

    /// Element-wise sum, padding the shorter operand with zero coefficients.
    pub fn add(&self, other: &Self) -> Self {
        let len = self.coeffs.len().max(other.coeffs.len());
        let coeffs = (0..len)
            .map(|i| {
                let a = self.coeffs.get(i).copied().unwrap_or_else(F::zero);
                let b = other.coeffs.get(i).copied().unwrap_or_else(F::zero);
                a + b
            })
            .collect();
        Self { coeffs }
    }

    /// Scales every coefficient by `x`.
    pub fn scale(&self, x: F) -> Self {
        Self {
            coeffs: self.coeffs.iter().map(|c| *c * x).collect(),
        }
    }

    /// Commits to this polynomial in `G1` (or any curve group whose
    /// scalar field is `F`): `A_i = a_i . g1`.
    pub fn commitment<G: CurveGroup<ScalarField = F>>(&self, generator: G) -> Commitment<G::Affine> {
        let points = self
            .coeffs
            .iter()
            .map(|c| (generator * c).into_affine())
            .collect();
        Commitment { points }
    }
}

/// A public commitment to a `Poly`: `(A_0, ..., A_{k-1})` with `A_i = a_i . g1`.
///
/// Same length as its generating polynomial by construction; broadcast
/// in the clear as part of a PVSS transcript.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commitment<A> {
    points: Vec<A>,
}

impl<A: AffineRepr> Commitment<A> {
    pub fn from_points(points: Vec<A>) -> Self {
        assert!(!points.is_empty(), "a commitment must have at least one point");
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn points(&self) -> &[A] {
        &self.points
    }

    pub fn constant_term(&self) -> A {
        self.points[0]
    }

    /// Horner evaluation of the committed polynomial at `x`, in the group.
    pub fn evaluate(&self, x: A::ScalarField) -> A {
        let mut acc = A::Group::zero();
        for p in self.points.iter().rev() {
            acc = acc * x + p;
        }
        acc.into_affine()
    }

    /// Element-wise sum, padding the shorter operand with the group identity.
    pub fn add(&self, other: &Self) -> Self {
        let len = self.points.len().max(other.points.len());
        let points = (0..len)
            .map(|i| {
                let a = self.points.get(i).copied().unwrap_or(A::zero()).into_group();
                let b = other.points.get(i).copied().unwrap_or(A::zero());
                (a + b).into_affine()
            })
            .collect();
        Self { points }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::{Fr, G1Projective};
    use ark_std::test_rng;

    #[test]
    fn commitment_consistency() {
        let rng = &mut test_rng();
        let g1 = G1Projective::rand(rng);
        for k in 1..8 {
            let poly = Poly::<Fr>::random(k, rng);
            let commitment = poly.commitment(g1);
            for _ in 0..5 {
                let x = Fr::rand(rng);
                let lhs = commitment.evaluate(x);
                let rhs = (g1 * poly.evaluate(x)).into_affine();
                assert_eq!(lhs, rhs);
            }
        }
    }

    #[test]
    fn addition_pads_shorter_operand() {
        let rng = &mut test_rng();
        let a = Poly::<Fr>::random(3, rng);
        let b = Poly::<Fr>::random(5, rng);
        let sum = a.add(&b);
        assert_eq!(sum.len(), 5);
        let x = Fr::rand(rng);
        assert_eq!(sum.evaluate(x), a.evaluate(x) + b.evaluate(x));
    }
}
