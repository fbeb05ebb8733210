//! Scalar & group helpers (C1): conversions between the plain integers the
//! Lagrange helper works with and the curve's scalar field, plus the
//! signed-integer group scalar multiplication the combiners are built on.

use ark_ec::CurveGroup;
use ark_ff::PrimeField;
use num_bigint::{BigInt, Sign};

/// Reduces a (possibly negative, possibly huge) integer into the scalar
/// field, mod the field's order. Used to turn the scaler and Lagrange
/// cofactors — plain integers by construction — into values group scalar
/// multiplication accepts.
pub fn bigint_to_field<F: PrimeField>(n: &BigInt) -> F {
    let (sign, magnitude) = n.to_bytes_le();
    let value = F::from_le_bytes_mod_order(&magnitude);
    if sign == Sign::Minus {
        -value
    } else {
        value
    }
}

pub fn i128_to_field<F: PrimeField>(n: i128) -> F {
    bigint_to_field(&BigInt::from(n))
}

/// Computes `sum_r (-coeff_r) * points_r` where `coeff_r` are small signed
/// integers (Lagrange cofactors): accumulates `|c_r| . share`, negating
/// terms whose `c_r > 0`. This is the convention threshold *decryption*
/// needs (SPEC_FULL.md Open Question 3, `tpke.go`'s `parallelDecrypt`):
/// `R_k = d' . sum_r (-c_r) . share_{r,k}` cancels the ciphertext's
/// `+rho.pk` term. BLS signature aggregation needs the opposite sign —
/// see [`signed_combination_conjugate`].
pub fn signed_combination<G: CurveGroup>(coeffs: &[i128], points: &[G::Affine]) -> G {
    signed_combination_with_convention(coeffs, points, true)
}

/// Computes `sum_r coeff_r * points_r` — the `+c_r` convention (negate
/// terms whose `c_r < 0`) that BLS signature aggregation needs
/// (`signature.go`'s `aggregateShares`): unlike decryption, the aggregate
/// must *equal* `scaler . sk . H2(m)`, not cancel a `rho.pk` term, so the
/// sign of the Lagrange cofactor is applied directly rather than negated.
pub fn signed_combination_conjugate<G: CurveGroup>(coeffs: &[i128], points: &[G::Affine]) -> G {
    signed_combination_with_convention(coeffs, points, false)
}

fn signed_combination_with_convention<G: CurveGroup>(
    coeffs: &[i128],
    points: &[G::Affine],
    negate_positive: bool,
) -> G {
    assert_eq!(coeffs.len(), points.len());
    let mut acc = G::zero();
    for (&c, p) in coeffs.iter().zip(points.iter()) {
        let scalar = i128_to_field::<G::ScalarField>(c.unsigned_abs() as i128);
        let term = *p * scalar;
        let negate = if negate_positive { c > 0 } else { c < 0 };
        if negate {
            acc -= term;
        } else {
            acc += term;
        }
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Fr;

    #[test]
    fn negative_bigint_round_trips_as_field_negation() {
        let positive: Fr = bigint_to_field(&BigInt::from(42));
        let negative: Fr = bigint_to_field(&BigInt::from(-42));
        assert_eq!(positive, -negative);
    }
}
