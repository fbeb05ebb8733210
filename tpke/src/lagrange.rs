//! Integer Lagrange interpolation helper.
//!
//! Combiners (threshold decryption, threshold signature aggregation) need
//! `f(0)` given `t` pairs `(i_r, f(i_r))`, but must avoid a field inversion
//! per call. This module builds the Vandermonde matrix for a chosen index
//! subset, extracts its determinant and first-column cofactors
//! ([`feldman`]), and precomputes a committee-wide **scaler**: an integer
//! divisible by every subset's determinant, so the public key can be
//! multiplied by the scaler once at DKG-construction time and every
//! subsequent combination uses only small signed-integer arithmetic.
//!
//! Determinants and cofactors are computed over `i128` via Laplace
//! expansion along the first column; the scaler itself is accumulated in
//! [`BigInt`] since an LCM across `C(n,t)` terms can exceed 128 bits even
//! when any individual determinant does not (see SPEC_FULL.md Design Notes
//! on wide-integer arithmetic).

use itertools::Itertools;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use crate::participant::ParticipantId;

/// Builds the `t x t` Vandermonde matrix `V[r][c] = indices[r]^c` for a
/// sorted subset of participant indices. Sorting is the caller's
/// responsibility for indices coming from nondeterministic map iteration
/// (see SPEC_FULL.md Design Notes on deterministic ordering).
fn vandermonde(indices: &[u32]) -> Vec<Vec<i128>> {
    let t = indices.len();
    indices
        .iter()
        .map(|&i| {
            let i = i as i128;
            let mut row = Vec::with_capacity(t);
            let mut pow = 1i128;
            for _ in 0..t {
                row.push(pow);
                pow *= i;
            }
            row
        })
        .collect()
}

/// Determinant of a square integer matrix via Laplace expansion along the
/// first row. Intended for the small (`t`-sized) matrices this module
/// builds; not a general-purpose linear algebra routine.
fn determinant(matrix: &[Vec<i128>]) -> i128 {
    let n = matrix.len();
    if n == 1 {
        return matrix[0][0];
    }
    if n == 2 {
        return matrix[0][0] * matrix[1][1] - matrix[0][1] * matrix[1][0];
    }
    let mut det = 0i128;
    for col in 0..n {
        let minor: Vec<Vec<i128>> = matrix[1..]
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(c, _)| *c != col)
                    .map(|(_, v)| *v)
                    .collect()
            })
            .collect();
        let sign = if col % 2 == 0 { 1 } else { -1 };
        det += sign * matrix[0][col] * determinant(&minor);
    }
    det
}

/// The minor obtained by deleting `row` and column `0`.
fn minor_drop_first_column(matrix: &[Vec<i128>], row: usize) -> Vec<Vec<i128>> {
    matrix
        .iter()
        .enumerate()
        .filter(|(r, _)| *r != row)
        .map(|(_, row)| row[1..].to_vec())
        .collect()
}

fn gcd(a: i128, b: i128) -> i128 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Extracts the determinant `d` of the Vandermonde matrix built from
/// `indices`, together with the first-column cofactors
/// `c_r = (-1)^r . det(minor deleting row r, column 0)`, after dividing
/// both by `gcd(d, c_0, ..., c_{t-1})`.
///
/// `f(0) = (1/d) . sum_r c_r . f(i_r)`: callers never invert `d` in the
/// field, they multiply group elements by these small signed integers.
pub fn feldman(indices: &[u32]) -> (i128, Vec<i128>) {
    let v = vandermonde(indices);
    let d = determinant(&v);
    let cofactors: Vec<i128> = (0..indices.len())
        .map(|r| {
            let sign = if r % 2 == 0 { 1 } else { -1 };
            sign * determinant(&minor_drop_first_column(&v, r))
        })
        .collect();

    let g = cofactors.iter().fold(d.abs(), |acc, &c| gcd(acc, c));
    let g = if g == 0 { 1 } else { g };
    (d / g, cofactors.iter().map(|c| c / g).collect())
}

/// Enumerates all `t`-sized subsets of `{1, ..., n}`, in ascending order
/// within each subset. Used by combiners retrying a different candidate
/// subset after a faulty share is detected.
pub fn combinations(n: u32, t: usize) -> impl Iterator<Item = Vec<u32>> {
    (1..=n).combinations(t)
}

pub fn combinations_of_ids(ids: &[ParticipantId], t: usize) -> impl Iterator<Item = Vec<ParticipantId>> + '_ {
    ids.iter().copied().combinations(t)
}

/// Precomputes the scaler `S = lcm_I |det V_I|` across every `t`-sized
/// index subset `I` of `{1, ..., n}`.
pub fn scaler(n: u32, t: usize) -> BigInt {
    let mut s = BigInt::from(1u32);
    for subset in combinations(n, t) {
        let v = vandermonde(&subset);
        let d = determinant(&v).abs();
        if d.is_zero() {
            continue;
        }
        s = lcm(&s, &BigInt::from(d));
    }
    s
}

fn lcm(a: &BigInt, b: &BigInt) -> BigInt {
    let g = gcd_bigint(a, b);
    if g.is_zero() {
        BigInt::zero()
    } else {
        (a / &g) * b
    }
}

fn gcd_bigint(a: &BigInt, b: &BigInt) -> BigInt {
    let (mut a, mut b) = (a.abs(), b.abs());
    while !b.is_zero() {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a
}
