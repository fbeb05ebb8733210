use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::UniformRand;
use ark_std::rand::{CryptoRng, RngCore};

use crate::keys::Secret;
use crate::participant::ParticipantId;
use crate::poly::Commitment;

/// One participant's publicly verifiable secret-sharing transcript for a
/// single DKG session: a public commitment to its secret polynomial, a
/// Diffie-Hellman-style "soundness pair" `(r1, r2)` proving a single
/// `rho` underlies both groups, and the per-recipient public share points
/// `bigF[i] = f(i+1).g1`. During a reshare, `delta_point` additionally
/// commits to the renovation delta (SPEC_FULL.md C4).
#[derive(Clone, Debug)]
pub struct Pvss<E: Pairing> {
    pub commitment: Commitment<E::G1Affine>,
    pub r1: E::G1Affine,
    pub r2: E::G2Affine,
    pub big_f: Vec<E::G1Affine>,
    pub delta_point: Option<E::G1Affine>,
}

/// `GenerateSharedSecrets`: produces a dealer's PVSS transcript together
/// with the raw per-recipient shares, which the caller is responsible for
/// sealing under each recipient's transport key before broadcast.
pub fn generate_shared_secrets<E: Pairing, R: RngCore + CryptoRng>(
    secret: &Secret<E>,
    n: u32,
    delta_point: Option<E::G1Affine>,
    rng: &mut R,
) -> (Pvss<E>, Vec<E::ScalarField>) {
    let rho = E::ScalarField::rand(rng);
    let g1 = E::G1Affine::generator();
    let g2 = E::G2Affine::generator();
    let r1 = (g1 * rho).into_affine();
    let r2 = (g2 * rho).into_affine();
    let commitment = secret.poly().commitment(g1.into_group());

    let mut shares = Vec::with_capacity(n as usize);
    let mut big_f = Vec::with_capacity(n as usize);
    for id in ParticipantId::range(n) {
        let x = E::ScalarField::from(id.one_indexed());
        let share = secret.poly().evaluate(x);
        big_f.push((g1 * share).into_affine());
        shares.push(share);
    }

    (
        Pvss {
            commitment,
            r1,
            r2,
            big_f,
            delta_point,
        },
        shares,
    )
}

impl<E: Pairing> Pvss<E> {
    /// `VerifyCommitment`: checks the soundness pairing `e(r1,g2) =
    /// e(g1,r2)` and that every published per-recipient share point
    /// matches the committed polynomial evaluated at that recipient's
    /// index.
    pub fn verify_commitment(&self) -> bool {
        let g1 = E::G1Affine::generator();
        let g2 = E::G2Affine::generator();
        if E::pairing(self.r1, g2) != E::pairing(g1, self.r2) {
            return false;
        }
        if self.big_f.len() != self.commitment.len() {
            return false;
        }
        for id in ParticipantId::range(self.big_f.len() as u32) {
            let x = E::ScalarField::from(id.one_indexed());
            let expected = self.commitment.evaluate(x);
            if self.big_f[id.commitment_index()] != expected {
                return false;
            }
        }
        true
    }

    /// Per-recipient private verification: having decrypted `share =
    /// f(i)` from the dealer's transport envelope, recipient `i` checks
    /// `e(share.r1, g2) = e(bigF[i], r2)` before trusting the share.
    pub fn verify_share(&self, recipient: ParticipantId, share: E::ScalarField) -> bool {
        let idx = recipient.commitment_index();
        if idx >= self.big_f.len() {
            return false;
        }
        let g2 = E::G2Affine::generator();
        let lhs = E::pairing((self.r1 * share).into_affine(), g2);
        let rhs = E::pairing(self.big_f[idx], self.r2);
        lhs == rhs
    }

    /// `VerifyRenovate`: the constant term is untouched, and every other
    /// committed coefficient shifted by exactly the declared
    /// `delta_point`.
    pub fn verify_renovate(&self, previous: &Pvss<E>) -> bool {
        let Some(delta_point) = self.delta_point else {
            return false;
        };
        if self.commitment.constant_term() != previous.commitment.constant_term() {
            return false;
        }
        if self.commitment.len() != previous.commitment.len() {
            return false;
        }
        for k in 1..self.commitment.len() {
            let expected = (previous.commitment.points()[k].into_group() + delta_point).into_affine();
            if self.commitment.points()[k] != expected {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Bls12_381;
    use ark_std::test_rng;

    type E = Bls12_381;

    #[test]
    fn honest_transcript_verifies() {
        let rng = &mut test_rng();
        let secret = Secret::<E>::random(5, rng);
        let (pvss, shares) = generate_shared_secrets::<E, _>(&secret, 7, None, rng);
        assert!(pvss.verify_commitment());
        for id in ParticipantId::range(7) {
            assert!(pvss.verify_share(id, shares[id.commitment_index()]));
        }
    }

    #[test]
    fn forged_share_is_rejected() {
        let rng = &mut test_rng();
        let secret = Secret::<E>::random(5, rng);
        let (pvss, _shares) = generate_shared_secrets::<E, _>(&secret, 7, None, rng);
        let forged = <E as Pairing>::ScalarField::rand(rng);
        assert!(!pvss.verify_share(ParticipantId::new(1).unwrap(), forged));
    }

    #[test]
    fn renovation_is_verifiable_and_preserves_constant_term() {
        let rng = &mut test_rng();
        let mut secret = Secret::<E>::random(5, rng);
        let (before, _) = generate_shared_secrets::<E, _>(&secret, 7, None, rng);

        let delta = secret.renovate(rng);
        let g1 = <E as Pairing>::G1Affine::generator();
        let delta_point = (g1 * delta).into_affine();
        let (after, _) = generate_shared_secrets::<E, _>(&secret, 7, Some(delta_point), rng);

        assert!(after.verify_renovate(&before));
        assert_eq!(
            after.commitment.constant_term(),
            before.commitment.constant_term()
        );
    }

    #[test]
    fn tampered_renovation_is_rejected() {
        let rng = &mut test_rng();
        let mut secret = Secret::<E>::random(5, rng);
        let (before, _) = generate_shared_secrets::<E, _>(&secret, 7, None, rng);
        secret.renovate(rng);
        let bogus_delta_point = <E as Pairing>::G1Affine::generator();
        let (after, _) = generate_shared_secrets::<E, _>(&secret, 7, Some(bogus_delta_point), rng);
        assert!(!after.verify_renovate(&before));
    }
}
