use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::UniformRand;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::{CryptoRng, RngCore};

use crate::error::{Error, Result};
use crate::keys::PublicKey;

/// `{cMsg, bigR, commitment}`: a message point threshold-encrypted under
/// the committee's global public key. `cMsg = M + rho.pk`, `bigR = rho.g1`,
/// `commitment = rho.g2`; any honest ciphertext satisfies
/// `e(bigR, g2) = e(g1, commitment)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct CipherText<E: Pairing> {
    pub c_msg: E::G1Affine,
    pub big_r: E::G1Affine,
    pub commitment: E::G2Affine,
}

impl<E: Pairing> PublicKey<E> {
    /// Encrypts a message point `M`, sampling a fresh `rho`.
    pub fn encrypt<R: RngCore + CryptoRng>(&self, message: E::G1Affine, rng: &mut R) -> CipherText<E> {
        let rho = E::ScalarField::rand(rng);
        let g1 = E::G1Affine::generator();
        let g2 = E::G2Affine::generator();
        CipherText {
            c_msg: (message + self.0 * rho).into_affine(),
            big_r: (g1 * rho).into_affine(),
            commitment: (g2 * rho).into_affine(),
        }
    }
}

impl<E: Pairing> CipherText<E> {
    /// Structural self-check: `e(bigR, g2) == e(g1, commitment)`. A
    /// malformed `rho` pair is reported as `InvalidCiphertext`, never as a
    /// decryption failure (SPEC_FULL.md C7).
    pub fn verify(&self) -> Result<()> {
        let g1 = E::G1Affine::generator();
        let g2 = E::G2Affine::generator();
        if E::pairing(self.big_r, g2) == E::pairing(g1, self.commitment) {
            Ok(())
        } else {
            Err(Error::InvalidCiphertext)
        }
    }

    /// `cMsg (48) || bigR (48) || commitment (96)` compressed-point layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        self.c_msg.serialize_compressed(&mut bytes).expect("serialization of a fixed-size point cannot fail");
        self.big_r.serialize_compressed(&mut bytes).expect("serialization of a fixed-size point cannot fail");
        self.commitment.serialize_compressed(&mut bytes).expect("serialization of a fixed-size point cannot fail");
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut cursor = bytes;
        let c_msg = E::G1Affine::deserialize_compressed(&mut cursor)?;
        let big_r = E::G1Affine::deserialize_compressed(&mut cursor)?;
        let commitment = E::G2Affine::deserialize_compressed(&mut cursor)?;
        Ok(Self { c_msg, big_r, commitment })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::{Bls12_381, G1Projective};
    use ark_std::test_rng;

    type E = Bls12_381;

    fn random_public_key(rng: &mut (impl RngCore + CryptoRng)) -> PublicKey<E> {
        PublicKey(G1Projective::rand(rng).into_affine())
    }

    #[test]
    fn honest_ciphertext_verifies() {
        let rng = &mut test_rng();
        let pk = random_public_key(rng);
        let m = G1Projective::rand(rng).into_affine();
        let ct = pk.encrypt(m, rng);
        assert!(ct.verify().is_ok());
    }

    #[test]
    fn perturbed_commitment_is_rejected() {
        let rng = &mut test_rng();
        let pk = random_public_key(rng);
        let m = G1Projective::rand(rng).into_affine();
        let mut ct = pk.encrypt(m, rng);
        ct.commitment = (ct.commitment.into_group() + <Bls12_381 as Pairing>::G2Affine::generator()).into_affine();
        assert!(matches!(ct.verify(), Err(Error::InvalidCiphertext)));
    }

    #[test]
    fn serialization_round_trips() {
        let rng = &mut test_rng();
        let pk = random_public_key(rng);
        let m = G1Projective::rand(rng).into_affine();
        let ct = pk.encrypt(m, rng);
        let bytes = ct.to_bytes();
        assert_eq!(bytes.len(), 48 + 48 + 96);
        let decoded = CipherText::<E>::from_bytes(&bytes).unwrap();
        assert_eq!(ct, decoded);
    }
}
