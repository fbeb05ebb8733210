//! Transport identities: a per-participant Diffie-Hellman keypair used to
//! seal PVSS shares point-to-point during a DKG session, distinct from the
//! threshold keys the DKG itself produces.
//!
//! Modeled on the `DiffieHellmanPrivateKey`/`DiffieHellmanPublicKey` pair
//! other threshold-signing crates in this ecosystem use for the same
//! purpose, generalized here to any `CurveGroup` so the DKG crate can pick
//! G1 or G2 for the transport channel independently of which group the
//! threshold secret lives in.

use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::UniformRand;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::Result;

#[derive(Clone, Zeroize, ZeroizeOnDrop, CanonicalSerialize, CanonicalDeserialize)]
pub struct TransportPrivateKey<G: CurveGroup>(G::ScalarField);

impl<G: CurveGroup> TransportPrivateKey<G> {
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self(G::ScalarField::rand(rng))
    }

    pub fn public(&self) -> TransportPublicKey<G> {
        TransportPublicKey((G::generator() * self.0).into_affine())
    }

    /// The Diffie-Hellman shared point `sk . peer_pk`, fed into
    /// [`tpke::aes`](../../tpke/aes/index.html)-style envelope key
    /// derivation by callers that need a symmetric channel with `peer`.
    pub fn shared_secret(&self, peer: &TransportPublicKey<G>) -> G::Affine {
        (peer.0 * self.0).into_affine()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.serialize_compressed(&mut bytes)?;
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::deserialize_compressed(bytes)?)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct TransportPublicKey<G: CurveGroup>(pub G::Affine);

impl<G: CurveGroup> std::fmt::Debug for TransportPrivateKey<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("TransportPrivateKey").field(&"<redacted>").finish()
    }
}

impl<G: CurveGroup> TransportPublicKey<G> {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.serialize_compressed(&mut bytes)?;
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::deserialize_compressed(bytes)?)
    }
}

/// A participant's transport keypair for one DKG session.
pub struct TransportKeypair<G: CurveGroup> {
    pub private: TransportPrivateKey<G>,
    pub public: TransportPublicKey<G>,
}

impl<G: CurveGroup> TransportKeypair<G> {
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let private = TransportPrivateKey::generate(rng);
        let public = private.public();
        Self { private, public }
    }
}
