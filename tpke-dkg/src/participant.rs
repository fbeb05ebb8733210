use std::collections::BTreeMap;

use ark_ec::pairing::Pairing;
use tpke::{ParticipantId, Pvss, PrivateKey, Secret};
use tpke_common::TransportKeypair;

/// One committee member's local state across a DKG session (SPEC_FULL.md
/// "DKG state" in §3): its transport identity, its current secret-sharing
/// polynomial, the PVSS transcript it most recently dealt (and, during a
/// reshare, the one it dealt previously, for `VerifyRenovate`), and the
/// shares it has decrypted and validated from every other dealer.
///
/// Owned exclusively by the committee; [`crate::Dkg`] borrows participants
/// during a session but never exposes an aliased mutable handle to more
/// than one caller at a time.
pub struct Participant<E: Pairing> {
    pub id: ParticipantId,
    pub transport: TransportKeypair<E::G1>,
    pub(crate) secret: Option<Secret<E>>,
    pub(crate) previous_pvss: Option<Pvss<E>>,
    pub(crate) current_pvss: Option<Pvss<E>>,
    /// `receivedSecrets[j] = f_j(i)`, the share this participant decrypted
    /// and verified from dealer `j`, keyed by the dealer's id. Replaced
    /// wholesale after each successful `Prepare`/`Reshare` round rather
    /// than accumulated across rounds: proactive resharing recombines the
    /// *latest* evaluations of each dealer's (possibly renovated)
    /// polynomial, not a running sum across rounds.
    pub(crate) received_shares: BTreeMap<ParticipantId, E::ScalarField>,
}

impl<E: Pairing> Participant<E> {
    pub(crate) fn new<R: ark_std::rand::RngCore + ark_std::rand::CryptoRng>(
        id: ParticipantId,
        rng: &mut R,
    ) -> Self {
        Self {
            id,
            transport: TransportKeypair::generate(rng),
            secret: None,
            previous_pvss: None,
            current_pvss: None,
            received_shares: BTreeMap::new(),
        }
    }

    pub fn current_pvss(&self) -> Option<&Pvss<E>> {
        self.current_pvss.as_ref()
    }

    /// `sk_i = sum_j f_j(i)` over every dealer's share accepted in the most
    /// recent completed round.
    pub fn private_key(&self) -> PrivateKey<E> {
        PrivateKey::from_shares(self.received_shares.values().copied())
    }
}
