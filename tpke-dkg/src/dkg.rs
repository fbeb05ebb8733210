use std::collections::BTreeMap;

use anyhow::anyhow;
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::{CryptoRng, RngCore};
use num_bigint::BigInt;
use rayon::prelude::*;
use tracing::{info_span, warn};

use tpke::{lagrange, ParticipantId, PrivateKey, PublicKey, Secret};
use tpke_common::TransportPublicKey;

use crate::error::{Error, Result};
use crate::participant::Participant;
use crate::state::DkgState;

/// Seals one dealer's scalar share to one recipient: a Diffie-Hellman
/// shared point, fed into [`tpke::aes`]'s envelope the same way the rest
/// of this crate uses that envelope to key payload encryption (SPEC_FULL.md
/// C11 — the transport-keypair sealing primitive standing in for the
/// external ECIES collaborator named in §1).
fn seal<E: Pairing>(
    sender_transport: &tpke_common::TransportPrivateKey<E::G1>,
    recipient_public: &TransportPublicKey<E::G1>,
    share: E::ScalarField,
) -> Vec<u8> {
    let shared_point = sender_transport.shared_secret(recipient_public);
    let mut plaintext = Vec::new();
    share
        .serialize_compressed(&mut plaintext)
        .expect("scalar field element has a fixed compressed size");
    tpke::aes::encrypt(shared_point, &plaintext).expect("a non-empty scalar encoding always encrypts")
}

fn open<E: Pairing>(
    recipient_transport: &tpke_common::TransportPrivateKey<E::G1>,
    sender_public: &TransportPublicKey<E::G1>,
    envelope: &[u8],
) -> Result<E::ScalarField> {
    let shared_point = recipient_transport.shared_secret(sender_public);
    let plaintext = tpke::aes::decrypt(shared_point, envelope)?;
    E::ScalarField::deserialize_compressed(&plaintext[..])
        .map_err(|e| Error::Other(anyhow!("malformed scalar share envelope: {e}")))
}

/// Drives a dealerless DKG session for a committee of `n` participants with
/// reconstruction threshold `t` (SPEC_FULL.md §4.5, C6).
///
/// This orchestrator holds every participant's local state side by side —
/// there is no network transport (an explicit Non-goal) — but each
/// participant's secret material is still only ever read by `Dkg`'s own
/// session-driving methods, mirroring how a real deployment would have each
/// participant run this same state machine against its own private state
/// and exchange only the sealed mailbox envelopes and public PVSS
/// transcripts with its peers.
pub struct Dkg<E: Pairing> {
    pub n: u32,
    pub t: usize,
    pub scaler: BigInt,
    pub participants: Vec<Participant<E>>,
    pub state: DkgState,
    /// `mailbox[recipient][sender]`: the sealed share dealer `sender`
    /// addressed to recipient `recipient`, both 0-indexed by position in
    /// `participants`. Append-only during `Prepare`/`Reshare`, read-only
    /// during the matching `verify_*` call (SPEC_FULL.md §5).
    mailbox: Vec<Vec<Option<Vec<u8>>>>,
}

impl<E: Pairing> Dkg<E> {
    /// Builds a fresh committee of `n` participants (each with a new
    /// transport keypair) targeting reconstruction threshold `t`, and
    /// precomputes the committee's scaler (SPEC_FULL.md C3's `searchDLCM`).
    pub fn new<R: RngCore + CryptoRng>(n: u32, t: usize, rng: &mut R) -> Result<Self> {
        if t == 0 || (t as u64) > n as u64 {
            return Err(Error::Other(anyhow!(
                "threshold must satisfy 1 <= t <= n (got t={t}, n={n})"
            )));
        }
        let participants = ParticipantId::range(n).map(|id| Participant::new(id, &mut *rng)).collect();
        Ok(Self {
            n,
            t,
            scaler: lagrange::scaler(n, t),
            participants,
            state: DkgState::Idle,
            mailbox: vec![vec![None; n as usize]; n as usize],
        })
    }

    fn require_state(&self, expected: &DkgState) -> Result<()> {
        if &self.state == expected {
            Ok(())
        } else {
            Err(Error::Other(anyhow!(
                "DKG session is in state {:?}, expected {:?}",
                self.state,
                expected
            )))
        }
    }

    /// `Prepare`: every participant samples a fresh `Secret(t)` and PVSS
    /// transcript, and seals its per-recipient shares into the mailbox.
    pub fn prepare<R: RngCore + CryptoRng>(&mut self, rng: &mut R) -> Result<()> {
        let _span = info_span!("dkg.prepare", n = self.n, t = self.t).entered();
        self.require_state(&DkgState::Idle)?;

        let recipient_publics: Vec<TransportPublicKey<E::G1>> =
            self.participants.iter().map(|p| p.transport.public).collect();
        let mailbox = &mut self.mailbox;
        for (dealer_idx, dealer) in self.participants.iter_mut().enumerate() {
            let secret = Secret::<E>::random(self.t, rng);
            let (pvss, shares) = tpke::pvss::generate_shared_secrets::<E, _>(&secret, self.n, None, rng);
            for (recipient_idx, recipient) in mailbox.iter_mut().enumerate() {
                recipient[dealer_idx] = Some(seal::<E>(&dealer.transport.private, &recipient_publics[recipient_idx], shares[recipient_idx]));
            }
            dealer.secret = Some(secret);
            dealer.current_pvss = Some(pvss);
        }
        self.state = DkgState::Prepared;
        Ok(())
    }

    /// `VerifyPrepare`: checks every dealer's public transcript, then every
    /// recipient's private share against its dealer's transcript. Any
    /// single failure aborts the whole session (SPEC_FULL.md §4.5
    /// "Failure model").
    pub fn verify_prepare(&mut self) -> Result<()> {
        let _span = info_span!("dkg.verify_prepare", n = self.n, t = self.t).entered();
        self.require_state(&DkgState::Prepared)?;
        self.verify_round(false)?;
        self.state = DkgState::Ready;
        Ok(())
    }

    /// `Reshare`: mirrors `prepare`, but renovates the existing secret
    /// (preserving its constant term) instead of sampling a fresh one, and
    /// commits the renovation delta alongside the new transcript.
    pub fn reshare<R: RngCore + CryptoRng>(&mut self, rng: &mut R) -> Result<()> {
        let _span = info_span!("dkg.reshare", n = self.n, t = self.t).entered();
        self.require_state(&DkgState::Ready)?;

        let g1 = E::G1Affine::generator();
        let recipient_publics: Vec<TransportPublicKey<E::G1>> =
            self.participants.iter().map(|p| p.transport.public).collect();
        let mailbox = &mut self.mailbox;
        for (dealer_idx, dealer) in self.participants.iter_mut().enumerate() {
            let secret = dealer
                .secret
                .as_mut()
                .ok_or_else(|| Error::Other(anyhow!("participant {} has no secret to reshare", dealer.id)))?;
            let delta = secret.renovate(rng);
            let delta_point = (g1 * delta).into_affine();
            let (pvss, shares) = tpke::pvss::generate_shared_secrets::<E, _>(secret, self.n, Some(delta_point), rng);
            for (recipient_idx, recipient) in mailbox.iter_mut().enumerate() {
                recipient[dealer_idx] = Some(seal::<E>(&dealer.transport.private, &recipient_publics[recipient_idx], shares[recipient_idx]));
            }
            dealer.previous_pvss = dealer.current_pvss.take();
            dealer.current_pvss = Some(pvss);
        }
        self.state = DkgState::Reshared;
        Ok(())
    }

    /// `VerifyReshare`: as `verify_prepare`, plus `VerifyRenovate` against
    /// each participant's previous transcript.
    pub fn verify_reshare(&mut self) -> Result<()> {
        let _span = info_span!("dkg.verify_reshare", n = self.n, t = self.t).entered();
        self.require_state(&DkgState::Reshared)?;
        self.verify_round(true)?;
        self.state = DkgState::Ready;
        Ok(())
    }

    /// Shared body of `verify_prepare`/`verify_reshare`: validate every
    /// dealer's transcript (and, if `check_renovation`, its relationship to
    /// the previous transcript), then validate and cache every recipient's
    /// private share.
    fn verify_round(&mut self, check_renovation: bool) -> Result<()> {
        for dealer in &self.participants {
            let pvss = dealer
                .current_pvss
                .as_ref()
                .ok_or_else(|| Error::Other(anyhow!("participant {} has no transcript to verify", dealer.id)))?;
            if !pvss.verify_commitment() {
                self.state = DkgState::Aborted(format!("participant {} published an invalid PVSS transcript", dealer.id));
                return Err(Error::InvalidPvss(dealer.id.one_indexed()));
            }
            if check_renovation {
                let previous = dealer
                    .previous_pvss
                    .as_ref()
                    .ok_or_else(|| Error::Other(anyhow!("participant {} has no previous transcript to renovate", dealer.id)))?;
                if !pvss.verify_renovate(previous) {
                    self.state = DkgState::Aborted(format!("participant {} failed VerifyRenovate", dealer.id));
                    return Err(Error::InvalidRenovation(dealer.id.one_indexed()));
                }
            }
        }

        let decrypted: Vec<Result<Vec<(ParticipantId, E::ScalarField)>>> = (0..self.participants.len())
            .into_par_iter()
            .map(|recipient_idx| {
                let recipient = &self.participants[recipient_idx];
                let mut accepted = Vec::with_capacity(self.participants.len());
                for (dealer_idx, dealer) in self.participants.iter().enumerate() {
                    let envelope = self.mailbox[recipient_idx][dealer_idx]
                        .as_ref()
                        .ok_or_else(|| Error::Other(anyhow!("missing mailbox entry for recipient {} from dealer {}", recipient.id, dealer.id)))?;
                    let share = open::<E>(&recipient.transport.private, &dealer.transport.public, envelope)?;
                    let pvss = dealer.current_pvss.as_ref().expect("checked above");
                    if !pvss.verify_share(recipient.id, share) {
                        warn!(recipient = %recipient.id, dealer = %dealer.id, "share failed private pairing verification");
                        return Err(Error::InvalidSecret {
                            recipient: recipient.id.one_indexed(),
                            dealer: dealer.id.one_indexed(),
                        });
                    }
                    accepted.push((dealer.id, share));
                }
                Ok(accepted)
            })
            .collect();

        let mut per_recipient = Vec::with_capacity(decrypted.len());
        for result in decrypted {
            per_recipient.push(result?);
        }
        for (recipient, accepted) in self.participants.iter_mut().zip(per_recipient) {
            recipient.received_shares = accepted.into_iter().collect::<BTreeMap<_, _>>();
        }
        Ok(())
    }

    /// `PublishGlobalPublicKey`: `pk = scaler . sum_j A_{j,0}` over every
    /// participant's current constant-term commitment. Stable across
    /// reshares since renovation never touches the constant term.
    pub fn global_public_key(&self) -> Result<PublicKey<E>> {
        if !self.state.is_ready() {
            return Err(Error::Other(anyhow!("DKG session is not in a Ready state")));
        }
        let constant_terms: Vec<E::G1Affine> = self
            .participants
            .iter()
            .map(|p| {
                p.current_pvss
                    .as_ref()
                    .expect("Ready state implies every participant has a verified transcript")
                    .commitment
                    .constant_term()
            })
            .collect();
        Ok(PublicKey::derive(&constant_terms, &self.scaler))
    }

    /// `GetPrivateKeys`: each participant's `sk_i = sum_j f_j(i)` over the
    /// shares accepted in the most recently completed round.
    pub fn private_keys(&self) -> Result<BTreeMap<ParticipantId, PrivateKey<E>>> {
        if !self.state.is_ready() {
            return Err(Error::Other(anyhow!("DKG session is not in a Ready state")));
        }
        Ok(self.participants.iter().map(|p| (p.id, p.private_key())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::{Bls12_381, G1Projective};
    use ark_ff::UniformRand;
    use ark_std::test_rng;

    type E = Bls12_381;

    fn ready_dkg(n: u32, t: usize) -> Dkg<E> {
        let rng = &mut test_rng();
        let mut dkg = Dkg::<E>::new(n, t, rng).unwrap();
        dkg.prepare(rng).unwrap();
        dkg.verify_prepare().unwrap();
        dkg
    }

    fn decryption_shares(
        dkg: &Dkg<E>,
        big_r: <E as Pairing>::G1Affine,
    ) -> BTreeMap<ParticipantId, Vec<<E as Pairing>::G1Affine>> {
        dkg.private_keys()
            .unwrap()
            .iter()
            .map(|(id, sk)| (*id, vec![sk.decryption_share(big_r)]))
            .collect()
    }

    #[test]
    fn rejects_a_threshold_outside_one_to_n() {
        let rng = &mut test_rng();
        assert!(Dkg::<E>::new(5, 0, rng).is_err());
        assert!(Dkg::<E>::new(5, 6, rng).is_err());
    }

    #[test]
    fn full_session_reaches_ready_with_a_stable_public_key() {
        let dkg = ready_dkg(7, 5);
        assert_eq!(dkg.state, DkgState::Ready);
        let pk_a = dkg.global_public_key().unwrap();
        let pk_b = dkg.global_public_key().unwrap();
        assert_eq!(pk_a, pk_b);
    }

    #[test]
    fn decrypt_with_two_different_subsets_of_dkg_private_keys_agree() {
        let rng = &mut test_rng();
        let dkg = ready_dkg(7, 5);
        let pk = dkg.global_public_key().unwrap();

        let m = G1Projective::rand(rng).into_affine();
        let ct = pk.encrypt(m, rng);
        let shares = decryption_shares(&dkg, ct.big_r);

        let first_five: BTreeMap<_, _> = shares.iter().filter(|(id, _)| id.one_indexed() <= 5).map(|(id, s)| (*id, s.clone())).collect();
        let last_five: BTreeMap<_, _> = shares.iter().filter(|(id, _)| id.one_indexed() >= 3).map(|(id, s)| (*id, s.clone())).collect();

        let decrypted_a = tpke::decryption::decrypt_batch(&[ct], &first_five, dkg.t, &dkg.scaler, &pk).unwrap();
        let decrypted_b = tpke::decryption::decrypt_batch(&[ct], &last_five, dkg.t, &dkg.scaler, &pk).unwrap();
        assert_eq!(decrypted_a[0], m);
        assert_eq!(decrypted_b[0], m);
    }

    #[test]
    fn hybrid_aes_payload_round_trips_through_a_dkg_committee() {
        let rng = &mut test_rng();
        let dkg = ready_dkg(7, 5);
        let pk = dkg.global_public_key().unwrap();

        let ephemeral = G1Projective::rand(rng).into_affine();
        let ct = pk.encrypt(ephemeral, rng);
        let payload: Vec<u8> = (0..1_000_000u32).map(|i| (i % 256) as u8).collect();
        let envelope = tpke::aes::encrypt(ephemeral, &payload).unwrap();

        let shares = decryption_shares(&dkg, ct.big_r);
        let decrypted = tpke::decryption::decrypt_batch(&[ct], &shares, dkg.t, &dkg.scaler, &pk).unwrap();
        let recovered = tpke::aes::decrypt(decrypted[0], &envelope).unwrap();
        assert_eq!(recovered, payload);
    }

    #[test]
    fn a_corrupted_decryption_share_is_tolerated() {
        let rng = &mut test_rng();
        let dkg = ready_dkg(7, 5);
        let pk = dkg.global_public_key().unwrap();
        let m = G1Projective::rand(rng).into_affine();
        let ct = pk.encrypt(m, rng);
        let mut shares = decryption_shares(&dkg, ct.big_r);
        let corrupt_id = ParticipantId::new(3).unwrap();
        shares.insert(corrupt_id, vec![G1Projective::rand(rng).into_affine()]);

        let decrypted = tpke::decryption::decrypt_batch(&[ct], &shares, dkg.t, &dkg.scaler, &pk).unwrap();
        assert_eq!(decrypted[0], m);
    }

    #[test]
    fn threshold_bls_signature_over_a_dkg_committee() {
        let dkg = ready_dkg(7, 5);
        let pk = dkg.global_public_key().unwrap();
        let message = b"pizza pizza pizza pizza pizza";

        let shares: BTreeMap<_, _> = dkg
            .private_keys()
            .unwrap()
            .iter()
            .map(|(id, sk)| (*id, sk.sign_share(message)))
            .collect();

        let signature = tpke::signature::aggregate_and_verify(message, &shares, dkg.t, &dkg.scaler, &pk).unwrap();
        assert!(pk.verify_signature(message, signature));
    }

    #[test]
    fn reshare_preserves_the_public_key_and_both_key_generations_decrypt() {
        let rng = &mut test_rng();
        let mut dkg = ready_dkg(7, 5);
        let pk = dkg.global_public_key().unwrap();
        let old_private_keys = dkg.private_keys().unwrap();

        let m = G1Projective::rand(rng).into_affine();
        let ct = pk.encrypt(m, rng);
        let old_shares = decryption_shares(&dkg, ct.big_r);

        dkg.reshare(rng).unwrap();
        assert_eq!(dkg.state, DkgState::Reshared);
        dkg.verify_reshare().unwrap();
        assert_eq!(dkg.state, DkgState::Ready);

        let pk_after = dkg.global_public_key().unwrap();
        assert_eq!(pk, pk_after);

        let new_shares = decryption_shares(&dkg, ct.big_r);
        let decrypted_old = tpke::decryption::decrypt_batch(&[ct], &old_shares, dkg.t, &dkg.scaler, &pk).unwrap();
        let decrypted_new = tpke::decryption::decrypt_batch(&[ct], &new_shares, dkg.t, &dkg.scaler, &pk_after).unwrap();
        assert_eq!(decrypted_old[0], m);
        assert_eq!(decrypted_new[0], m);

        // sanity: reshare actually changed every participant's combined private key
        let new_private_keys = dkg.private_keys().unwrap();
        let any_changed = old_private_keys
            .iter()
            .any(|(id, sk)| sk.as_scalar() != new_private_keys[id].as_scalar());
        assert!(any_changed);
    }

    #[test]
    fn a_bad_pvss_transcript_aborts_the_session() {
        let rng = &mut test_rng();
        let mut dkg = Dkg::<E>::new(4, 3, rng).unwrap();
        dkg.prepare(rng).unwrap();
        // tamper with the first dealer's published transcript
        dkg.participants[0].current_pvss.as_mut().unwrap().r1 = G1Projective::rand(rng).into_affine();
        let err = dkg.verify_prepare().unwrap_err();
        assert!(matches!(err, Error::InvalidPvss(1)));
        assert!(matches!(dkg.state, DkgState::Aborted(_)));
    }
}
