//! Hybrid encryption envelope (SPEC_FULL.md C9): AES-256-CBC with PKCS#7
//! padding, keyed by `SHA256(uncompressed_bytes(P))` where `P` is a G1
//! point recovered from threshold decryption.
//!
//! The initialization vector is derived from the *same* digest as the key
//! (`IV = SHA256(uncompressed_bytes(P))[0..16]`), reusing one hash output
//! for both rather than sampling a fresh IV per message. This is an
//! intentional departure from standard CBC hygiene — reusing a key across
//! two messages sealed under the same point would make both IVs identical
//! too — carried over unchanged from the specification (Open Question 1):
//! this crate is not the place to silently fix it, since a fix would
//! change the wire format's key-derivation contract.

use ark_ec::AffineRepr;
use ark_serialize::CanonicalSerialize;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Derives the 32-byte AES key and 16-byte IV from a single SHA-256 digest
/// of `point`'s uncompressed serialization.
fn derive_key_and_iv<A: AffineRepr>(point: A) -> ([u8; 32], [u8; 16]) {
    let mut bytes = Vec::new();
    point
        .serialize_uncompressed(&mut bytes)
        .expect("serialization of a fixed-size point cannot fail");
    let digest = Sha256::digest(&bytes);
    let mut key = [0u8; 32];
    key.copy_from_slice(&digest);
    let mut iv = [0u8; 16];
    iv.copy_from_slice(&digest[..16]);
    (key, iv)
}

/// Seals `plaintext` under the group element `point`, typically the
/// committee's global public key raised to an ephemeral scalar.
pub fn encrypt<A: AffineRepr>(point: A, plaintext: &[u8]) -> Result<Vec<u8>> {
    if plaintext.is_empty() {
        return Err(Error::AesEmptyMessage);
    }
    let (key, iv) = derive_key_and_iv(point);
    let cipher = Aes256CbcEnc::new(&key.into(), &iv.into());
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

/// Opens an envelope sealed by [`encrypt`] under the same group element.
pub fn decrypt<A: AffineRepr>(point: A, ciphertext: &[u8]) -> Result<Vec<u8>> {
    if ciphertext.is_empty() {
        return Err(Error::AesEmptyCiphertext);
    }
    let (key, iv) = derive_key_and_iv(point);
    let cipher = Aes256CbcDec::new(&key.into(), &iv.into());
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| Error::AesUnpadFailed)
}
