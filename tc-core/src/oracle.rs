//! Collaborator boundaries for the timelock primitive and the symmetric
//! cipher.
//!
//! The protocol never implements threshold cryptography itself; it calls an
//! injected [`TimelockOracle`]. Likewise the stream cipher sits behind
//! [`SymmetricCipher`] so the protocol logic stays independent of the
//! library providing it.

use crate::consts::{CIPHER_KEY_SIZE, CIPHER_NONCE_SIZE};
use crate::error::Error;

use chacha20::cipher::{KeyIvInit, StreamCipher};
use chacha20::ChaCha20;

/// Timelock encryption against a randomness beacon.
///
/// Implementations must return [`Error::PrematureUnlock`] from
/// [`unlock`](Self::unlock) while the target round's beacon signature is
/// unpublished; this refusal is the security boundary the protocol rests
/// on. Calls may block on network I/O and must bound their own waits.
pub trait TimelockOracle {
    /// Encrypts `plaintext` so it can only be decrypted once `round` of
    /// `chain_id` has been published. Returns an opaque binary blob.
    fn lock(&self, plaintext: &[u8], chain_id: &str, round: u64) -> Result<Vec<u8>, Error>;

    /// Decrypts a locked blob using the published beacon signature.
    fn unlock(&self, blob: &[u8], chain_id: &str) -> Result<Vec<u8>, Error>;
}

/// Symmetric stream cipher applied to the padded plaintext.
pub trait SymmetricCipher {
    /// Encrypts or decrypts `buf` in place. The keystream is symmetric, so
    /// one operation serves both directions.
    fn apply(
        &self,
        key: &[u8; CIPHER_KEY_SIZE],
        nonce: &[u8; CIPHER_NONCE_SIZE],
        buf: &mut [u8],
    ) -> Result<(), Error>;
}

/// ChaCha20 (IETF, 12-byte nonce), the cipher of the protocol's symmetric
/// tail.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChaCha20Cipher;

impl SymmetricCipher for ChaCha20Cipher {
    fn apply(
        &self,
        key: &[u8; CIPHER_KEY_SIZE],
        nonce: &[u8; CIPHER_NONCE_SIZE],
        buf: &mut [u8],
    ) -> Result<(), Error> {
        let mut cipher = ChaCha20::new(key.into(), nonce.into());
        cipher.apply_keystream(buf);
        Ok(())
    }
}
