//! Key derivation for the private capsule tail.
//!
//! HKDF-Expand (RFC 5869) with SHA-256 stretches the locked ephemeral
//! secret, salted by the per-message nonce, into three independent subkeys.

use crate::consts::*;
use crate::error::Error;

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// HKDF-Expand with `secret` as the pseudorandom key and `info` as context.
///
/// Fails if `okm` is longer than 255 SHA-256 blocks (8160 bytes) or if the
/// secret is shorter than one hash output.
pub fn expand(secret: &[u8], info: &[u8], okm: &mut [u8]) -> Result<(), Error> {
    let hk = Hkdf::<Sha256>::from_prk(secret)?;
    hk.expand(info, okm)?;
    Ok(())
}

/// Subkeys protecting one private capsule.
///
/// Exists only transiently during encrypt/decrypt; zeroized on drop and
/// never persisted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKeys {
    /// Symmetric encryption key.
    pub enc_key: [u8; CIPHER_KEY_SIZE],

    /// Symmetric encryption nonce.
    pub enc_nonce: [u8; CIPHER_NONCE_SIZE],

    /// Authentication (MAC) key.
    pub mac_key: [u8; MAC_KEY_SIZE],
}

// Key material must never end up in logs.
impl core::fmt::Debug for DerivedKeys {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("DerivedKeys(..)")
    }
}

impl DerivedKeys {
    /// Expands the ephemeral secret under the per-message nonce into the
    /// three contiguous subkeys.
    pub fn derive(secret: &[u8], nonce: &[u8; NONCE_SIZE]) -> Result<Self, Error> {
        let mut okm = [0u8; DERIVED_KEY_LEN];
        expand(secret, nonce, &mut okm)?;

        let mut keys = DerivedKeys {
            enc_key: [0u8; CIPHER_KEY_SIZE],
            enc_nonce: [0u8; CIPHER_NONCE_SIZE],
            mac_key: [0u8; MAC_KEY_SIZE],
        };
        keys.enc_key.copy_from_slice(&okm[..CIPHER_KEY_SIZE]);
        keys.enc_nonce
            .copy_from_slice(&okm[CIPHER_KEY_SIZE..CIPHER_KEY_SIZE + CIPHER_NONCE_SIZE]);
        keys.mac_key
            .copy_from_slice(&okm[CIPHER_KEY_SIZE + CIPHER_NONCE_SIZE..]);

        okm.zeroize();

        Ok(keys)
    }
}
