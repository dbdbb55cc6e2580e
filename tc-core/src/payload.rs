//! Capsule payload codec.
//!
//! Encodes and decodes the two payload variants to and from a single binary
//! blob. Decoding performs every structural check in a fixed order and fails
//! closed: there is no partial recovery and no silent truncation.
//!
//! ```text
//!            PUBLIC PAYLOAD
//! = MODE 0x01 (1) || TLOCK BLOB (*)
//!
//!            PRIVATE PAYLOAD
//! = MODE 0x02 (1) || TLOCK LEN (4) || TLOCK BLOB (*)
//!   || TAIL VERSION 0x02 (1) || NONCE (32) || CIPHERTEXT (*) || TAG (32)
//! ```

use crate::consts::*;
use crate::error::Error;

use base64ct::{Base64, Encoding};

/// A capsule payload, decoded once at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// The locked blob covers the plaintext directly.
    Public {
        /// Opaque timelock ciphertext over the plaintext.
        tlock_blob: Vec<u8>,
    },

    /// The locked blob covers a 32-byte ephemeral secret; the tail carries
    /// the symmetrically encrypted, padded plaintext.
    Private {
        /// Opaque timelock ciphertext over the ephemeral secret.
        tlock_blob: Vec<u8>,

        /// Per-message nonce, salting key derivation and the MAC.
        nonce: [u8; NONCE_SIZE],

        /// ChaCha20 ciphertext over the padded plaintext.
        ciphertext: Vec<u8>,

        /// HMAC-SHA256 over nonce || ciphertext.
        tag: [u8; TAG_SIZE],
    },
}

impl Payload {
    /// The mode byte selecting this variant.
    pub fn mode(&self) -> u8 {
        match self {
            Payload::Public { .. } => MODE_PUBLIC,
            Payload::Private { .. } => MODE_PRIVATE,
        }
    }

    /// Encodes the payload into its wire form.
    ///
    /// Encoding enforces the same bounds as decoding, so a payload that
    /// encodes successfully always decodes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        match self {
            Payload::Public { tlock_blob } => {
                if tlock_blob.is_empty() {
                    return Err(Error::MalformedPayload("empty locked blob"));
                }

                let mut out = Vec::with_capacity(1 + tlock_blob.len());
                out.push(MODE_PUBLIC);
                out.extend_from_slice(tlock_blob);
                Ok(out)
            }
            Payload::Private {
                tlock_blob,
                nonce,
                ciphertext,
                tag,
            } => {
                if tlock_blob.is_empty() || tlock_blob.len() > MAX_TLOCK_LEN {
                    return Err(Error::MalformedPayload("locked blob length"));
                }
                if ciphertext.len() < MIN_CIPHERTEXT_SIZE || ciphertext.len() > MAX_CIPHERTEXT_SIZE
                {
                    return Err(Error::MalformedPayload("ciphertext length"));
                }

                let mut out = Vec::with_capacity(
                    1 + TLOCK_LEN_SIZE + tlock_blob.len() + 1 + NONCE_SIZE + ciphertext.len()
                        + TAG_SIZE,
                );
                out.push(MODE_PRIVATE);
                out.extend_from_slice(&u32::try_from(tlock_blob.len())?.to_be_bytes());
                out.extend_from_slice(tlock_blob);
                out.push(TAIL_VERSION);
                out.extend_from_slice(nonce);
                out.extend_from_slice(ciphertext);
                out.extend_from_slice(tag);
                Ok(out)
            }
        }
    }

    /// Decodes a payload from its wire form, running all structural checks
    /// in order: mode byte, locked-blob length bounds, tail length bound,
    /// sub-format version, ciphertext length bounds.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let (&mode, rest) = bytes
            .split_first()
            .ok_or(Error::MalformedPayload("empty payload"))?;

        match mode {
            MODE_PUBLIC => {
                if rest.is_empty() {
                    return Err(Error::MalformedPayload("empty locked blob"));
                }

                Ok(Payload::Public {
                    tlock_blob: rest.to_vec(),
                })
            }
            MODE_PRIVATE => {
                if rest.len() < TLOCK_LEN_SIZE {
                    return Err(Error::MalformedPayload("truncated locked-blob length"));
                }

                let (len_bytes, rest) = rest.split_at(TLOCK_LEN_SIZE);
                let tlock_len = u32::from_be_bytes(len_bytes.try_into()?) as usize;
                if tlock_len == 0 || tlock_len > MAX_TLOCK_LEN {
                    return Err(Error::MalformedPayload("locked blob length"));
                }
                if tlock_len > rest.len() {
                    return Err(Error::MalformedPayload("locked blob exceeds payload"));
                }

                let (tlock_blob, tail) = rest.split_at(tlock_len);
                if tail.len() < MIN_TAIL_SIZE {
                    return Err(Error::MalformedPayload("symmetric tail too short"));
                }

                let (&version, tail) = tail
                    .split_first()
                    .ok_or(Error::MalformedPayload("symmetric tail too short"))?;
                if version != TAIL_VERSION {
                    return Err(Error::UnsupportedSubFormat {
                        expected: TAIL_VERSION,
                        found: version,
                    });
                }

                let (nonce_bytes, tail) = tail.split_at(NONCE_SIZE);
                let (ciphertext, tag_bytes) = tail.split_at(tail.len() - TAG_SIZE);
                if ciphertext.len() < MIN_CIPHERTEXT_SIZE || ciphertext.len() > MAX_CIPHERTEXT_SIZE
                {
                    return Err(Error::MalformedPayload("ciphertext length"));
                }

                Ok(Payload::Private {
                    tlock_blob: tlock_blob.to_vec(),
                    nonce: nonce_bytes.try_into()?,
                    ciphertext: ciphertext.to_vec(),
                    tag: tag_bytes.try_into()?,
                })
            }
            _ => Err(Error::MalformedPayload("mode byte")),
        }
    }

    /// Encodes the payload as strict canonical base64 for text transport.
    pub fn to_base64(&self) -> Result<String, Error> {
        Ok(Base64::encode_string(&self.to_bytes()?))
    }

    /// Decodes a payload from strict canonical base64.
    ///
    /// Non-canonical or alphabet-violating input is rejected, never
    /// repaired.
    pub fn from_base64(content: &str) -> Result<Self, Error> {
        let bytes = Base64::decode_vec(content)?;
        Self::from_bytes(&bytes)
    }
}

/// Rejects locked blobs that are not in binary age v1 framing.
///
/// An ASCII-armored blob is valid age but the wrong encoding for this
/// protocol; it must never be handed to the oracle.
pub fn vet_locked_blob(blob: &[u8]) -> Result<(), Error> {
    if blob.is_empty() {
        return Err(Error::MalformedPayload("empty locked blob"));
    }
    if blob.starts_with(AGE_ARMOR_HEADER) {
        return Err(Error::Encoding("armored locked blob"));
    }
    if !blob.starts_with(AGE_V1_MAGIC) {
        return Err(Error::Encoding("locked blob framing"));
    }

    Ok(())
}
