//! Reversible block padding for private capsule plaintexts.
//!
//! The padded form is a 2-byte big-endian length prefix followed by the
//! plaintext and random filler, aligned to 32-byte blocks with a one-block
//! minimum. The filler is covered by the outer MAC over the ciphertext, so
//! its value never matters for correctness, but it is drawn from a
//! cryptographically strong source so that only the block boundary leaks
//! anything about the plaintext length.

use crate::consts::*;
use crate::error::Error;

use rand::{CryptoRng, RngCore};

/// Pads `plaintext` to a multiple of [`PAD_BLOCK_SIZE`] bytes.
///
/// Rejects plaintexts outside 1..=65535 bytes.
pub fn pad<R: RngCore + CryptoRng>(plaintext: &[u8], rng: &mut R) -> Result<Vec<u8>, Error> {
    let len = plaintext.len();
    if !(MIN_PLAINTEXT_SIZE..=MAX_PLAINTEXT_SIZE).contains(&len) {
        return Err(Error::MalformedPayload("plaintext length"));
    }

    let prefixed_len = LEN_PREFIX_SIZE + len;
    let total = prefixed_len.div_ceil(PAD_BLOCK_SIZE) * PAD_BLOCK_SIZE;

    let mut padded = Vec::with_capacity(total);
    padded.extend_from_slice(&u16::try_from(len)?.to_be_bytes());
    padded.extend_from_slice(plaintext);

    let mut filler = vec![0u8; total - prefixed_len];
    rng.fill_bytes(&mut filler);
    padded.extend_from_slice(&filler);

    Ok(padded)
}

/// Recovers the plaintext from its padded form, discarding the filler.
pub fn unpad(padded: &[u8]) -> Result<Vec<u8>, Error> {
    if padded.len() < PAD_BLOCK_SIZE {
        return Err(Error::MalformedPayload("padded data too short"));
    }

    let declared = u16::from_be_bytes(padded[..LEN_PREFIX_SIZE].try_into()?) as usize;
    if declared < MIN_PLAINTEXT_SIZE {
        return Err(Error::MalformedPayload("declared plaintext length"));
    }

    let body = &padded[LEN_PREFIX_SIZE..];
    if declared > body.len() {
        return Err(Error::MalformedPayload("declared length exceeds padded data"));
    }

    Ok(body[..declared].to_vec())
}
