//! Capsule client API.
//!
//! Used for:
//! - Locking, packing and signing capsules (*sealing*),
//! - Validating, unlocking and decrypting capsules (*unsealing*).
//!
//! Each seal or unseal is an independent, single-shot pipeline: no state is
//! shared between capsules and unrelated capsules may be processed fully in
//! parallel.

use crate::consts::*;
use crate::envelope::{
    alt_tag, recipient_tag, tlock_tag, Envelope, EnvelopeSigner, EnvelopeVerifier,
    LockingMetadata, UnsignedEnvelope,
};
use crate::error::Error;
use crate::kdf::DerivedKeys;
use crate::oracle::{ChaCha20Cipher, SymmetricCipher, TimelockOracle};
use crate::padding;
use crate::payload::{vet_locked_blob, Payload};
use crate::rounds::ChainDescriptor;

use hmac::{Hmac, Mac};
use rand::{CryptoRng, RngCore};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

/// HMAC-SHA256 over nonce || ciphertext under the derived MAC key.
fn authentication_tag(
    mac_key: &[u8; MAC_KEY_SIZE],
    nonce: &[u8; NONCE_SIZE],
    ciphertext: &[u8],
) -> Result<[u8; TAG_SIZE], Error> {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(mac_key).map_err(|_| Error::ConstraintViolation)?;
    mac.update(nonce);
    mac.update(ciphertext);
    Ok(mac.finalize().into_bytes().into())
}

/// A Sealer creates a signed capsule envelope for a target beacon round.
#[derive(Debug)]
pub struct Sealer<'a, R, O, S, C = ChaCha20Cipher> {
    // Beacon chain parameters. Must come from an authoritative query.
    chain: ChainDescriptor,

    // The round at which the capsule becomes unlockable.
    target_round: u64,

    // An exclusive reference to a random number generator.
    rng: &'a mut R,

    // The injected timelock primitive.
    oracle: &'a O,

    // The injected envelope signer.
    signer: &'a S,

    // The symmetric cipher used for the private variant's tail.
    cipher: C,
}

impl<'a, R, O, S> Sealer<'a, R, O, S, ChaCha20Cipher>
where
    R: RngCore + CryptoRng,
    O: TimelockOracle,
    S: EnvelopeSigner,
{
    /// Creates a new [`Sealer`] targeting the smallest round at or after
    /// `unlock_time`.
    pub fn new(
        chain: &ChainDescriptor,
        unlock_time: u64,
        oracle: &'a O,
        signer: &'a S,
        rng: &'a mut R,
    ) -> Result<Self, Error> {
        let target_round = chain.target_round(unlock_time)?;
        Ok(Self::for_round(chain, target_round, oracle, signer, rng))
    }

    /// Creates a new [`Sealer`] for an explicit target round.
    pub fn for_round(
        chain: &ChainDescriptor,
        target_round: u64,
        oracle: &'a O,
        signer: &'a S,
        rng: &'a mut R,
    ) -> Self {
        Sealer {
            chain: chain.clone(),
            target_round,
            rng,
            oracle,
            signer,
            cipher: ChaCha20Cipher,
        }
    }
}

impl<'a, R, O, S, C> Sealer<'a, R, O, S, C>
where
    R: RngCore + CryptoRng,
    O: TimelockOracle,
    S: EnvelopeSigner,
    C: SymmetricCipher,
{
    /// Replaces the symmetric cipher used for private capsules.
    pub fn with_cipher<C2: SymmetricCipher>(self, cipher: C2) -> Sealer<'a, R, O, S, C2> {
        Sealer {
            chain: self.chain,
            target_round: self.target_round,
            rng: self.rng,
            oracle: self.oracle,
            signer: self.signer,
            cipher,
        }
    }

    /// The round this sealer locks to.
    pub fn target_round(&self) -> u64 {
        self.target_round
    }

    /// Seals a public capsule: the oracle locks the plaintext directly.
    pub fn seal_public(self, plaintext: &[u8], created_at: u64) -> Result<Envelope, Error> {
        let tlock_blob = self
            .oracle
            .lock(plaintext, &self.chain.chain_id, self.target_round)?;
        vet_locked_blob(&tlock_blob)?;

        let content = Payload::Public { tlock_blob }.to_base64()?;
        let unsigned = UnsignedEnvelope {
            created_at,
            kind: KIND_TIME_CAPSULE,
            tags: vec![
                tlock_tag(&self.chain.chain_id, self.target_round),
                alt_tag("time capsule"),
            ],
            content,
        };

        self.signer.sign(&unsigned)
    }

    /// Seals a private capsule: the oracle locks a fresh ephemeral secret,
    /// and the plaintext travels in a padded, encrypted, authenticated
    /// tail. At least one recipient is required.
    pub fn seal_private(
        self,
        plaintext: &[u8],
        recipients: &[&str],
        created_at: u64,
    ) -> Result<Envelope, Error> {
        if recipients.is_empty() {
            return Err(Error::MissingMetadata("recipient tag"));
        }

        // Zeroizing scrubs the secret on every exit path, including the
        // `?` returns below.
        let mut secret = Zeroizing::new([0u8; EPHEMERAL_SECRET_SIZE]);
        self.rng.fill_bytes(&mut *secret);
        let mut nonce = [0u8; NONCE_SIZE];
        self.rng.fill_bytes(&mut nonce);

        let tlock_blob = self
            .oracle
            .lock(&*secret, &self.chain.chain_id, self.target_round)?;
        vet_locked_blob(&tlock_blob)?;

        let keys = DerivedKeys::derive(&*secret, &nonce)?;
        drop(secret);

        let mut ciphertext = padding::pad(plaintext, self.rng)?;
        self.cipher
            .apply(&keys.enc_key, &keys.enc_nonce, &mut ciphertext)?;
        let tag = authentication_tag(&keys.mac_key, &nonce, &ciphertext)?;

        let content = Payload::Private {
            tlock_blob,
            nonce,
            ciphertext,
            tag,
        }
        .to_base64()?;

        let mut tags: Vec<Vec<String>> = recipients.iter().map(|r| recipient_tag(r)).collect();
        tags.push(tlock_tag(&self.chain.chain_id, self.target_round));
        tags.push(alt_tag("private time capsule"));

        let unsigned = UnsignedEnvelope {
            created_at,
            kind: KIND_TIME_CAPSULE,
            tags,
            content,
        };

        self.signer.sign(&unsigned)
    }
}

/// An Unsealer validates and opens a received capsule envelope.
///
/// Unsealing is a two-phase process:
///
/// 1. [`Unsealer::new`] performs every signature, shape and structural
///    check. A malformed envelope is rejected here, before any
///    cryptographic work begins.
///
/// 2. [`Unsealer::unseal`] calls the oracle and, for private capsules,
///    verifies and decrypts the symmetric tail.
#[derive(Debug)]
pub struct Unsealer {
    /// The decoded capsule payload.
    pub payload: Payload,

    /// The chain and round named by the locking-metadata tag.
    pub locking: LockingMetadata,
}

impl Unsealer {
    /// Creates a new [`Unsealer`] from a received envelope.
    ///
    /// Checks, in order: identity and signature presence, signature
    /// validity, message kind, locking-tag shape, strict base64, payload
    /// structure, recipient-tag presence (private), locked-blob framing.
    pub fn new<V: EnvelopeVerifier>(envelope: Envelope, verifier: &V) -> Result<Self, Error> {
        envelope.check_identity()?;
        if !verifier.verify(&envelope)? {
            return Err(Error::SignatureInvalid);
        }
        if envelope.kind != KIND_TIME_CAPSULE {
            return Err(Error::UnexpectedKind(envelope.kind));
        }

        let locking = envelope.locking_metadata()?;
        let payload = Payload::from_base64(&envelope.content)?;

        if matches!(payload, Payload::Private { .. }) && envelope.recipients().is_empty() {
            return Err(Error::MissingMetadata("recipient tag"));
        }

        match &payload {
            Payload::Public { tlock_blob } | Payload::Private { tlock_blob, .. } => {
                vet_locked_blob(tlock_blob)?;
            }
        }

        Ok(Unsealer { payload, locking })
    }

    /// Unseals the capsule with the protocol's default cipher.
    pub fn unseal<O: TimelockOracle>(self, oracle: &O) -> Result<Vec<u8>, Error> {
        self.unseal_with(oracle, &ChaCha20Cipher)
    }

    /// Unseals the capsule with an explicit symmetric cipher.
    ///
    /// Fails with [`Error::PrematureUnlock`] while the target round is
    /// unpublished, and with [`Error::AuthenticationFailure`] on any tag
    /// mismatch; neither failure ever yields partial plaintext.
    pub fn unseal_with<O, C>(self, oracle: &O, cipher: &C) -> Result<Vec<u8>, Error>
    where
        O: TimelockOracle,
        C: SymmetricCipher,
    {
        match self.payload {
            Payload::Public { tlock_blob } => oracle.unlock(&tlock_blob, &self.locking.chain_id),
            Payload::Private {
                tlock_blob,
                nonce,
                mut ciphertext,
                tag,
            } => {
                let secret = Zeroizing::new(oracle.unlock(&tlock_blob, &self.locking.chain_id)?);
                if secret.len() != EPHEMERAL_SECRET_SIZE {
                    return Err(Error::MalformedPayload("ephemeral secret length"));
                }

                let keys = DerivedKeys::derive(&secret, &nonce)?;
                drop(secret);

                let expected = authentication_tag(&keys.mac_key, &nonce, &ciphertext)?;
                if !bool::from(expected[..].ct_eq(&tag[..])) {
                    return Err(Error::AuthenticationFailure);
                }

                cipher.apply(&keys.enc_key, &keys.enc_nonce, &mut ciphertext)?;
                padding::unpad(&ciphertext)
            }
        }
    }
}
