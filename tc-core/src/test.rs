//! Test helpers: in-memory stand-ins for the oracle, signer and transport
//! collaborators.

use crate::consts::AGE_V1_MAGIC;
use crate::envelope::{Envelope, EnvelopeSigner, EnvelopeVerifier, UnsignedEnvelope};
use crate::error::Error;
use crate::oracle::TimelockOracle;
use crate::rounds::ChainDescriptor;
use crate::transport::{Filter, PublishOutcome, Transport};

use core::time::Duration;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// A timelock oracle that keeps plaintexts in memory and releases them once
/// their round has been "published" via [`MockOracle::publish_round`].
///
/// Lock blobs carry the real binary framing so vetting code sees the same
/// shape it would from a production oracle.
#[derive(Debug)]
pub struct MockOracle {
    current_round: AtomicU64,
    store: Mutex<Vec<(String, u64, Vec<u8>)>>,
}

impl MockOracle {
    /// Creates an oracle whose latest published round is `current_round`.
    pub fn new(current_round: u64) -> Self {
        MockOracle {
            current_round: AtomicU64::new(current_round),
            store: Mutex::new(Vec::new()),
        }
    }

    /// Advances the latest published round to at least `round`.
    pub fn publish_round(&self, round: u64) {
        self.current_round.fetch_max(round, Ordering::SeqCst);
    }

    /// The latest published round.
    pub fn current_round(&self) -> u64 {
        self.current_round.load(Ordering::SeqCst)
    }
}

impl TimelockOracle for MockOracle {
    fn lock(&self, plaintext: &[u8], chain_id: &str, round: u64) -> Result<Vec<u8>, Error> {
        let mut store = self
            .store
            .lock()
            .map_err(|_| Error::Oracle("store poisoned".to_string()))?;
        let index = store.len() as u64;
        store.push((chain_id.to_string(), round, plaintext.to_vec()));

        let mut blob = AGE_V1_MAGIC.to_vec();
        blob.push(b'\n');
        blob.extend_from_slice(&round.to_be_bytes());
        blob.extend_from_slice(&index.to_be_bytes());
        Ok(blob)
    }

    fn unlock(&self, blob: &[u8], chain_id: &str) -> Result<Vec<u8>, Error> {
        let body = blob
            .strip_prefix(AGE_V1_MAGIC)
            .and_then(|rest| rest.strip_prefix(b"\n"))
            .ok_or(Error::Encoding("locked blob framing"))?;
        if body.len() != 16 {
            return Err(Error::Encoding("locked blob framing"));
        }

        let round = u64::from_be_bytes(body[..8].try_into()?);
        let index = u64::from_be_bytes(body[8..].try_into()?);
        if round > self.current_round() {
            return Err(Error::PrematureUnlock);
        }

        let store = self
            .store
            .lock()
            .map_err(|_| Error::Oracle("store poisoned".to_string()))?;
        let (stored_chain, _, plaintext) = store
            .get(index as usize)
            .ok_or_else(|| Error::Oracle("unknown blob".to_string()))?;
        if stored_chain != chain_id {
            return Err(Error::Oracle("chain mismatch".to_string()));
        }

        Ok(plaintext.clone())
    }
}

/// A signer/verifier pair backed by SHA-256 over a shared secret.
///
/// Not a real signature scheme; it only gives tests a `sign` that produces
/// internally consistent envelopes and a `verify` that notices tampering.
#[derive(Debug, Clone)]
pub struct MockSigner {
    secret: [u8; 32],
    pubkey: String,
}

impl MockSigner {
    /// Creates a signer for the given secret and public-key string.
    pub fn new(secret: &[u8; 32], pubkey: &str) -> Self {
        MockSigner {
            secret: *secret,
            pubkey: pubkey.to_string(),
        }
    }

    fn identity(&self, pubkey: &str, unsigned: &UnsignedEnvelope) -> Result<String, Error> {
        let serialized = serde_json::to_vec(&(
            0u8,
            pubkey,
            unsigned.created_at,
            unsigned.kind,
            &unsigned.tags,
            &unsigned.content,
        ))?;
        Ok(hex(&Sha256::digest(&serialized)))
    }

    fn signature(&self, id: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret);
        hasher.update(id.as_bytes());
        hex(&hasher.finalize())
    }

    /// Re-signs an envelope with replacement content, keeping every other
    /// field. Lets tests alter a payload without tripping the signature
    /// check.
    pub fn resign(&self, envelope: &Envelope, content: String) -> Envelope {
        self.resign_unsigned(envelope.pubkey.clone(), UnsignedEnvelope {
            created_at: envelope.created_at,
            kind: envelope.kind,
            tags: envelope.tags.clone(),
            content,
        })
    }

    /// Re-signs an envelope as-is, refreshing `id` and `sig` after a field
    /// edit.
    pub fn resign_tags(&self, envelope: &Envelope) -> Envelope {
        self.resign_unsigned(envelope.pubkey.clone(), UnsignedEnvelope {
            created_at: envelope.created_at,
            kind: envelope.kind,
            tags: envelope.tags.clone(),
            content: envelope.content.clone(),
        })
    }

    fn resign_unsigned(&self, pubkey: String, unsigned: UnsignedEnvelope) -> Envelope {
        let id = self
            .identity(&pubkey, &unsigned)
            .unwrap_or_else(|_| "broken".to_string());
        let sig = self.signature(&id);
        Envelope {
            id,
            pubkey,
            created_at: unsigned.created_at,
            kind: unsigned.kind,
            tags: unsigned.tags,
            content: unsigned.content,
            sig,
        }
    }
}

impl EnvelopeSigner for MockSigner {
    fn sign(&self, unsigned: &UnsignedEnvelope) -> Result<Envelope, Error> {
        Ok(self.resign_unsigned(self.pubkey.clone(), unsigned.clone()))
    }
}

impl EnvelopeVerifier for MockSigner {
    fn verify(&self, envelope: &Envelope) -> Result<bool, Error> {
        let unsigned = UnsignedEnvelope {
            created_at: envelope.created_at,
            kind: envelope.kind,
            tags: envelope.tags.clone(),
            content: envelope.content.clone(),
        };
        let id = self.identity(&envelope.pubkey, &unsigned)?;
        Ok(id == envelope.id && self.signature(&id) == envelope.sig)
    }
}

/// A transport that collects published envelopes in a vector.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    published: Vec<Envelope>,
}

impl Transport for MemoryTransport {
    fn publish(&mut self, envelope: &Envelope) -> Result<PublishOutcome, Error> {
        if envelope.id.is_empty() || envelope.sig.is_empty() {
            return Ok(PublishOutcome::Rejected("missing identity".to_string()));
        }
        self.published.push(envelope.clone());
        Ok(PublishOutcome::Accepted)
    }

    fn query(&mut self, filter: &Filter, _timeout: Duration) -> Result<Vec<Envelope>, Error> {
        let mut results: Vec<Envelope> = self
            .published
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        if let Some(limit) = filter.limit {
            results.truncate(limit);
        }
        Ok(results)
    }
}

/// Bundles a chain descriptor and mock collaborators for tests.
#[derive(Debug)]
pub struct TestSetup {
    /// A synthetic beacon chain with a 3-second period.
    pub chain: ChainDescriptor,

    /// Oracle with round 100 as the latest published round.
    pub oracle: MockOracle,

    /// Signer/verifier pair with a random secret.
    pub signer: MockSigner,

    /// Empty in-memory transport.
    pub transport: MemoryTransport,
}

impl TestSetup {
    /// Creates a fresh setup. The oracle starts at round 100, so rounds
    /// above that are unpublished until [`MockOracle::publish_round`].
    pub fn new<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut secret = [0u8; 32];
        rng.fill_bytes(&mut secret);

        TestSetup {
            chain: ChainDescriptor::new("test-chain", 1_699_999_000, 3),
            oracle: MockOracle::new(100),
            signer: MockSigner::new(&secret, "author-pk"),
            transport: MemoryTransport::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::KIND_TIME_CAPSULE;

    #[test]
    fn test_mock_oracle_gates_on_round() {
        let oracle = MockOracle::new(10);
        let blob = oracle.lock(b"later", "chain", 20).unwrap();

        assert!(matches!(
            oracle.unlock(&blob, "chain"),
            Err(Error::PrematureUnlock)
        ));

        oracle.publish_round(20);
        assert_eq!(oracle.unlock(&blob, "chain").unwrap(), b"later");
        assert!(oracle.unlock(&blob, "other-chain").is_err());
    }

    #[test]
    fn test_mock_signer_round_trip() {
        let signer = MockSigner::new(&[7u8; 32], "pk");
        let env = signer
            .sign(&UnsignedEnvelope {
                created_at: 1,
                kind: KIND_TIME_CAPSULE,
                tags: vec![],
                content: "abc".to_string(),
            })
            .unwrap();

        assert!(signer.verify(&env).unwrap());

        let mut tampered = env;
        tampered.content = "xyz".to_string();
        assert!(!signer.verify(&tampered).unwrap());
    }

    #[test]
    fn test_memory_transport_publish_and_query() {
        let signer = MockSigner::new(&[7u8; 32], "pk");
        let env = signer
            .sign(&UnsignedEnvelope {
                created_at: 1,
                kind: KIND_TIME_CAPSULE,
                tags: vec![],
                content: String::new(),
            })
            .unwrap();

        let mut transport = MemoryTransport::default();
        assert_eq!(
            transport.publish(&env).unwrap(),
            PublishOutcome::Accepted
        );

        let results = transport
            .query(&Filter::capsules(), Duration::from_secs(1))
            .unwrap();
        assert_eq!(results, vec![env]);

        let none = transport
            .query(
                &Filter {
                    kinds: vec![1],
                    ..Filter::default()
                },
                Duration::from_secs(1),
            )
            .unwrap();
        assert!(none.is_empty());
    }
}
