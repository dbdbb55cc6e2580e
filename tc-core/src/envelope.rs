//! The signed envelope carrying a capsule payload.
//!
//! The envelope schema belongs to the transport; the core reads and writes
//! only the fields named here and never interprets the rest. Signing and
//! verification are collaborator concerns behind the [`EnvelopeSigner`] and
//! [`EnvelopeVerifier`] traits.

use crate::consts::*;
use crate::error::Error;

use serde::{Deserialize, Serialize};

/// A signed envelope as it travels over the wire.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Envelope identifier, derived from the signed fields.
    pub id: String,

    /// Public key of the signing identity.
    pub pubkey: String,

    /// Creation time (UNIX seconds).
    pub created_at: u64,

    /// Numeric message-kind discriminator.
    pub kind: u32,

    /// Free-form tag set; only the tags named in this module are read.
    pub tags: Vec<Vec<String>>,

    /// Base64 (strict canonical) of the capsule payload.
    pub content: String,

    /// Signature over the envelope fields.
    pub sig: String,
}

/// Envelope fields prior to signing.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UnsignedEnvelope {
    /// Creation time (UNIX seconds).
    pub created_at: u64,

    /// Numeric message-kind discriminator.
    pub kind: u32,

    /// Tag set to be covered by the signature.
    pub tags: Vec<Vec<String>>,

    /// Base64 (strict canonical) of the capsule payload.
    pub content: String,
}

/// Locking metadata extracted from the single `tlock` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockingMetadata {
    /// Beacon chain identifier.
    pub chain_id: String,

    /// Round at which the capsule becomes unlockable.
    pub target_round: u64,
}

/// Builds the locking-metadata tag naming the chain and target round.
pub fn tlock_tag(chain_id: &str, target_round: u64) -> Vec<String> {
    vec![
        TAG_TLOCK.to_string(),
        format!("{CHAIN_FIELD_PREFIX}{chain_id}"),
        format!("{ROUND_FIELD_PREFIX}{target_round}"),
    ]
}

/// Builds a recipient tag.
pub fn recipient_tag(pubkey: &str) -> Vec<String> {
    vec![TAG_RECIPIENT.to_string(), pubkey.to_string()]
}

/// Builds a human-readable description tag. Informational only, never
/// validated.
pub fn alt_tag(description: &str) -> Vec<String> {
    vec![TAG_ALT.to_string(), description.to_string()]
}

impl Envelope {
    /// Requires the identity and signature fields to be present before any
    /// other field of a received envelope is trusted.
    pub fn check_identity(&self) -> Result<(), Error> {
        if self.id.is_empty() || self.pubkey.is_empty() || self.sig.is_empty() {
            return Err(Error::SignatureInvalid);
        }

        Ok(())
    }

    /// Extracts the locking metadata.
    ///
    /// Exactly one `tlock` tag must be present, with both the chain and
    /// round sub-fields populated; zero tags, duplicate tags, or missing
    /// sub-fields are all rejected.
    pub fn locking_metadata(&self) -> Result<LockingMetadata, Error> {
        let mut found = None;
        for tag in &self.tags {
            if tag.first().map(String::as_str) == Some(TAG_TLOCK) {
                if found.is_some() {
                    return Err(Error::MissingMetadata("duplicate tlock tag"));
                }
                found = Some(tag);
            }
        }
        let tag = found.ok_or(Error::MissingMetadata("tlock tag"))?;

        let mut chain_id = None;
        let mut target_round = None;
        for field in &tag[1..] {
            if let Some(chain) = field.strip_prefix(CHAIN_FIELD_PREFIX) {
                chain_id = Some(chain.to_string());
            } else if let Some(round) = field.strip_prefix(ROUND_FIELD_PREFIX) {
                target_round = Some(
                    round
                        .parse::<u64>()
                        .map_err(|_| Error::MissingMetadata("round sub-field"))?,
                );
            }
        }

        match (chain_id, target_round) {
            (Some(chain_id), Some(target_round)) => Ok(LockingMetadata {
                chain_id,
                target_round,
            }),
            _ => Err(Error::MissingMetadata("tlock sub-fields")),
        }
    }

    /// Public keys named in recipient tags.
    pub fn recipients(&self) -> Vec<&str> {
        self.tags
            .iter()
            .filter(|tag| tag.first().map(String::as_str) == Some(TAG_RECIPIENT))
            .filter_map(|tag| tag.get(1).map(String::as_str))
            .collect()
    }

    /// Serializes the envelope to JSON for transport.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(Error::Json)
    }

    /// Deserializes an envelope from JSON.
    pub fn from_json(s: &str) -> Result<Self, Error> {
        serde_json::from_str(s).map_err(Error::Json)
    }
}

/// Produces signed envelopes. The signing scheme itself is external.
pub trait EnvelopeSigner {
    /// Signs the envelope fields under the signer's identity.
    fn sign(&self, unsigned: &UnsignedEnvelope) -> Result<Envelope, Error>;
}

/// Verifies the identity and signature of received envelopes.
pub trait EnvelopeVerifier {
    /// Returns whether the envelope's signature matches its identity and
    /// covers its fields.
    fn verify(&self, envelope: &Envelope) -> Result<bool, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope_with_tags(tags: Vec<Vec<String>>) -> Envelope {
        Envelope {
            id: "id".to_string(),
            pubkey: "pk".to_string(),
            created_at: 1_700_000_000,
            kind: KIND_TIME_CAPSULE,
            tags,
            content: String::new(),
            sig: "sig".to_string(),
        }
    }

    #[test]
    fn test_locking_metadata_round_trip() {
        let env = envelope_with_tags(vec![tlock_tag("52db9ba7", 1234), alt_tag("capsule")]);

        let meta = env.locking_metadata().unwrap();
        assert_eq!(meta.chain_id, "52db9ba7");
        assert_eq!(meta.target_round, 1234);
    }

    #[test]
    fn test_missing_tlock_tag() {
        let env = envelope_with_tags(vec![alt_tag("no lock here")]);
        assert!(matches!(
            env.locking_metadata(),
            Err(Error::MissingMetadata(_))
        ));
    }

    #[test]
    fn test_duplicate_tlock_tag() {
        let env = envelope_with_tags(vec![tlock_tag("a", 1), tlock_tag("b", 2)]);
        assert!(matches!(
            env.locking_metadata(),
            Err(Error::MissingMetadata(_))
        ));
    }

    #[test]
    fn test_incomplete_tlock_tag() {
        let env = envelope_with_tags(vec![vec![
            TAG_TLOCK.to_string(),
            format!("{CHAIN_FIELD_PREFIX}52db"),
        ]]);
        assert!(matches!(
            env.locking_metadata(),
            Err(Error::MissingMetadata(_))
        ));

        let env = envelope_with_tags(vec![vec![
            TAG_TLOCK.to_string(),
            format!("{CHAIN_FIELD_PREFIX}52db"),
            format!("{ROUND_FIELD_PREFIX}not-a-number"),
        ]]);
        assert!(matches!(
            env.locking_metadata(),
            Err(Error::MissingMetadata(_))
        ));
    }

    #[test]
    fn test_recipients() {
        let env = envelope_with_tags(vec![
            recipient_tag("alice"),
            tlock_tag("c", 9),
            recipient_tag("bob"),
        ]);
        assert_eq!(env.recipients(), vec!["alice", "bob"]);

        let env = envelope_with_tags(vec![tlock_tag("c", 9)]);
        assert!(env.recipients().is_empty());
    }

    #[test]
    fn test_check_identity() {
        let mut env = envelope_with_tags(vec![]);
        env.check_identity().unwrap();

        env.sig = String::new();
        assert!(matches!(env.check_identity(), Err(Error::SignatureInvalid)));
    }

    #[test]
    fn test_json_round_trip() {
        let env = envelope_with_tags(vec![tlock_tag("52db", 77), recipient_tag("bob")]);
        let json = env.to_json().unwrap();
        assert_eq!(Envelope::from_json(&json).unwrap(), env);
    }
}
