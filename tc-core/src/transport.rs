//! Publish/query transport boundary.
//!
//! The transport distributing envelopes is a collaborator; the core only
//! defines the request/response contract. Both operations carry a bounded
//! wait, and a query timeout yields an empty result rather than an error
//! that aborts the whole flow.

use crate::envelope::Envelope;
use crate::error::Error;

use core::time::Duration;
use serde::Serialize;

/// Filter selecting envelopes from a query.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Filter {
    /// Restrict to these message kinds.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub kinds: Vec<u32>,

    /// Restrict to these author public keys.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,

    /// Maximum number of results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl Filter {
    /// A filter matching all capsule envelopes.
    pub fn capsules() -> Self {
        Filter {
            kinds: vec![crate::consts::KIND_TIME_CAPSULE],
            ..Filter::default()
        }
    }

    /// Whether the envelope passes this filter.
    pub fn matches(&self, envelope: &Envelope) -> bool {
        (self.kinds.is_empty() || self.kinds.contains(&envelope.kind))
            && (self.authors.is_empty() || self.authors.contains(&envelope.pubkey))
    }
}

/// The transport's verdict on a published envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The envelope was accepted for distribution.
    Accepted,
    /// The envelope was rejected, with the transport's reason.
    Rejected(String),
}

/// Request/response transport with bounded waits.
pub trait Transport {
    /// Publishes a signed envelope.
    fn publish(&mut self, envelope: &Envelope) -> Result<PublishOutcome, Error>;

    /// Queries envelopes matching `filter`, waiting at most `timeout` for
    /// the end-of-results marker. A timeout returns whatever arrived.
    fn query(&mut self, filter: &Filter, timeout: Duration) -> Result<Vec<Envelope>, Error>;
}
