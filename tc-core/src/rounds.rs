//! Beacon round arithmetic.
//!
//! Maps wall-clock times to beacon round numbers. The encrypt path uses
//! [`ChainDescriptor::target_round`], which rounds *up*: flooring would let
//! a holder of the locked blob decrypt one round early.

use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Metadata describing a randomness beacon chain.
///
/// Supplied by the beacon's metadata service and treated as read-only input.
/// The parameters used on the encrypt path must come from an authoritative
/// query, never from a fallback value.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChainDescriptor {
    /// Hex-encoded chain identifier.
    pub chain_id: String,

    /// UNIX time at which the chain started emitting rounds.
    pub genesis_time: u64,

    /// Seconds between consecutive rounds.
    pub period: u64,
}

impl ChainDescriptor {
    /// Creates a new descriptor.
    pub fn new(chain_id: impl Into<String>, genesis_time: u64, period: u64) -> Self {
        ChainDescriptor {
            chain_id: chain_id.into(),
            genesis_time,
            period,
        }
    }

    /// The drand quicknet production chain.
    pub fn quicknet() -> Self {
        Self::new(
            crate::consts::QUICKNET_CHAIN_ID,
            crate::consts::QUICKNET_GENESIS_TIME,
            crate::consts::QUICKNET_PERIOD,
        )
    }

    /// Computes the smallest round whose start time is not before
    /// `unlock_time`, clamped to a minimum of round 1.
    ///
    /// Integer ceiling division only; no floating point.
    pub fn target_round(&self, unlock_time: u64) -> Result<u64, Error> {
        if self.period == 0 {
            return Err(Error::ConstraintViolation);
        }

        let elapsed = unlock_time.saturating_sub(self.genesis_time);
        Ok(elapsed.div_ceil(self.period).max(1))
    }

    /// Computes the round current at `now`, clamped to a minimum of round 1.
    ///
    /// Floor division. Only suitable for progress display; the encrypt path
    /// must use [`Self::target_round`].
    pub fn current_round(&self, now: u64) -> Result<u64, Error> {
        if self.period == 0 {
            return Err(Error::ConstraintViolation);
        }

        let elapsed = now.saturating_sub(self.genesis_time);
        Ok((elapsed / self.period).max(1))
    }

    /// The wall-clock time at which `round` starts.
    pub fn round_time(&self, round: u64) -> u64 {
        self.genesis_time
            .saturating_add(round.saturating_mul(self.period))
    }
}
