use tc_core::error::Error;
use tc_core::rounds::ChainDescriptor;

/// Beacon configuration assembled at startup and passed down explicitly.
///
/// The registry holds the chains the tool can describe without asking the
/// network; it is a fallback for display purposes only, never a substitute
/// for an authoritative `/info` query when locking.
#[derive(Debug, Clone)]
pub struct BeaconConfig {
    pub base_url: String,
    pub chains: Vec<ChainDescriptor>,
}

impl BeaconConfig {
    pub fn new(base_url: &str) -> Self {
        BeaconConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            chains: vec![ChainDescriptor::quicknet()],
        }
    }

    pub fn default_chain(&self) -> &ChainDescriptor {
        &self.chains[0]
    }

    pub fn known_chain(&self, chain_id: &str) -> Option<&ChainDescriptor> {
        self.chains.iter().find(|c| c.chain_id == chain_id)
    }

    /// Replaces the built-in registry with chains parsed from a JSON array
    /// of chain descriptors. The array must not be empty: the first entry
    /// becomes the default chain.
    pub fn with_chains_json(mut self, json: &str) -> Result<Self, Error> {
        let chains: Vec<ChainDescriptor> = serde_json::from_str(json)?;
        if chains.is_empty() {
            return Err(Error::ConstraintViolation);
        }

        self.chains = chains;
        Ok(self)
    }
}
