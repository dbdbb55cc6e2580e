use clap::{Parser, ValueHint};

/// Command line interface for time capsules: messages that stay sealed
/// until a chosen drand beacon round has been published.
#[derive(Parser, Debug)]
#[clap(name = "tc-cli", version = "0.1")]
pub struct Opts {
    #[clap(subcommand)]
    pub subcmd: Subcommand,
}

#[derive(Parser, Debug)]
pub enum Subcommand {
    Lock(LockOpts),
    Unlock(UnlockOpts),
}

/// Seal a file into a capsule.
#[derive(Parser, Debug)]
#[clap(name = "Lock")]
pub struct LockOpts {
    /// Input file.
    #[clap(index = 1)]
    pub input: String,

    /// Unlock time (UNIX seconds). The capsule targets the first round at
    /// or after this moment.
    #[clap(short = 't', long)]
    pub unlock_time: Option<u64>,

    /// Explicit target round. Takes precedence over --unlock-time.
    #[clap(short, long)]
    pub round: Option<u64>,

    /// Recipient public key (hex). May be repeated; with at least one
    /// recipient the capsule is private.
    #[clap(short = 'p', long = "recipient")]
    pub recipients: Vec<String>,

    /// Beacon chain hash. Defaults to drand quicknet.
    #[clap(short, long)]
    pub chain: Option<String>,

    /// JSON file holding an array of chain descriptors, replacing the
    /// built-in registry.
    #[clap(long)]
    pub chains: Option<String>,

    /// drand HTTP endpoint.
    #[clap(short = 'u', long, default_value = "https://api.drand.sh", value_hint = ValueHint::Url)]
    pub beacon_url: String,

    /// Signing secret key, handed to the signer. Omit to let the signer
    /// use its own configuration.
    #[clap(short, long)]
    pub secret_key: Option<String>,

    /// Output file. Defaults to <input>.capsule.
    #[clap(short, long)]
    pub output: Option<String>,
}

/// Open a capsule file.
#[derive(Parser, Debug)]
#[clap(name = "Unlock")]
pub struct UnlockOpts {
    /// Input capsule file (envelope JSON).
    #[clap(index = 1)]
    pub input: String,

    /// drand HTTP endpoint.
    #[clap(short = 'u', long, default_value = "https://api.drand.sh", value_hint = ValueHint::Url)]
    pub beacon_url: String,

    /// JSON file holding an array of chain descriptors, replacing the
    /// built-in registry.
    #[clap(long)]
    pub chains: Option<String>,

    /// Wait for the target round instead of failing while it is
    /// unpublished.
    #[clap(short, long)]
    pub wait: bool,

    /// Upper bound on the wait, in seconds.
    #[clap(long, default_value = "3600")]
    pub max_wait: u64,

    /// Output file. Defaults to stdout.
    #[clap(short, long)]
    pub output: Option<String>,
}
