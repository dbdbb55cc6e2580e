use tc_core::client::Unsealer;
use tc_core::envelope::Envelope;
use tc_core::error::Error;
use tc_core::rounds::ChainDescriptor;

use crate::config::BeaconConfig;
use crate::opts::UnlockOpts;
use crate::oracle::{NakSigner, TleOracle};

use std::io::Write;
use std::time::Duration;

pub async fn exec(unlock_opts: UnlockOpts) {
    let UnlockOpts {
        input,
        beacon_url,
        chains,
        wait,
        max_wait,
        output,
    } = unlock_opts;

    let mut config = BeaconConfig::new(&beacon_url);
    if let Some(path) = chains {
        let json = std::fs::read_to_string(&path).unwrap();
        config = config.with_chains_json(&json).unwrap();
    }

    let json = std::fs::read_to_string(&input).unwrap();
    let envelope = Envelope::from_json(&json).unwrap();

    let signer = NakSigner { secret_key: None };
    let unsealer = match Unsealer::new(envelope, &signer) {
        Ok(u) => u,
        Err(e) => {
            eprintln!("Invalid capsule: {}", e);
            std::process::exit(1);
        }
    };
    let locking = unsealer.locking.clone();

    let client = crate::client::Client::new(&config.base_url).unwrap();

    // Chain parameters here only drive the countdown display; the oracle
    // enforces the actual gate. A fetch failure may fall back to the local
    // registry.
    let descriptor = match client.chain_info(&locking.chain_id).await {
        Ok(info) => ChainDescriptor::new(&info.hash, info.genesis_time, info.period),
        Err(e) => {
            log::warn!("chain info fetch failed, using local parameters: {:?}", e);
            match config.known_chain(&locking.chain_id) {
                Some(known) => known.clone(),
                None => {
                    eprintln!("Unknown chain {}", locking.chain_id);
                    std::process::exit(1);
                }
            }
        }
    };

    if let Ok(latest) = client.latest_round(&locking.chain_id).await {
        if latest < locking.target_round {
            let remaining = (locking.target_round - latest) * descriptor.period;
            if !wait {
                eprintln!(
                    "Capsule opens at round {} (current round {}, roughly {} seconds left). \
                    Re-run with --wait to wait for it.",
                    locking.target_round, latest, remaining
                );
                std::process::exit(1);
            }

            eprintln!("Waiting for round {}...", locking.target_round);
            if let Err(e) = client
                .wait_for_round(
                    &locking.chain_id,
                    locking.target_round,
                    descriptor.period,
                    Duration::from_secs(max_wait),
                )
                .await
            {
                eprintln!("Gave up waiting for round: {:?}", e);
                std::process::exit(1);
            }
        }
    }

    let oracle = TleOracle {
        beacon_url: config.base_url.clone(),
    };

    match unsealer.unseal(&oracle) {
        Ok(plaintext) => match output {
            Some(path) => {
                std::fs::write(&path, plaintext).unwrap();
                eprintln!("Wrote {}", path);
            }
            None => std::io::stdout().write_all(&plaintext).unwrap(),
        },
        Err(Error::PrematureUnlock) => {
            eprintln!("The target round is not yet published.");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to open capsule: {}", e);
            std::process::exit(1);
        }
    }
}
