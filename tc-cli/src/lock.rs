use tc_core::client::Sealer;
use tc_core::rounds::ChainDescriptor;

use crate::config::BeaconConfig;
use crate::opts::LockOpts;
use crate::oracle::{NakSigner, TleOracle};

use std::path::Path;
use std::time::SystemTime;

fn now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

pub async fn exec(lock_opts: LockOpts) {
    let mut rng = rand::thread_rng();

    let LockOpts {
        input,
        unlock_time,
        round,
        recipients,
        chain,
        chains,
        beacon_url,
        secret_key,
        output,
    } = lock_opts;

    let mut config = BeaconConfig::new(&beacon_url);
    if let Some(path) = chains {
        let json = std::fs::read_to_string(&path).unwrap();
        config = config.with_chains_json(&json).unwrap();
    }
    let chain_id = chain.unwrap_or_else(|| config.default_chain().chain_id.clone());

    // Chain parameters for locking always come from the beacon itself; a
    // stale local copy would silently shift the unlock time.
    let client = crate::client::Client::new(&config.base_url).unwrap();
    let info = match client.chain_info(&chain_id).await {
        Ok(info) => info,
        Err(e) => {
            eprintln!("Failed to fetch chain info for {}: {:?}", chain_id, e);
            std::process::exit(1);
        }
    };
    let descriptor = ChainDescriptor::new(&info.hash, info.genesis_time, info.period);

    let target_round = match (round, unlock_time) {
        (Some(r), _) => r,
        (None, Some(t)) => descriptor.target_round(t).unwrap(),
        (None, None) => {
            eprintln!("Either --round or --unlock-time is required");
            std::process::exit(1);
        }
    };

    let plaintext = std::fs::read(&input).unwrap();

    let oracle = TleOracle {
        beacon_url: config.base_url.clone(),
    };
    let signer = NakSigner { secret_key };

    eprintln!(
        "Locking {} to round {} of chain {} (opens at UNIX time {})",
        input,
        target_round,
        descriptor.chain_id,
        descriptor.round_time(target_round)
    );

    let sealer = Sealer::for_round(&descriptor, target_round, &oracle, &signer, &mut rng);

    let recipient_refs: Vec<&str> = recipients.iter().map(String::as_str).collect();
    let envelope = if recipient_refs.is_empty() {
        sealer.seal_public(&plaintext, now())
    } else {
        sealer.seal_private(&plaintext, &recipient_refs, now())
    }
    .unwrap();

    let out_path = output.unwrap_or_else(|| {
        let input_path = Path::new(&input);
        let file_name = input_path.file_name().unwrap().to_str().unwrap();
        format!("{}.{}", file_name, "capsule")
    });

    std::fs::write(&out_path, envelope.to_json().unwrap()).unwrap();
    eprintln!("Wrote {}", out_path);
}
