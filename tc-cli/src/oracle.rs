use tc_core::envelope::{Envelope, EnvelopeSigner, EnvelopeVerifier, UnsignedEnvelope};
use tc_core::error::Error;
use tc_core::oracle::TimelockOracle;

use std::io::Write;
use std::process::{Command, Stdio};

enum RunError {
    Io(String),
    Failed(String),
}

fn run(mut cmd: Command, stdin_data: &[u8]) -> Result<Vec<u8>, RunError> {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| RunError::Io(e.to_string()))?;

    {
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| RunError::Io("stdin unavailable".to_string()))?;
        stdin
            .write_all(stdin_data)
            .map_err(|e| RunError::Io(e.to_string()))?;
    }

    let out = child
        .wait_with_output()
        .map_err(|e| RunError::Io(e.to_string()))?;

    if !out.status.success() {
        let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
        return Err(RunError::Failed(stderr));
    }

    Ok(out.stdout)
}

/// Timelock oracle backed by the drand `tle` binary.
///
/// `tle` does the pairing cryptography and talks to the beacon itself; this
/// side only pipes bytes through stdin/stdout.
#[derive(Debug, Clone)]
pub struct TleOracle {
    pub beacon_url: String,
}

impl TimelockOracle for TleOracle {
    fn lock(&self, plaintext: &[u8], chain_id: &str, round: u64) -> Result<Vec<u8>, Error> {
        let mut cmd = Command::new("tle");
        cmd.args([
            "-n",
            &self.beacon_url,
            "-c",
            chain_id,
            "-r",
            &round.to_string(),
        ]);

        run(cmd, plaintext).map_err(|e| match e {
            RunError::Io(msg) => Error::Oracle(format!("tle: {msg}")),
            RunError::Failed(stderr) => Error::Oracle(format!("tle: {stderr}")),
        })
    }

    fn unlock(&self, blob: &[u8], chain_id: &str) -> Result<Vec<u8>, Error> {
        let mut cmd = Command::new("tle");
        cmd.args(["-d", "-n", &self.beacon_url, "-c", chain_id]);

        run(cmd, blob).map_err(|e| match e {
            RunError::Io(msg) => Error::Oracle(format!("tle: {msg}")),
            // tle reports an unpublished round as "too early".
            RunError::Failed(stderr) if stderr.contains("too early") => Error::PrematureUnlock,
            RunError::Failed(stderr) => Error::Oracle(format!("tle: {stderr}")),
        })
    }
}

/// Envelope signer and verifier backed by the `nak` binary.
///
/// The key never enters this process unless passed on the command line; by
/// default `nak` uses its own configured identity.
#[derive(Debug, Clone)]
pub struct NakSigner {
    pub secret_key: Option<String>,
}

impl EnvelopeSigner for NakSigner {
    fn sign(&self, unsigned: &UnsignedEnvelope) -> Result<Envelope, Error> {
        let mut cmd = Command::new("nak");
        cmd.arg("event");
        if let Some(sec) = &self.secret_key {
            cmd.args(["--sec", sec]);
        }
        cmd.args(["-k", &unsigned.kind.to_string()]);
        cmd.args(["--ts", &unsigned.created_at.to_string()]);
        for tag in &unsigned.tags {
            if let Some((name, rest)) = tag.split_first() {
                cmd.args(["-t", &format!("{}={}", name, rest.join(";"))]);
            }
        }
        cmd.args(["-c", &unsigned.content]);

        let out = run(cmd, &[]).map_err(|e| match e {
            RunError::Io(msg) => Error::Transport(format!("nak: {msg}")),
            RunError::Failed(stderr) => Error::Transport(format!("nak: {stderr}")),
        })?;

        let json = String::from_utf8(out)
            .map_err(|_| Error::Transport("nak: non-UTF-8 output".to_string()))?;
        Envelope::from_json(json.trim())
    }
}

impl EnvelopeVerifier for NakSigner {
    fn verify(&self, envelope: &Envelope) -> Result<bool, Error> {
        let json = envelope.to_json()?;

        let mut cmd = Command::new("nak");
        cmd.arg("verify");

        match run(cmd, json.as_bytes()) {
            Ok(_) => Ok(true),
            Err(RunError::Failed(_)) => Ok(false),
            Err(RunError::Io(msg)) => Err(Error::Transport(format!("nak: {msg}"))),
        }
    }
}
