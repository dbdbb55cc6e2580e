use indicatif::{ProgressBar, ProgressStyle};
use lazy_static::lazy_static;
use reqwest::{ClientBuilder, Url};
use serde::Deserialize;
use std::time::Duration;
use tokio::time::{sleep, Instant};

const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

lazy_static! {
    static ref USER_AGENT: String = format!("tc-cli/{PKG_VERSION}");
}

pub struct Client<'a> {
    baseurl: &'a str,
    client: reqwest::Client,
}

#[derive(Debug)]
pub enum ClientError {
    Timeout,
    Reqwest(reqwest::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Reqwest(e)
    }
}

/// Chain parameters as served by the beacon's `/info` endpoint.
#[derive(Deserialize, Debug)]
pub struct ChainInfo {
    pub hash: String,
    pub genesis_time: u64,
    pub period: u64,
}

#[derive(Deserialize, Debug)]
pub struct Beacon {
    pub round: u64,
}

impl<'a> Client<'a> {
    pub fn new(baseurl: &'a str) -> Result<Client<'a>, ClientError> {
        let client = ClientBuilder::new()
            .user_agent(USER_AGENT.as_str())
            .build()?;
        Ok(Client { baseurl, client })
    }

    fn create_url(&self, u: &str) -> Url {
        Url::parse(self.baseurl).unwrap().join(u).unwrap()
    }

    pub async fn chain_info(&self, chain: &str) -> Result<ChainInfo, ClientError> {
        let res = self
            .client
            .get(self.create_url(&format!("{chain}/info")))
            .send()
            .await?
            .error_for_status()?
            .json::<ChainInfo>()
            .await?;

        Ok(res)
    }

    pub async fn latest_round(&self, chain: &str) -> Result<u64, ClientError> {
        let res = self
            .client
            .get(self.create_url(&format!("{chain}/public/latest")))
            .send()
            .await?
            .error_for_status()?
            .json::<Beacon>()
            .await?;

        Ok(res.round)
    }

    /// Polls the beacon once per period until `target` is published or
    /// `max_wait` elapses, showing the remaining rounds as a progress bar.
    pub async fn wait_for_round(
        &self,
        chain: &str,
        target: u64,
        period: u64,
        max_wait: Duration,
    ) -> Result<(), ClientError> {
        let deadline = Instant::now() + max_wait;

        let start = self.latest_round(chain).await?;
        if start >= target {
            return Ok(());
        }

        let pb = ProgressBar::new(target - start);
        pb.set_style(ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] round {pos}/{len} ({eta} left)").unwrap()
            .progress_chars("#>-"));

        loop {
            if Instant::now() >= deadline {
                pb.abandon();
                return Err(ClientError::Timeout);
            }

            sleep(Duration::from_secs(period.max(1))).await;

            let latest = self.latest_round(chain).await?;
            pb.set_position(latest.saturating_sub(start).min(target - start));
            if latest >= target {
                pb.finish();
                return Ok(());
            }
        }
    }
}
