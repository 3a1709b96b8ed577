// Best-effort fetch of the current question from the local relay

use anyhow::{bail, Result};
use reqwest::StatusCode;
use soltest_common::types::Question;
use std::time::Duration;
use tracing::{debug, info};

const FETCH_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct QuestionClient {
    http: reqwest::Client,
    url: String,
}

impl QuestionClient {
    /// Client for a relay on this machine
    pub fn new(port: u16) -> reqwest::Result<Self> {
        Self::with_url(format!("http://127.0.0.1:{}/", port))
    }

    pub fn with_url(url: impl Into<String>) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    /// Fetch the stored question
    ///
    /// Any failure (relay not running, nothing stored, bad payload) yields
    /// `None` so the tester stays usable without the extension.
    pub async fn fetch(&self) -> Option<Question> {
        match self.try_fetch().await {
            Ok(question) => {
                info!(
                    name = %question.name,
                    tests = question.tests.len(),
                    interactive = question.interactive,
                    "Fetched question"
                );
                Some(question)
            }
            Err(e) => {
                debug!(url = %self.url, error = %e, "No question from relay");
                None
            }
        }
    }

    async fn try_fetch(&self) -> Result<Question> {
        let response = self.http.get(&self.url).send().await?;
        if response.status() != StatusCode::OK {
            bail!("relay answered {}", response.status());
        }
        Ok(response.json::<Question>().await?)
    }
}
