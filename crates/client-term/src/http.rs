use std::time::Duration;

use anyhow::Result;
use log::debug;
use reqwest::blocking::Client;
use rtrack_client::Fetch;
use rtrack_core::error::PollError;

/// Fetches the feed over http.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, PollError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| PollError::Network(e.to_string()))?;

        // Error statuses still carry a body worth decoding
        let status = response.status();
        if !status.is_success() {
            debug!("{url} answered {status}");
        }

        response
            .text()
            .map_err(|e| PollError::Network(e.to_string()))
    }
}
