use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::StatusCode;
use tracing::debug;

use crate::config::LookupConfig;

use super::LookupError;

/// Blocking JSON GET shared by the lookup clients.
#[derive(Debug, Clone)]
pub(crate) struct JsonClient {
    client: Client,
    user_agent: String,
}

impl JsonClient {
    pub(crate) fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LookupError::Transport {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
        })
    }

    /// Fetch `url`. A 404 is `Ok(None)`; any other non-success status is an error.
    pub(crate) fn get(&self, url: &str) -> Result<Option<String>, LookupError> {
        debug!(url, "lookup request");
        let transport = |e: reqwest::Error| LookupError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, &self.user_agent)
            .send()
            .map_err(transport)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(LookupError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().map(Some).map_err(transport)
    }
}
