use reqwest::Client;
use anyhow::{Result, anyhow};

const DEFAULT_ENDPOINT: &str = "https://formspree.io/f/mykkgqkp";

/// Where a support submission currently stands. `Failed` keeps the form
/// editable so the user can simply resubmit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SupportStatus {
    #[default]
    Idle,
    Submitting,
    Sent,
    Failed,
}

/// One-way form relay for the support screen. Success is "the endpoint
/// answered 2xx", nothing more; there is no retry here.
#[derive(Clone)]
pub struct SupportClient {
    client: Client,
    endpoint: String,
}

impl SupportClient {
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        }
    }

    pub async fn submit(&self, name: &str, email: &str, message: &str) -> Result<()> {
        let form = [("name", name), ("email", email), ("message", message)];

        let response = self.client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("Support form rejected: {}", response.status()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error_not_a_panic() {
        // Port 1 on loopback is never listening; connection is refused
        // without touching a resolver.
        let client = SupportClient::new(Some("http://127.0.0.1:1/".to_string()));
        let result = client.submit("Alex", "a@b.com", "help").await;
        assert!(result.is_err());
    }
}
