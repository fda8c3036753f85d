use std::collections::HashMap;
use std::time::Duration;

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};

use notifier_domain::models::{AuthDescriptor, DeliveryOutcome, HttpMethod};
use notifier_domain::{NotifierError, NotifierResult};

/// Performs one HTTP delivery attempt and normalizes the result.
///
/// Any received HTTP status is a completed attempt: 2xx is a success,
/// everything else is a remote rejection carried inside the outcome.
/// Only transport-level failures (no response at all) surface as errors,
/// which the retry scheduler treats the same as a rejection.
pub struct DeliveryChannel {
    http_client: reqwest::Client,
}

impl DeliveryChannel {
    pub fn new() -> Self {
        Self {
            http_client: reqwest::Client::new(),
        }
    }

    pub async fn deliver(
        &self,
        url: &str,
        method: HttpMethod,
        headers: &HashMap<String, String>,
        auth: &AuthDescriptor,
        body: &Value,
        timeout: Duration,
    ) -> NotifierResult<DeliveryOutcome> {
        let method = match method {
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Get => Method::GET,
        };

        // json() sets the Content-Type default; target headers applied
        // afterwards may override it
        let mut request = self
            .http_client
            .request(method, url)
            .timeout(timeout)
            .json(body);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        request = match auth {
            AuthDescriptor::None => request,
            AuthDescriptor::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            AuthDescriptor::Bearer { token } => request.bearer_auth(token),
        };

        match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                let response_body = response.text().await.unwrap_or_default();
                if (200..300).contains(&status) {
                    debug!("Delivery to {} succeeded with HTTP {}", url, status);
                } else {
                    warn!("Delivery to {} rejected with HTTP {}", url, status);
                }
                Ok(DeliveryOutcome::responded(status, response_body))
            }
            Err(e) => {
                warn!("Delivery to {} failed at transport level: {}", url, e);
                Err(NotifierError::transport_error(e.to_string()))
            }
        }
    }
}

impl Default for DeliveryChannel {
    fn default() -> Self {
        Self::new()
    }
}
