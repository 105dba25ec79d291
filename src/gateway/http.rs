//! HTTP placement gateway.

use std::time::Duration;

use async_trait::async_trait;

use super::{CareerRequest, PlacementResponse, SubmissionGateway};
use crate::error::GatewayError;

const GATEWAY_NAME: &str = "http";

/// Talks to a placement service over HTTP.
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpGateway {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport {
                gateway: GATEWAY_NAME.into(),
                reason: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/createCareer", self.base_url)
    }
}

#[async_trait]
impl SubmissionGateway for HttpGateway {
    fn name(&self) -> &str {
        GATEWAY_NAME
    }

    async fn create_career(
        &self,
        request: &CareerRequest,
    ) -> Result<PlacementResponse, GatewayError> {
        let resp = self
            .client
            .post(self.endpoint())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout {
                        gateway: GATEWAY_NAME.into(),
                        timeout: self.timeout,
                    }
                } else {
                    GatewayError::Transport {
                        gateway: GATEWAY_NAME.into(),
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Placement service rejected request");
            return Err(GatewayError::Status {
                gateway: GATEWAY_NAME.into(),
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<PlacementResponse>()
            .await
            .map_err(|e| GatewayError::InvalidResponse {
                gateway: GATEWAY_NAME.into(),
                reason: e.to_string(),
            })
    }
}
