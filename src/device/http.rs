use std::time::Duration;

use async_trait::async_trait;

use crate::device::model::{DeviceEndpoint, DeviceError, LedCommand};

/// Talks to the ESP32 firmware over plain HTTP: `GET {base_url}/led/{color}/{action}`.
pub struct HttpDevice {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDevice {
    pub fn new(base_url: &str, request_timeout: Duration) -> anyhow::Result<HttpDevice> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(HttpDevice {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn url_for(&self, command: &LedCommand) -> String {
        format!("{}/{}", self.base_url, command.path())
    }
}

#[async_trait]
impl DeviceEndpoint for HttpDevice {
    async fn send(&self, command: &LedCommand) -> Result<String, DeviceError> {
        let transport = |source| DeviceError::Transport {
            command: *command,
            source,
        };

        let response = self
            .client
            .get(self.url_for(command))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeviceError::Status {
                command: *command,
                status,
            });
        }

        response.text().await.map_err(transport)
    }
}
