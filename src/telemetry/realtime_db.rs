use std::time::Duration;

use async_trait::async_trait;

use crate::telemetry::model::{Reading, TelemetrySource};

/// Reads a node of a hosted realtime database through its REST surface:
/// `GET {database_url}{path}.json`. A missing node comes back as JSON `null`.
pub struct RealtimeDbSource {
    client: reqwest::Client,
    url: String,
    auth: Option<String>,
}

impl RealtimeDbSource {
    pub fn new(
        database_url: &str,
        path: &str,
        auth: Option<String>,
        request_timeout: Duration,
    ) -> anyhow::Result<RealtimeDbSource> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(RealtimeDbSource {
            client,
            url: node_url(database_url, path),
            auth,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn node_url(database_url: &str, path: &str) -> String {
    format!(
        "{}/{}.json",
        database_url.trim_end_matches('/'),
        path.trim_matches('/')
    )
}

#[async_trait]
impl TelemetrySource for RealtimeDbSource {
    async fn latest(&self) -> anyhow::Result<Option<Reading>> {
        let mut request = self.client.get(&self.url);
        if let Some(auth) = &self.auth {
            request = request.query(&[("auth", auth)]);
        }

        let reading = request
            .send()
            .await?
            .error_for_status()?
            .json::<Option<Reading>>()
            .await?;
        Ok(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_url_joins_without_double_slashes() {
        assert_eq!(
            node_url("https://example-rtdb.firebaseio.com/", "/sensorReading"),
            "https://example-rtdb.firebaseio.com/sensorReading.json"
        );
        assert_eq!(
            node_url("https://example-rtdb.firebaseio.com", "sensorReading"),
            "https://example-rtdb.firebaseio.com/sensorReading.json"
        );
    }
}
