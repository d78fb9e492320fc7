use async_trait::async_trait;

use crate::device::model::{DeviceEndpoint, DeviceError, LedCommand};

/// Stands in for the board when there is none on the network.
pub struct JustLog;

#[async_trait]
impl DeviceEndpoint for JustLog {
    async fn send(&self, command: &LedCommand) -> Result<String, DeviceError> {
        tracing::info!(%command, "Device command (dry run).");
        Ok("OK".to_owned())
    }
}
