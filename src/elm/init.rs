//! AT setup sequence issued on every fresh connection.

use std::time::Duration;

use tracing::{debug, info};

use crate::elm::channel::ElmChannel;
use crate::Result;

/// The adapter ignores input for a while after a reset.
const RESET_WARMUP: Duration = Duration::from_millis(1000);

/// Issued after the reset, in order: echo off, line-feeds off, spaces off, headers
/// off, protocol auto.
const SETUP_COMMANDS: [&str; 5] = ["ATE0", "ATL0", "ATS0", "ATH0", "ATSP0"];

/// Reset the adapter and put it in a state that accepts OBD-II requests. Responses
/// are discarded; a fault at any step aborts the whole connect attempt.
pub(crate) async fn initialize(channel: &ElmChannel) -> Result<()> {
    channel.execute("ATZ").await?;
    tokio::time::sleep(RESET_WARMUP).await;

    for command in SETUP_COMMANDS {
        let response = channel.execute(command).await?;
        debug!("{} -> {}", command, response);
    }

    info!("Adapter initialized");
    Ok(())
}
