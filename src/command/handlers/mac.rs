//! MAC address command handlers

use super::HandlerContext;
use crate::command::{CommandError, CommandResult, Outcome};
use hosted_shared::{MacAddr, MacMode};
use tracing::debug;

/// Handle GET_MAC_ADDR command
pub async fn handle_get_mac_addr(ctx: &HandlerContext<'_>, mode: &str) -> CommandResult {
    let mode: MacMode = mode.parse()?;
    match ctx.lib.get_mac_addr(mode).await {
        Ok(mac) => {
            debug!("[MAC] {} address is {}", mode, mac);
            Ok(Outcome::Done)
        }
        Err(_) => Err(CommandError::library(format!("failed to get {} mac addr", mode))),
    }
}

/// Handle SET_MAC_ADDR command
///
/// The address is checked before the mode.
pub async fn handle_set_mac_addr(ctx: &HandlerContext<'_>, mode: &str, mac: &str) -> CommandResult {
    let mac: MacAddr = mac.parse()?;
    let mode: MacMode = mode.parse()?;

    ctx.lib
        .set_mac_addr(mode, mac)
        .await
        .map_err(|_| CommandError::library(format!("failed to set {} mac addr", mode)))?;
    Ok(Outcome::Done)
}
