//! Station-mode command handlers (scan, connect, disconnect)

use super::HandlerContext;
use crate::command::{CommandError, CommandResult, ConnectAp, Outcome};
use crate::ctrl::StationConfig;
use crate::os::{run_best_effort, run_plan, Step};
use hosted_shared::BandMode;
use tracing::info;

/// Handle GET_AP_SCAN_LIST command
pub async fn handle_get_available_wifi(ctx: &HandlerContext<'_>) -> CommandResult {
    ctx.lib.get_available_wifi().await;
    Ok(Outcome::Done)
}

/// Handle CONNECT_AP command
///
/// With `set_dhcp`, the station lease is released and renewed once the
/// library reports the association. A failed renewal fails the command.
pub async fn handle_connect_ap(ctx: &HandlerContext<'_>, params: &ConnectAp) -> CommandResult {
    let band_mode = BandMode::try_from(params.band_mode)?;

    let config = StationConfig {
        ssid: params.ssid.clone(),
        pwd: params.pwd.clone(),
        bssid: params.bssid.clone(),
        use_wpa3: params.use_wpa3,
        listen_interval: params.listen_interval,
        band_mode,
    };

    if ctx.lib.station_connect(&config).await.is_err() {
        return Err(CommandError::library("Failed to connect AP"));
    }
    info!("[STA] Associated with {}", params.ssid);

    if params.set_dhcp {
        let steps = [
            Step::best_effort(ctx.net.dhcp_release()),
            Step::required(ctx.net.dhcp_renew()),
        ];
        run_plan(ctx.os, &steps)
            .await
            .map_err(|e| CommandError::OsCommand(format!("Failed during DHCP operations: {}", e)))?;
    }

    Ok(Outcome::Info(format!("Connected to {}", params.ssid)))
}

/// Handle GET_CONNECTED_AP_INFO command
pub async fn handle_get_connected_ap_info(ctx: &HandlerContext<'_>) -> CommandResult {
    ctx.lib.station_info().await;
    Ok(Outcome::Done)
}

/// Handle DISCONNECT_AP command
pub async fn handle_disconnect_ap(ctx: &HandlerContext<'_>, reset_dhcp: bool) -> CommandResult {
    ctx.lib.station_disconnect().await;

    if reset_dhcp {
        run_best_effort(ctx.os, &[ctx.net.dhcp_release()]).await;
    }
    Ok(Outcome::Done)
}
