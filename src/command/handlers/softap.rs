//! Soft-AP command handlers

use super::HandlerContext;
use crate::command::{CommandError, CommandResult, Outcome, StartSoftAp};
use crate::ctrl::SoftApConfig;
use crate::os::run_checked;
use hosted_shared::{limits, AuthMode, BandMode, Bandwidth};
use tracing::{error, warn};

/// Handle SOFTAP_VENDOR_IE command
pub async fn handle_softap_vendor_ie(ctx: &HandlerContext<'_>, enable: &str, data: &str) -> CommandResult {
    let enable = match enable {
        "yes" | "y" => {
            if data.is_empty() {
                return Err(CommandError::validation("Vendor IE data is expected while enabling"));
            }
            true
        }
        "no" | "n" => false,
        _ => return Err(CommandError::validation(r#"enable takes values: ["yes" | "no"]"#)),
    };

    ctx.lib.set_vendor_ie(enable, data).await;
    Ok(Outcome::Done)
}

/// Check soft-AP parameters in the order the user is told about them
fn validate(params: &StartSoftAp) -> Result<SoftApConfig, CommandError> {
    if params.sec_prot != "open" && params.pwd.is_empty() {
        return Err(CommandError::validation("password mandatory for security protocol"));
    }

    let auth: AuthMode = params.sec_prot.parse()?;
    let bandwidth = Bandwidth::try_from(params.bandwidth)?;

    if !limits::SOFTAP_MAX_CONN.contains(&params.max_conn) {
        return Err(CommandError::validation("max connections should be 1 to 10(hardware_max)"));
    }

    let band_mode = BandMode::try_from(params.band_mode).map_err(|_| {
        CommandError::validation(format!(
            "Invalid band_mode parameter {}: value should be from {} to {}",
            params.band_mode,
            BandMode::MIN,
            BandMode::MAX
        ))
    })?;

    Ok(SoftApConfig {
        ssid: params.ssid.clone(),
        pwd: params.pwd.clone(),
        channel: params.channel,
        auth,
        max_conn: params.max_conn,
        hide_ssid: params.hide_ssid,
        bandwidth,
        band_mode,
    })
}

/// Handle START_SOFTAP command
///
/// The DHCP server and interface bring-up only run once the library has
/// started the soft-AP, and neither can fail the command.
pub async fn handle_start_softap(ctx: &HandlerContext<'_>, params: &StartSoftAp) -> CommandResult {
    let config = validate(params)?;

    if ctx.lib.softap_start(&config).await.is_err() {
        return Err(CommandError::library("Failed to start ESP softap"));
    }

    if params.start_dhcp_server {
        if let Err(e) = run_checked(ctx.os, &ctx.net.dhcp_server()).await {
            warn!("[SOFTAP] DHCP server (dnsmasq) not configured/running: {}", e);
            error!(
                "[SOFTAP] Please review/edit and run 'bash -x {}' for your platform",
                ctx.net.dhcp_server_script
            );
        }
        if let Err(e) = run_checked(ctx.os, &ctx.net.softap_up()).await {
            warn!("[SOFTAP] {}", e);
        }
    }

    Ok(Outcome::Info("SoftAP started".into()))
}

/// Handle GET_SOFTAP_INFO command
pub async fn handle_get_softap_info(ctx: &HandlerContext<'_>) -> CommandResult {
    ctx.lib.softap_info().await;
    Ok(Outcome::Done)
}

/// Handle SOFTAP_CONNECTED_CLIENTS_INFO command
pub async fn handle_softap_connected_clients(ctx: &HandlerContext<'_>) -> CommandResult {
    ctx.lib.softap_connected_clients().await;
    Ok(Outcome::Done)
}

/// Handle STOP_SOFTAP command
pub async fn handle_stop_softap(ctx: &HandlerContext<'_>) -> CommandResult {
    if ctx.lib.softap_stop().await.is_err() {
        return Err(CommandError::library("Failed to stop SoftAP"));
    }

    if let Err(e) = run_checked(ctx.os, &ctx.net.softap_down()).await {
        warn!("[SOFTAP] {}", e);
    }
    Ok(Outcome::Info("SoftAP stopped".into()))
}
