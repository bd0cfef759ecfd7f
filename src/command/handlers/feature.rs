//! Wi-Fi and Bluetooth enable/disable handlers
//!
//! Switching a feature also moves the matching host interfaces: the two
//! network interfaces for Wi-Fi, the HCI device for Bluetooth. Failures on the
//! host side are logged and do not fail the command.

use super::HandlerContext;
use crate::command::{CommandResult, Outcome};
use crate::ctrl::Feature;
use crate::os::{down_hci_instance, down_net_interface, reset_hci_instance, up_net_interface};
use hosted_shared::MacMode;
use tracing::error;

/// Handle ENABLE_WIFI command
pub async fn handle_enable_wifi(ctx: &HandlerContext<'_>) -> CommandResult {
    ctx.lib.enable_feature(Feature::Wifi).await;

    let interfaces = [
        (MacMode::Station, &ctx.net.sta_interface),
        (MacMode::SoftAp, &ctx.net.softap_interface),
    ];
    for (mode, interface) in interfaces {
        match ctx.lib.get_mac_addr(mode).await {
            Ok(mac) => up_net_interface(ctx.os, ctx.net, interface, mac).await,
            Err(e) => error!("[WIFI] Could not read {} MAC, leaving {} as is: {}", mode, interface, e),
        }
    }
    Ok(Outcome::Done)
}

/// Handle DISABLE_WIFI command
pub async fn handle_disable_wifi(ctx: &HandlerContext<'_>) -> CommandResult {
    ctx.lib.disable_feature(Feature::Wifi).await;
    down_net_interface(ctx.os, ctx.net, &ctx.net.sta_interface).await;
    down_net_interface(ctx.os, ctx.net, &ctx.net.softap_interface).await;
    Ok(Outcome::Done)
}

/// Handle ENABLE_BT command
pub async fn handle_enable_bt(ctx: &HandlerContext<'_>) -> CommandResult {
    ctx.lib.enable_feature(Feature::Bluetooth).await;
    reset_hci_instance(ctx.os, ctx.net).await;
    Ok(Outcome::Done)
}

/// Handle DISABLE_BT command
pub async fn handle_disable_bt(ctx: &HandlerContext<'_>) -> CommandResult {
    ctx.lib.disable_feature(Feature::Bluetooth).await;
    down_hci_instance(ctx.os, ctx.net).await;
    Ok(Outcome::Done)
}
