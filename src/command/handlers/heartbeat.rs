//! Heartbeat configuration handler

use super::HandlerContext;
use crate::command::{CommandError, CommandResult, Outcome, ParamValue, SessionState};
use hosted_shared::limits;
use tracing::{debug, info};

/// Handle HEARTBEAT command
///
/// Disabling only reaches the library when this session enabled the
/// heartbeat earlier; either way the session ends up with it off.
pub async fn handle_heartbeat(
    ctx: &HandlerContext<'_>,
    session: &mut SessionState,
    enable: &ParamValue,
    duration: i64,
) -> CommandResult {
    let Some(enable) = enable.as_bool() else {
        return Err(CommandError::validation("Unsupported enable value"));
    };

    if enable {
        if !limits::HEARTBEAT_DURATION_SECS.contains(&duration) {
            return Err(CommandError::validation("Duration should be from 10 to 3600 seconds"));
        }
        session.heartbeat_started = true;
        ctx.lib.config_heartbeat(true, duration).await;
        info!("[HEARTBEAT] Enabled every {}s", duration);
    } else {
        if session.heartbeat_started {
            ctx.lib.config_heartbeat(false, duration).await;
            info!("[HEARTBEAT] Disabled");
        } else {
            debug!("[HEARTBEAT] Not running, nothing to disable");
        }
        session.heartbeat_started = false;
    }

    Ok(Outcome::Done)
}
