//! Firmware, regulatory and OTA handlers

use super::HandlerContext;
use crate::command::{CommandError, CommandResult, Outcome};
use tracing::info;

/// Handle GET_FW_VERSION command
pub async fn handle_get_fw_version(ctx: &HandlerContext<'_>) -> CommandResult {
    ctx.lib.get_fw_version().await;
    Ok(Outcome::Done)
}

/// Handle GET_COUNTRY_CODE command
pub async fn handle_get_country_code(ctx: &HandlerContext<'_>) -> CommandResult {
    ctx.lib.get_country_code().await;
    Ok(Outcome::Done)
}

/// Handle SET_COUNTRY_CODE command
pub async fn handle_set_country_code(ctx: &HandlerContext<'_>, country: &str, ieee80211d: bool) -> CommandResult {
    ctx.lib.set_country_code(country, ieee80211d).await;
    Ok(Outcome::Done)
}

/// Handle OTA_UPDATE command
///
/// The library's own report is the result: empty on success.
pub async fn handle_ota_update(ctx: &HandlerContext<'_>, url: &str) -> CommandResult {
    info!("[OTA] Updating firmware from {}", url);
    let report = ctx.lib.ota_update(url).await;
    if report.is_empty() {
        Ok(Outcome::Done)
    } else {
        Err(CommandError::Library(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::handlers::testing::Fixture;

    #[tokio::test]
    async fn test_set_country_code_passes_flag_through() {
        let fx = Fixture::new();
        assert_eq!(handle_set_country_code(&fx.ctx(), "DE ", true).await, Ok(Outcome::Done));

        let state = fx.lib.state().await;
        assert_eq!(state.country_code, "DE ");
        assert!(state.ieee80211d);
    }

    #[tokio::test]
    async fn test_ota_report_is_the_result() {
        let fx = Fixture::new();
        assert_eq!(handle_ota_update(&fx.ctx(), "http://10.0.0.1/network_adapter.bin").await, Ok(Outcome::Done));

        match handle_ota_update(&fx.ctx(), "network_adapter.bin").await {
            Err(CommandError::Library(msg)) => assert!(msg.contains("unsupported URL")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_queries_are_silent() {
        let fx = Fixture::new();
        assert_eq!(handle_get_fw_version(&fx.ctx()).await, Ok(Outcome::Done));
        assert_eq!(handle_get_country_code(&fx.ctx()).await, Ok(Outcome::Done));
        assert_eq!(fx.lib.calls().await, vec!["get_fw_version()", "get_country_code()"]);
    }
}
