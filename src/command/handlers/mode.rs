//! Wi-Fi mode command handlers

use super::HandlerContext;
use crate::command::{CommandResult, Outcome};
use hosted_shared::WifiMode;

/// Handle GET_WIFI_MODE command
pub async fn handle_get_wifi_mode(ctx: &HandlerContext<'_>) -> CommandResult {
    ctx.lib.get_wifi_mode().await;
    Ok(Outcome::Done)
}

/// Handle SET_WIFI_MODE command
pub async fn handle_set_wifi_mode(ctx: &HandlerContext<'_>, mode: &str) -> CommandResult {
    let mode: WifiMode = mode.parse()?;
    ctx.lib.set_wifi_mode(mode).await;
    Ok(Outcome::Done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::handlers::testing::Fixture;
    use crate::command::CommandError;

    #[tokio::test]
    async fn test_set_mode_rejects_unknown_mode_without_calling_library() {
        let fx = Fixture::new();
        let result = handle_set_wifi_mode(&fx.ctx(), "bogus").await;

        assert_eq!(result, Err(CommandError::validation("Invalid mode")));
        assert!(fx.lib.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_set_mode_accepts_every_mode() {
        let fx = Fixture::new();
        for mode in ["station", "softap", "station+softap", "none"] {
            assert_eq!(handle_set_wifi_mode(&fx.ctx(), mode).await, Ok(Outcome::Done));
        }
        assert_eq!(fx.lib.calls().await.len(), 4);
        assert_eq!(fx.lib.state().await.mode, WifiMode::None);
    }

    #[tokio::test]
    async fn test_get_mode_is_silent_success() {
        let fx = Fixture::new();
        assert_eq!(handle_get_wifi_mode(&fx.ctx()).await, Ok(Outcome::Done));
        assert_eq!(fx.lib.calls().await, vec!["get_wifi_mode()"]);
    }
}
