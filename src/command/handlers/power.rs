//! Power save and transmit power handlers

use super::HandlerContext;
use crate::command::{CommandResult, Outcome};
use hosted_shared::PowerSaveMode;

/// Handle GET_WIFI_POWERSAVE_MODE command
pub async fn handle_get_power_save(ctx: &HandlerContext<'_>) -> CommandResult {
    ctx.lib.get_power_save().await;
    Ok(Outcome::Done)
}

/// Handle SET_WIFI_POWERSAVE_MODE command
pub async fn handle_set_power_save(ctx: &HandlerContext<'_>, mode: &str) -> CommandResult {
    let mode: PowerSaveMode = mode.parse()?;
    ctx.lib.set_power_save(mode).await;
    Ok(Outcome::Done)
}

/// Handle SET_WIFI_MAX_TX_POWER command
///
/// Range checking is left to the co-processor.
pub async fn handle_set_max_tx_power(ctx: &HandlerContext<'_>, power: i64) -> CommandResult {
    ctx.lib.set_max_tx_power(power).await;
    Ok(Outcome::Done)
}

/// Handle GET_WIFI_CURR_TX_POWER command
pub async fn handle_get_curr_tx_power(ctx: &HandlerContext<'_>) -> CommandResult {
    ctx.lib.get_curr_tx_power().await;
    Ok(Outcome::Done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::handlers::testing::Fixture;
    use crate::command::CommandError;

    #[tokio::test]
    async fn test_set_power_save() {
        let fx = Fixture::new();
        assert_eq!(handle_set_power_save(&fx.ctx(), "max").await, Ok(Outcome::Done));
        assert_eq!(fx.lib.state().await.power_save, PowerSaveMode::Max);

        assert_eq!(
            handle_set_power_save(&fx.ctx(), "none").await,
            Err(CommandError::validation("Unsupported power save mode none"))
        );
        assert_eq!(fx.lib.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn test_tx_power_passes_through() {
        let fx = Fixture::new();
        assert_eq!(handle_set_max_tx_power(&fx.ctx(), 84).await, Ok(Outcome::Done));
        assert_eq!(handle_get_curr_tx_power(&fx.ctx()).await, Ok(Outcome::Done));
        assert_eq!(
            fx.lib.calls().await,
            vec!["set_max_tx_power(84)", "get_curr_tx_power()"]
        );
    }
}
