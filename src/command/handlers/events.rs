//! Event subscription handlers

use super::HandlerContext;
use crate::command::{CommandResult, Outcome};
use hosted_shared::EventSelector;

/// Handle SUBSCRIBE_EVENT command
pub async fn handle_subscribe_event(ctx: &HandlerContext<'_>, event: &str) -> CommandResult {
    match event.parse::<EventSelector>()? {
        EventSelector::One(event) => ctx.lib.subscribe_event(event).await,
        EventSelector::All => ctx.lib.register_all_event_callbacks().await,
    }
    Ok(Outcome::Done)
}

/// Handle UNSUBSCRIBE_EVENT command
pub async fn handle_unsubscribe_event(ctx: &HandlerContext<'_>, event: &str) -> CommandResult {
    match event.parse::<EventSelector>()? {
        EventSelector::One(event) => ctx.lib.unsubscribe_event(event).await,
        EventSelector::All => ctx.lib.unregister_all_event_callbacks().await,
    }
    Ok(Outcome::Done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::handlers::testing::Fixture;
    use crate::command::CommandError;
    use hosted_shared::Event;

    #[tokio::test]
    async fn test_all_equals_every_single_event() {
        let all = Fixture::new();
        handle_subscribe_event(&all.ctx(), "all").await.unwrap();

        let each = Fixture::new();
        for event in Event::ALL {
            handle_subscribe_event(&each.ctx(), event.name()).await.unwrap();
        }

        let subscribed = all.lib.state().await.subscriptions;
        assert_eq!(subscribed.len(), Event::ALL.len());
        assert_eq!(subscribed, each.lib.state().await.subscriptions);
    }

    #[tokio::test]
    async fn test_unsubscribe_all_clears_everything() {
        let fx = Fixture::new();
        handle_subscribe_event(&fx.ctx(), "heartbeat").await.unwrap();
        handle_subscribe_event(&fx.ctx(), "esp_init").await.unwrap();
        handle_unsubscribe_event(&fx.ctx(), "heartbeat").await.unwrap();
        assert_eq!(
            fx.lib.state().await.subscriptions.into_iter().collect::<Vec<_>>(),
            vec![Event::EspInit]
        );

        handle_unsubscribe_event(&fx.ctx(), "all").await.unwrap();
        assert!(fx.lib.state().await.subscriptions.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_event() {
        let fx = Fixture::new();
        assert_eq!(
            handle_subscribe_event(&fx.ctx(), "scan_done").await,
            Err(CommandError::validation("Unsupported event scan_done"))
        );
        assert_eq!(
            handle_unsubscribe_event(&fx.ctx(), "").await,
            Err(CommandError::validation("Unsupported event "))
        );
        assert!(fx.lib.calls().await.is_empty());
    }
}
