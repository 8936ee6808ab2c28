use teloxide::prelude::*;
use crate::bot::events::{CallbackEvent, InboundEvent};
use crate::bot::router::EventRouter;
use super::{dispatch_logged, HandlerResult};

pub async fn callback_handler(q: CallbackQuery, router: EventRouter) -> HandlerResult {
    let username = q.from.username.as_deref().unwrap_or("unknown");
    tracing::info!(
        "Callback received: {:?} from user {} ({})",
        q.data, username, q.from.id.0
    );

    dispatch_logged(&router, InboundEvent::Callback(CallbackEvent::from(&q))).await
}
