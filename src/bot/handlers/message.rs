use teloxide::prelude::*;
use crate::bot::events::{InboundEvent, TextEvent};
use crate::bot::router::EventRouter;
use super::{dispatch_logged, HandlerResult};

pub async fn message_handler(msg: Message, router: EventRouter) -> HandlerResult {
    let event = TextEvent::from(&msg);

    // Service messages carry neither text nor location
    if event.text.is_none() && event.location.is_none() {
        return Ok(());
    }

    dispatch_logged(&router, InboundEvent::Message(event)).await
}
