use teloxide::prelude::*;
use crate::bot::events::{InboundEvent, InlineSearchEvent};
use crate::bot::router::EventRouter;
use super::{dispatch_logged, HandlerResult};

pub async fn inline_query_handler(q: InlineQuery, router: EventRouter) -> HandlerResult {
    dispatch_logged(&router, InboundEvent::InlineSearch(InlineSearchEvent::from(&q))).await
}
