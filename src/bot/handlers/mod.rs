pub mod callback;
pub mod inline;
pub mod message;

use teloxide::{dispatching::UpdateHandler, prelude::*};
use crate::bot::events::InboundEvent;
use crate::bot::router::EventRouter;

pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type HandlerResult = Result<(), HandlerError>;

pub struct BotHandler {
    pub router: EventRouter,
}

impl BotHandler {
    pub fn new(router: EventRouter) -> Self {
        Self { router }
    }

    pub fn schema(&self) -> UpdateHandler<HandlerError> {
        let router_message = self.router.clone();
        let router_callback = self.router.clone();
        let router_inline = self.router.clone();

        dptree::entry()
            .branch(Update::filter_message().endpoint(move |msg: Message| {
                let router = router_message.clone();
                async move { message::message_handler(msg, router).await }
            }))
            .branch(Update::filter_callback_query().endpoint(move |q: CallbackQuery| {
                let router = router_callback.clone();
                async move { callback::callback_handler(q, router).await }
            }))
            .branch(Update::filter_inline_query().endpoint(move |q: InlineQuery| {
                let router = router_inline.clone();
                async move { inline::inline_query_handler(q, router).await }
            }))
    }
}

/// Routes one event; failures end in the log, never in the dispatcher.
pub(crate) async fn dispatch_logged(router: &EventRouter, event: InboundEvent) -> HandlerResult {
    let kind = event.kind();
    let sender_id = event.sender_id();
    if let Err(e) = router.dispatch(event).await {
        tracing::error!("EVENT_ERROR: {} for {} - {:#}", kind, sender_id, e);
    }
    Ok(())
}
