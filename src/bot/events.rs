//! Inbound events, reduced to the fields the router uses.

use teloxide::types::{CallbackQuery, InlineQuery, Message};

use crate::database::models::GeoPoint;

#[derive(Debug, Clone, PartialEq)]
pub struct TextEvent {
    pub chat_id: i64,
    pub sender_id: i64,
    pub sender_name: String,
    pub text: Option<String>,
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallbackEvent {
    /// Chat of the message the button belongs to, if Telegram still has it.
    pub chat_id: Option<i64>,
    pub sender_id: i64,
    pub callback_id: String,
    pub payload: Option<String>,
}

impl CallbackEvent {
    /// Where list replies go; private chats share the user's id.
    pub fn reply_chat(&self) -> i64 {
        self.chat_id.unwrap_or(self.sender_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InlineSearchEvent {
    pub query_id: String,
    pub sender_id: i64,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Message(TextEvent),
    Callback(CallbackEvent),
    InlineSearch(InlineSearchEvent),
}

impl InboundEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            InboundEvent::Message(_) => "message",
            InboundEvent::Callback(_) => "callback",
            InboundEvent::InlineSearch(_) => "inline_query",
        }
    }

    pub fn sender_id(&self) -> i64 {
        match self {
            InboundEvent::Message(e) => e.sender_id,
            InboundEvent::Callback(e) => e.sender_id,
            InboundEvent::InlineSearch(e) => e.sender_id,
        }
    }
}

impl From<&Message> for TextEvent {
    fn from(msg: &Message) -> Self {
        let (sender_id, sender_name) = msg
            .from()
            .map(|user| (user.id.0 as i64, user.first_name.clone()))
            .unwrap_or((msg.chat.id.0, String::new()));

        TextEvent {
            chat_id: msg.chat.id.0,
            sender_id,
            sender_name,
            text: msg.text().map(str::to_string),
            location: msg.location().map(|l| GeoPoint {
                latitude: l.latitude,
                longitude: l.longitude,
            }),
        }
    }
}

impl From<&CallbackQuery> for CallbackEvent {
    fn from(q: &CallbackQuery) -> Self {
        CallbackEvent {
            chat_id: q.message.as_ref().map(|m| m.chat.id.0),
            sender_id: q.from.id.0 as i64,
            callback_id: q.id.clone(),
            payload: q.data.clone(),
        }
    }
}

impl From<&InlineQuery> for InlineSearchEvent {
    fn from(q: &InlineQuery) -> Self {
        InlineSearchEvent {
            query_id: q.id.clone(),
            sender_id: q.from.id.0 as i64,
            query: q.query.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_reply_chat_falls_back_to_sender() {
        let mut event = CallbackEvent {
            chat_id: Some(-100),
            sender_id: 7,
            callback_id: "q".to_string(),
            payload: None,
        };
        assert_eq!(event.reply_chat(), -100);

        event.chat_id = None;
        assert_eq!(event.reply_chat(), 7);
    }
}
