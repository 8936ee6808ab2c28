//! Outbound side of the bot.
//!
//! The router describes replies with the plain types below and hands them to a
//! [`Transport`]; the teloxide [`Bot`] implementation turns them into Telegram
//! requests. All text is sent in HTML parse mode.

use anyhow::Result;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    ButtonRequest, InlineKeyboardButton, InlineKeyboardMarkup, InlineQueryResult,
    InlineQueryResultPhoto, InputFile, KeyboardButton, KeyboardMarkup, ParseMode, ReplyMarkup,
};
use url::Url;

use crate::bot::keyboard::Menu;

#[derive(Debug, Clone, PartialEq)]
pub enum InlineButton {
    Callback { text: String, data: String },
    Url { text: String, url: String },
}

pub type InlineGrid = Vec<Vec<InlineButton>>;

#[derive(Debug, Clone, PartialEq)]
pub enum Markup {
    Keyboard(Menu),
    Inline(InlineGrid),
}

/// Photo card offered as an inline search result.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoResult {
    pub id: String,
    pub photo_url: String,
    pub caption: String,
    pub buttons: InlineGrid,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str, markup: Option<Markup>) -> Result<()>;

    async fn send_photo(
        &self,
        chat_id: i64,
        photo_url: &str,
        caption: &str,
        buttons: InlineGrid,
    ) -> Result<()>;

    async fn send_location(&self, chat_id: i64, latitude: f64, longitude: f64) -> Result<()>;

    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<()>;

    async fn answer_inline_query(&self, query_id: &str, results: Vec<PhotoResult>) -> Result<()>;
}

fn keyboard_markup(menu: Menu) -> KeyboardMarkup {
    KeyboardMarkup::new(menu.layout().into_iter().map(|row| {
        row.into_iter()
            .map(|button| {
                let key = KeyboardButton::new(button.label);
                if button.request_location {
                    key.request(ButtonRequest::Location)
                } else {
                    key
                }
            })
            .collect::<Vec<_>>()
    }))
}

fn inline_markup(grid: InlineGrid) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(grid.into_iter().map(|row| {
        row.into_iter()
            .filter_map(|button| match button {
                InlineButton::Callback { text, data } => {
                    Some(InlineKeyboardButton::callback(text, data))
                }
                InlineButton::Url { text, url } => match Url::parse(&url) {
                    Ok(url) => Some(InlineKeyboardButton::url(text, url)),
                    Err(e) => {
                        tracing::warn!("Dropping link button '{}' with bad url {}: {}", text, url, e);
                        None
                    }
                },
            })
            .collect::<Vec<_>>()
    }))
}

fn reply_markup(markup: Markup) -> ReplyMarkup {
    match markup {
        Markup::Keyboard(menu) => ReplyMarkup::Keyboard(keyboard_markup(menu)),
        Markup::Inline(grid) => ReplyMarkup::InlineKeyboard(inline_markup(grid)),
    }
}

#[async_trait]
impl Transport for Bot {
    async fn send_text(&self, chat_id: i64, text: &str, markup: Option<Markup>) -> Result<()> {
        let mut request = self
            .send_message(ChatId(chat_id), text)
            .parse_mode(ParseMode::Html);
        if let Some(markup) = markup {
            request = request.reply_markup(reply_markup(markup));
        }
        request.await?;
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: i64,
        photo_url: &str,
        caption: &str,
        buttons: InlineGrid,
    ) -> Result<()> {
        let photo = InputFile::url(Url::parse(photo_url)?);
        Requester::send_photo(self, ChatId(chat_id), photo)
            .caption(caption)
            .parse_mode(ParseMode::Html)
            .reply_markup(inline_markup(buttons))
            .await?;
        Ok(())
    }

    async fn send_location(&self, chat_id: i64, latitude: f64, longitude: f64) -> Result<()> {
        Requester::send_location(self, ChatId(chat_id), latitude, longitude).await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<()> {
        self.answer_callback_query(callback_id).text(text).await?;
        Ok(())
    }

    async fn answer_inline_query(&self, query_id: &str, results: Vec<PhotoResult>) -> Result<()> {
        let mut cards = Vec::with_capacity(results.len());
        for result in results {
            let photo_url = match Url::parse(&result.photo_url) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("Skipping inline result {}: bad picture url: {}", result.id, e);
                    continue;
                }
            };
            let photo = InlineQueryResultPhoto::new(result.id, photo_url.clone(), photo_url)
                .caption(result.caption)
                .parse_mode(ParseMode::Html)
                .reply_markup(inline_markup(result.buttons));
            cards.push(InlineQueryResult::Photo(photo));
        }

        Requester::answer_inline_query(self, query_id, cards)
            .cache_time(0)
            .await?;
        Ok(())
    }
}
