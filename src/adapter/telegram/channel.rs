//! Telegram bot delivery channel.

use std::path::Path;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InputFile, ParseMode};
use tracing::warn;

use super::format::format_listing;
use crate::domain::{RenderedListing, UserId};
use crate::error::Result;
use crate::port::DeliveryChannel;

/// Delivers listings to users through the Telegram Bot API.
///
/// Listings with a captured image are sent as a photo with an HTML caption;
/// the rest go out as plain HTML messages. A user's Telegram id doubles as
/// the chat id since the bot only talks to private chats.
pub struct TelegramChannel {
    bot: Bot,
}

impl TelegramChannel {
    #[must_use]
    pub fn new(bot_token: &str) -> Self {
        Self {
            bot: Bot::new(bot_token),
        }
    }
}

#[async_trait]
impl DeliveryChannel for TelegramChannel {
    async fn deliver(&self, user: UserId, listing: &RenderedListing) -> Result<()> {
        let chat_id = ChatId(user.0);
        let text = format_listing(listing);

        if let Some(path) = listing.image_path.as_deref().filter(|p| Path::new(p).exists()) {
            match self
                .bot
                .send_photo(chat_id, InputFile::file(path))
                .caption(&text)
                .parse_mode(ParseMode::Html)
                .await
            {
                Ok(_) => return Ok(()),
                Err(e) => {
                    // A corrupt or rejected image should not block the
                    // listing itself; retry as a plain message.
                    warn!(user = %user, error = %e, "photo send failed, falling back to text");
                }
            }
        }

        self.bot
            .send_message(chat_id, &text)
            .parse_mode(ParseMode::Html)
            .await?;

        Ok(())
    }
}
