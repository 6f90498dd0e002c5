//! Telegram webhook adapter.
//!
//! Telegram POSTs each update to the webhook and accepts one Bot API method
//! call as the response body, so replies go back inline as `sendMessage`.
//! Files cannot be uploaded that way; replies that carry an attachment link to
//! the export endpoint instead.

use serde::{Deserialize, Serialize};

use super::service::BotReply;

/// Export download served by the HTTP API
pub const EXPORT_PATH: &str = "/expenses/export.csv";

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub document: Option<Document>,
    #[serde(default)]
    pub web_app_data: Option<WebAppData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebAppData {
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

/// `sendMessage` call returned as the webhook response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendMessage {
    pub method: &'static str,
    pub chat_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl SendMessage {
    /// Turn a reply into a `sendMessage` call for `chat_id`
    ///
    /// `export_url` replaces the attachment, which cannot travel inline.
    pub fn from_reply(chat_id: i64, reply: BotReply, export_url: &str) -> Self {
        let mut text = reply.text;
        if let Some(attachment) = &reply.attachment {
            if !text.is_empty() {
                text.push_str("\n\n");
            }
            text.push_str(&format!("📎 Download {}: {}", attachment.file_name, export_url));
        }

        let reply_markup = reply.mini_app_url.map(|url| InlineKeyboardMarkup {
            inline_keyboard: vec![vec![InlineKeyboardButton {
                text: "📱 Open Mini App".to_string(),
                url,
            }]],
        });

        Self {
            method: "sendMessage",
            chat_id,
            text,
            reply_markup,
        }
    }
}

/// Absolute export link next to the mini app, or the bare path
pub fn export_url(mini_app_url: Option<&str>) -> String {
    match mini_app_url {
        Some(base) => format!("{}/export.csv", base.trim_end_matches('/')),
        None => EXPORT_PATH.to_string(),
    }
}
