//! # REST API for the Telegram Bot
//!
//! The webhook Telegram calls for every update, plus the upload endpoint that
//! feeds documents sent to the bot into its CSV import.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use serde_json::json;
use tracing::{info, warn};

use super::error_response;
use super::import_apis::read_field;
use crate::backend::io::bot::telegram::export_url;
use crate::backend::io::bot::{BotCommand, BotReply, SendMessage, Update};
use crate::backend::AppState;
use shared::MessageResponse;

/// Multipart field carrying the document
pub const DOCUMENT_FIELD: &str = "document";

const DOCUMENT_POINTER: &str = "📁 Got your file. To import it, upload it through the mini app or POST it as the 'document' field to /expenses/bot/document.";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/bot/webhook", post(telegram_webhook))
        .route("/bot/document", post(upload_document))
}

/// Handle one Telegram update and answer with an inline `sendMessage`
pub async fn telegram_webhook(
    State(state): State<AppState>,
    Json(update): Json<Update>,
) -> impl IntoResponse {
    info!("POST /expenses/bot/webhook - update {}", update.update_id);

    let Some(message) = update.message else {
        return (StatusCode::OK, Json(json!({}))).into_response();
    };
    let chat_id = message.chat.id;
    let username = message
        .from
        .as_ref()
        .and_then(|user| user.username.as_deref())
        .unwrap_or("-");
    let bot = &state.bot_service;

    let reply = if let Some(web_app_data) = &message.web_app_data {
        info!("📱 Mini app data from chat {} (@{})", chat_id, username);
        bot.handle_web_app_data(&web_app_data.data)
    } else if let Some(text) = message.text.as_deref() {
        let command = BotCommand::parse(text);
        info!("🤖 {:?} from chat {} (@{})", command, chat_id, username);
        bot.handle(&command, bot.today())
    } else if let Some(document) = &message.document {
        let file_name = document.file_name.as_deref().unwrap_or_default();
        info!("📎 Document '{}' from chat {} (@{})", file_name, chat_id, username);
        if file_name.to_lowercase().ends_with(".csv") {
            BotReply::text(DOCUMENT_POINTER)
        } else {
            bot.import_document(file_name, &[])
        }
    } else {
        return (StatusCode::OK, Json(json!({}))).into_response();
    };

    let send = SendMessage::from_reply(chat_id, reply, &export_url(bot.mini_app_url()));
    (StatusCode::OK, Json(send)).into_response()
}

/// Import a document that was sent to the bot, appending its rows
pub async fn upload_document(State(state): State<AppState>, mut multipart: Multipart) -> impl IntoResponse {
    info!("POST /expenses/bot/document");

    match read_field(&mut multipart, DOCUMENT_FIELD).await {
        Ok(Some((file_name, bytes))) => {
            let reply = state
                .bot_service
                .import_document(file_name.as_deref().unwrap_or_default(), &bytes);
            (StatusCode::OK, Json(MessageResponse { message: reply.text })).into_response()
        }
        Ok(None) => error_response(
            StatusCode::BAD_REQUEST,
            format!("Missing multipart field '{DOCUMENT_FIELD}'"),
        ),
        Err(e) => {
            warn!("Unreadable multipart upload: {}", e);
            error_response(StatusCode::BAD_REQUEST, "Invalid multipart upload")
        }
    }
}
