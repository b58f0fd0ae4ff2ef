//! Notification relay webhook.
//!
//! Backend services push batches of `{telegram_id, message}` objects to
//! `POST /notifications`; each one is forwarded to the corresponding chat.
//! Delivery is best effort: a bad id or a failed send is logged and the
//! rest of the batch still goes out.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use teloxide::prelude::*;
use tracing::{error, info};

use crate::domain::Notification;

/// Body returned when the webhook payload cannot be decoded.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    status_code: u16,
    message: String,
}

/// Builds the webhook router; the bot handle is the only state.
pub fn notifications_router(bot: Bot) -> Router {
    Router::new()
        .route("/notifications", post(trigger_notifications))
        .with_state(bot)
}

/// Sends each received notification to its user. Returns 200 once the
/// batch has been walked, 400 when the body does not decode.
async fn trigger_notifications(
    State(bot): State<Bot>,
    payload: Result<Json<Vec<Notification>>, JsonRejection>,
) -> impl IntoResponse {
    let Json(notifications) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            let response = ErrorResponse {
                status_code: StatusCode::BAD_REQUEST.as_u16(),
                message: format!("error unmarshaling body: {rejection}"),
            };
            return (StatusCode::BAD_REQUEST, Json(response)).into_response();
        }
    };

    info!(batch_size = notifications.len(), "delivering notifications");

    for notification in &notifications {
        // Best effort: log and move on to the next recipient
        let telegram_id: i64 = match notification.telegram_id.parse() {
            Ok(id) => id,
            Err(_) => {
                error!(telegram_id = %notification.telegram_id, "invalid telegram id");
                continue;
            }
        };

        if let Err(err) = bot
            .send_message(ChatId(telegram_id), notification.message.clone())
            .await
        {
            error!(telegram_id, error = %err, "error sending notification");
        }
    }

    StatusCode::OK.into_response()
}
