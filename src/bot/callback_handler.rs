//! Callback handler: routes inline keyboard presses by their data prefix.

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, InputFile};
use tracing::{debug, error};

use crate::requester::{RequestError, ServiceRequester};
use crate::user_store::UserStore;

use super::ui_builder;

/// Photo sent to users who decline creating an account.
const GOODBYE_PHOTO_URL: &str = "https://pbs.twimg.com/media/FRxJVLYXwAAlGPk?format=jpg&name=small";

/// Handle callback queries from inline keyboards. The callback data is a
/// marker plus `|`-separated arguments.
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    requester: Arc<ServiceRequester>,
    users: Arc<dyn UserStore>,
) -> Result<()> {
    debug!(user_id = %q.from.id, "received callback query");

    let data = q.data.clone().unwrap_or_default();
    let params: Vec<&str> = data.split('|').collect();

    if let Some(msg) = &q.message {
        let chat_id = msg.chat().id;

        match params[0] {
            ui_builder::CREATE_ACCOUNT_CALLBACK => {
                create_account(&bot, chat_id, q.from.id.0 as i64, &q.from.first_name, &users)
                    .await?;
            }
            ui_builder::OMIT_ACCOUNT_CALLBACK => {
                let photo = InputFile::url(url::Url::parse(GOODBYE_PHOTO_URL)?);
                bot.send_photo(chat_id, photo).await?;
            }
            ui_builder::PET_INFO_CALLBACK => {
                show_pet_info(&bot, chat_id, &params[1..]).await?;
            }
            ui_builder::VACCINES_CALLBACK => {
                show_vaccines(&bot, chat_id, &params[1..], &requester).await?;
            }
            ui_builder::MEDICAL_HISTORY_CALLBACK => {
                show_medical_history(&bot, chat_id, &params[1..], &requester).await?;
            }
            ui_builder::TREATMENT_CALLBACK => {
                show_treatment(&bot, chat_id, &params[1..], &requester).await?;
            }
            other => {
                debug!(marker = other, "ignoring unknown callback marker");
            }
        }
    }

    // Answer the callback query to remove the loading state
    bot.answer_callback_query(q.id).await?;

    Ok(())
}

/// Registers the user locally and hands out the sign-up link.
async fn create_account(
    bot: &Bot,
    chat_id: ChatId,
    telegram_id: i64,
    first_name: &str,
    users: &Arc<dyn UserStore>,
) -> Result<()> {
    users.register_user(telegram_id, first_name);

    bot.send_message(chat_id, "Click below to sign up 👇")
        .reply_markup(ui_builder::sign_up_keyboard(telegram_id)?)
        .await?;

    bot.send_message(chat_id, "After creating the account perform /start again 😺")
        .await?;
    Ok(())
}

/// Shows the pet card; the callback data carries `id|name|type`.
async fn show_pet_info(bot: &Bot, chat_id: ChatId, params: &[&str]) -> Result<()> {
    let [pet_id, name, pet_type] = params else {
        bot.send_message(chat_id, ui_builder::generic_failure_message())
            .await?;
        return Ok(());
    };

    let Ok(pet_id) = pet_id.parse::<i64>() else {
        error!(pet_id, "invalid pet id in callback data");
        bot.send_message(chat_id, ui_builder::generic_failure_message())
            .await?;
        return Ok(());
    };

    bot.send_message(chat_id, ui_builder::pet_card(name, pet_type))
        .reply_markup(ui_builder::pet_info_keyboard(pet_id))
        .await?;
    Ok(())
}

/// Shows every vaccine applied to the pet, most recent data included.
async fn show_vaccines(
    bot: &Bot,
    chat_id: ChatId,
    params: &[&str],
    requester: &ServiceRequester,
) -> Result<()> {
    let Some(pet_id) = parse_pet_id(params) else {
        bot.send_message(chat_id, ui_builder::generic_failure_message())
            .await?;
        return Ok(());
    };

    match requester.get_vaccines(pet_id).await {
        Ok(vaccines) if vaccines.is_empty() => {
            bot.send_message(chat_id, "Cannot find vaccines for selected pet")
                .await?;
        }
        Ok(vaccines) => {
            bot.send_message(chat_id, ui_builder::vaccines_message(&vaccines))
                .await?;
        }
        Err(err) if is_empty_result(&err) => {
            bot.send_message(chat_id, "Cannot find vaccines for selected pet")
                .await?;
        }
        Err(err) => {
            error!(pet_id, error = %err, "error fetching vaccines");
            bot.send_message(chat_id, ui_builder::generic_failure_message())
                .await?;
        }
    }

    Ok(())
}

/// Lists the latest treatments of the pet as buttons, newest first.
async fn show_medical_history(
    bot: &Bot,
    chat_id: ChatId,
    params: &[&str],
    requester: &ServiceRequester,
) -> Result<()> {
    let Some(pet_id) = parse_pet_id(params) else {
        bot.send_message(chat_id, ui_builder::generic_failure_message())
            .await?;
        return Ok(());
    };

    match requester.get_treatments_by_pet_id(pet_id).await {
        Ok(treatments) if treatments.is_empty() => {
            bot.send_message(chat_id, "Cannot find treatments for selected pet")
                .await?;
        }
        Ok(treatments) => {
            bot.send_message(chat_id, "Select a treatment")
                .reply_markup(ui_builder::treatments_keyboard(&treatments))
                .await?;
        }
        Err(err) if is_empty_result(&err) => {
            bot.send_message(chat_id, "Cannot find treatments for selected pet")
                .await?;
        }
        Err(err) => {
            error!(pet_id, error = %err, "error fetching treatments");
            bot.send_message(chat_id, ui_builder::generic_failure_message())
                .await?;
        }
    }

    Ok(())
}

/// Shows the full treatment card with its comment history.
async fn show_treatment(
    bot: &Bot,
    chat_id: ChatId,
    params: &[&str],
    requester: &ServiceRequester,
) -> Result<()> {
    let [treatment_id] = params else {
        bot.send_message(chat_id, ui_builder::generic_failure_message())
            .await?;
        return Ok(());
    };

    match requester.get_treatment(treatment_id).await {
        Ok(treatment) => {
            bot.send_message(chat_id, ui_builder::treatment_message(&treatment))
                .await?;
        }
        Err(err) if is_empty_result(&err) => {
            bot.send_message(chat_id, "Cannot find info about selected treatment")
                .await?;
        }
        Err(err) => {
            error!(treatment_id, error = %err, "error fetching treatment");
            bot.send_message(chat_id, ui_builder::generic_failure_message())
                .await?;
        }
    }

    Ok(())
}

fn parse_pet_id(params: &[&str]) -> Option<i64> {
    let [pet_id] = params else {
        return None;
    };
    pet_id.parse().ok()
}

/// A not-found or no-content answer means "nothing to show", not a fault.
fn is_empty_result(err: &RequestError) -> bool {
    err.is_not_found() || err.is_no_content()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requester::RequestErrorKind;
    use reqwest::StatusCode;

    #[test]
    fn test_parse_pet_id_requires_single_numeric_param() {
        assert_eq!(parse_pet_id(&["7"]), Some(7));
        assert_eq!(parse_pet_id(&["seven"]), None);
        assert_eq!(parse_pet_id(&["7", "extra"]), None);
        assert_eq!(parse_pet_id(&[]), None);
    }

    #[test]
    fn test_empty_result_covers_not_found_and_no_content() {
        let not_found = RequestError::new(
            RequestErrorKind::Service {
                message: "no vaccines".to_string(),
            },
            StatusCode::NOT_FOUND,
        );
        assert!(is_empty_result(&not_found));

        let no_content =
            RequestError::new(RequestErrorKind::DecodingPayload, StatusCode::NO_CONTENT);
        assert!(is_empty_result(&no_content));

        let server_error = RequestError::new(
            RequestErrorKind::PerformingRequest,
            StatusCode::INTERNAL_SERVER_ERROR,
        );
        assert!(!is_empty_result(&server_error));
    }
}
