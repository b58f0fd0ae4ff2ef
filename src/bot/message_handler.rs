//! Message handler: command dispatch and the form submission pipeline.
//!
//! Form replies arrive as plain text starting with the form command
//! (`/addPetRecord`, `/registerAlarm`). Users fix a rejected form by editing
//! their message, so edited messages run through the same pipeline.

use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, error, info};

use crate::domain::PetRequest;
use crate::form::{
    extract_form, FormError, ALARM_FORM_PATTERN, BIRTH_DATE_TAG, END_DATE_TAG, HOURS_TAG,
    MESSAGE_TAG, NAME_TAG, NOT_APPLICABLE, PET_FORM_PATTERN, START_DATE_TAG, TYPE_TAG,
};
use crate::requester::ServiceRequester;
use crate::user_store::UserStore;
use crate::validator;

use super::ui_builder;

/// Minimum length of the alarm message field.
const MIN_ALARM_MESSAGE_LEN: usize = 5;

/// Entry point for incoming messages, wired into the dispatcher.
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    requester: Arc<ServiceRequester>,
    users: Arc<dyn UserStore>,
) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    debug!(chat_id = %msg.chat.id, "received text message");

    if text == "/start" {
        handle_start(&bot, &msg, &requester).await?;
    } else if text == "/help" {
        handle_help(&bot, &msg, &users).await?;
    } else if text == "/createPet" {
        handle_create_pet(&bot, &msg).await?;
    } else if text == "/getPets" {
        handle_get_pets(&bot, &msg, &requester).await?;
    } else if text == "/setAlarm" {
        handle_set_alarm(&bot, &msg).await?;
    } else if text == "/info" {
        handle_info(&bot, &msg).await?;
    } else if text.starts_with(ui_builder::ADD_PET_RECORD_COMMAND) {
        handle_pet_form(&bot, &msg, &requester).await?;
    } else if text.starts_with(ui_builder::REGISTER_ALARM_COMMAND) {
        handle_alarm_form(&bot, &msg).await?;
    } else {
        bot.send_message(
            msg.chat.id,
            "I didn't get that 🐾 Use /help to see what I can do",
        )
        .await?;
    }

    Ok(())
}

/// Entry point for edited messages: only form replies are re-parsed.
pub async fn edited_message_handler(
    bot: Bot,
    msg: Message,
    requester: Arc<ServiceRequester>,
) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    if text.starts_with(ui_builder::ADD_PET_RECORD_COMMAND) {
        handle_pet_form(&bot, &msg, &requester).await?;
    } else if text.starts_with(ui_builder::REGISTER_ALARM_COMMAND) {
        handle_alarm_form(&bot, &msg).await?;
    }

    Ok(())
}

/// `/start` has two flows: registered users get the welcome message, the
/// rest get the account creation menu.
async fn handle_start(bot: &Bot, msg: &Message, requester: &ServiceRequester) -> Result<()> {
    let Some(sender) = msg.from.as_ref() else {
        bot.send_message(msg.chat.id, ui_builder::generic_failure_message())
            .await?;
        return Ok(());
    };

    let telegram_id = sender.id.0 as i64;
    match requester.get_user_data(telegram_id).await {
        Ok(user_info) => {
            bot.send_message(msg.chat.id, ui_builder::welcome_message(&user_info.full_name))
                .await?;
        }
        Err(err) if err.is_not_found() => {
            info!(telegram_id, "user not registered yet");
            bot.send_message(msg.chat.id, ui_builder::not_registered_message())
                .reply_markup(ui_builder::account_creation_keyboard())
                .await?;
        }
        Err(err) => {
            error!(telegram_id, error = %err, "error fetching user info");
            bot.send_message(
                msg.chat.id,
                "Oops, something went wrong searching your info. Please try again",
            )
            .await?;
        }
    }

    Ok(())
}

async fn handle_help(bot: &Bot, msg: &Message, users: &Arc<dyn UserStore>) -> Result<()> {
    let user_name = msg
        .from
        .as_ref()
        .map(|user| {
            users
                .lookup_user(user.id.0 as i64)
                .map(|stored| stored.name)
                .unwrap_or_else(|| user.first_name.clone())
        })
        .unwrap_or_else(|| "friend".to_string());

    bot.send_message(msg.chat.id, ui_builder::welcome_message(&user_name))
        .await?;
    Ok(())
}

/// `/info` easter egg, addressed to the sender by first name.
async fn handle_info(bot: &Bot, msg: &Message) -> Result<()> {
    let first_name = msg
        .from
        .as_ref()
        .map(|user| user.first_name.as_str())
        .unwrap_or("cachorro");

    bot.send_message(msg.chat.id, ui_builder::info_message(first_name))
        .await?;
    Ok(())
}

/// Sends the pet form template behind a helper button.
async fn handle_create_pet(bot: &Bot, msg: &Message) -> Result<()> {
    bot.send_message(msg.chat.id, "Please, enter your pet info")
        .reply_markup(ui_builder::form_helper_keyboard(
            "Click here to display the form",
            ui_builder::pet_form_template(),
        ))
        .await?;
    Ok(())
}

/// Sends the alarm form template behind a helper button.
async fn handle_set_alarm(bot: &Bot, msg: &Message) -> Result<()> {
    bot.send_message(msg.chat.id, "Please, enter the information about the alarm")
        .reply_markup(ui_builder::form_helper_keyboard(
            "Click here to display the alarm form",
            ui_builder::alarm_form_template(),
        ))
        .await?;
    Ok(())
}

/// Lists the sender's pets as buttons, one per pet.
async fn handle_get_pets(bot: &Bot, msg: &Message, requester: &ServiceRequester) -> Result<()> {
    let Some(sender) = msg.from.as_ref() else {
        bot.send_message(msg.chat.id, ui_builder::generic_failure_message())
            .await?;
        return Ok(());
    };

    let telegram_id = sender.id.0 as i64;
    match requester.get_pets_by_owner_id(telegram_id).await {
        Ok(pets) => {
            bot.send_message(msg.chat.id, "Select a pet")
                .reply_markup(ui_builder::pets_keyboard(&pets))
                .await?;
        }
        Err(err) if err.is_not_found() => {
            bot.send_message(msg.chat.id, "You don't have any pet registered yet")
                .await?;
        }
        Err(err) => {
            error!(telegram_id, error = %err, "error fetching pets");
            bot.send_message(msg.chat.id, "error searching your pets")
                .await?;
        }
    }

    Ok(())
}

/// Runs the pet form through extraction and validation, then registers the
/// pet. Every failure is recovered into a retry prompt.
async fn handle_pet_form(bot: &Bot, msg: &Message, requester: &ServiceRequester) -> Result<()> {
    let Some(sender) = msg.from.as_ref() else {
        bot.send_message(msg.chat.id, ui_builder::generic_failure_message())
            .await?;
        return Ok(());
    };

    let text = msg.text().unwrap_or_default();
    let fields = match extract_form(
        &PET_FORM_PATTERN,
        text,
        &[NAME_TAG, BIRTH_DATE_TAG, TYPE_TAG],
    ) {
        Ok(fields) => fields,
        Err(err) => {
            bot.send_message(
                msg.chat.id,
                form_error_message(&err, &ui_builder::try_again_pet_message()),
            )
            .await?;
            return Ok(());
        }
    };

    if let Err(err) = validator::validate_pet_type(&fields[TYPE_TAG]) {
        bot.send_message(
            msg.chat.id,
            format!("{err}. {}", ui_builder::try_again_pet_message()),
        )
        .await?;
        return Ok(());
    }

    if validator::validate_date(&fields[BIRTH_DATE_TAG]).is_err() {
        bot.send_message(
            msg.chat.id,
            format!(
                "Invalid birth date: format must be year/month/day. {}",
                ui_builder::try_again_pet_message()
            ),
        )
        .await?;
        return Ok(());
    }

    if fields[NAME_TAG].is_empty() {
        bot.send_message(
            msg.chat.id,
            format!(
                "The most important thing is missing, the name of your pet! {}",
                ui_builder::try_again_pet_message()
            ),
        )
        .await?;
        return Ok(());
    }

    let pet_request = PetRequest::new(
        &fields[NAME_TAG],
        &fields[TYPE_TAG],
        &fields[BIRTH_DATE_TAG],
        sender.id.0 as i64,
    );

    match requester.register_pet(&pet_request).await {
        Ok(()) => {
            bot.send_message(msg.chat.id, "Pet record created correctly 🐾")
                .await?;
        }
        Err(err) => {
            error!(owner_id = pet_request.owner_id, error = %err, "error registering pet");
            bot.send_message(msg.chat.id, ui_builder::generic_failure_message())
                .await?;
        }
    }

    Ok(())
}

/// Runs the alarm form through extraction and validation. Hours come as a
/// comma-separated list and are checked element-wise.
async fn handle_alarm_form(bot: &Bot, msg: &Message) -> Result<()> {
    let text = msg.text().unwrap_or_default();
    let fields = match extract_form(
        &ALARM_FORM_PATTERN,
        text,
        &[MESSAGE_TAG, HOURS_TAG, START_DATE_TAG, END_DATE_TAG],
    ) {
        Ok(fields) => fields,
        Err(err) => {
            bot.send_message(
                msg.chat.id,
                form_error_message(&err, &ui_builder::try_again_alarm_message()),
            )
            .await?;
            return Ok(());
        }
    };

    if let Some(retry_message) = validate_alarm_fields(&fields) {
        bot.send_message(msg.chat.id, retry_message).await?;
        return Ok(());
    }

    // TODO: forward the alarm to the ticker service once it is deployed
    bot.send_message(msg.chat.id, "Your alarm was set correctly ⏰")
        .await?;
    Ok(())
}

/// Returns the retry prompt for the first alarm field that fails, or
/// `None` when the whole form is valid.
fn validate_alarm_fields(fields: &HashMap<String, String>) -> Option<String> {
    let try_again = ui_builder::try_again_alarm_message();

    if fields[MESSAGE_TAG].len() < MIN_ALARM_MESSAGE_LEN {
        return Some(format!(
            "Message must have at least {MIN_ALARM_MESSAGE_LEN} characters. {try_again}"
        ));
    }

    for hour in fields[HOURS_TAG].split(',') {
        if let Err(err) = validator::validate_hour(hour) {
            return Some(format!("{err}. {try_again}"));
        }
    }

    if validator::validate_date(&fields[START_DATE_TAG]).is_err() {
        return Some(format!(
            "Invalid start date: format must be year/month/day. {try_again}"
        ));
    }

    let end_date = &fields[END_DATE_TAG];
    if end_date != NOT_APPLICABLE && validator::validate_date(end_date).is_err() {
        return Some(format!(
            "Invalid end date: format must be year/month/day. {try_again}"
        ));
    }

    None
}

/// User-facing copy for extraction failures; structural breakage gets the
/// structure warning, a missing field names the field.
fn form_error_message(err: &FormError, try_again: &str) -> String {
    match err {
        FormError::InvalidForm => format!(
            "🚨 Invalid form, you don't have to modify the structure, only the field values. {try_again}"
        ),
        FormError::MissingField(_) => format!("🚨 {err}. {try_again}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_alarm_fields() -> HashMap<String, String> {
        HashMap::from([
            (MESSAGE_TAG.to_string(), "pill time".to_string()),
            (HOURS_TAG.to_string(), "9:30,21:30".to_string()),
            (START_DATE_TAG.to_string(), "2024/01/01".to_string()),
            (END_DATE_TAG.to_string(), "N/A".to_string()),
        ])
    }

    #[test]
    fn test_valid_alarm_fields_pass() {
        assert_eq!(validate_alarm_fields(&valid_alarm_fields()), None);
    }

    #[test]
    fn test_short_alarm_message_is_rejected() {
        let mut fields = valid_alarm_fields();
        fields.insert(MESSAGE_TAG.to_string(), "hey".to_string());

        let prompt = validate_alarm_fields(&fields).unwrap();
        assert!(prompt.contains("at least 5 characters"));
    }

    #[test]
    fn test_hours_are_validated_element_wise() {
        let mut fields = valid_alarm_fields();
        fields.insert(HOURS_TAG.to_string(), "9:30,25:61".to_string());

        let prompt = validate_alarm_fields(&fields).unwrap();
        assert!(prompt.contains("invalid hour"));
    }

    #[test]
    fn test_sentinel_end_date_skips_date_parsing() {
        let fields = valid_alarm_fields();
        assert_eq!(validate_alarm_fields(&fields), None);

        let mut fields = valid_alarm_fields();
        fields.insert(END_DATE_TAG.to_string(), "soon".to_string());
        let prompt = validate_alarm_fields(&fields).unwrap();
        assert!(prompt.contains("Invalid end date"));
    }

    #[test]
    fn test_form_error_messages() {
        let invalid = form_error_message(&FormError::InvalidForm, "Try again");
        assert!(invalid.contains("don't have to modify the structure"));

        let missing = form_error_message(
            &FormError::MissingField("Hours".to_string()),
            "Try again",
        );
        assert!(missing.contains("missing field: Hours"));
    }
}
