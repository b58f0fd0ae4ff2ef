//! UI builder: inline keyboards, form templates and user-facing copy.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::domain::{PetSummary, Treatment, Vaccine};
use crate::formatter;

use super::{APP_NAME, BOT_NAME};

// Commands the form replies start with.
pub const ADD_PET_RECORD_COMMAND: &str = "/addPetRecord";
pub const REGISTER_ALARM_COMMAND: &str = "/registerAlarm";

// Callback data markers; arguments are appended after `|`.
pub const CREATE_ACCOUNT_CALLBACK: &str = "create-account";
pub const OMIT_ACCOUNT_CALLBACK: &str = "bye-dude-good-luck";
pub const PET_INFO_CALLBACK: &str = "pet-info";
pub const VACCINES_CALLBACK: &str = "vaccines";
pub const MEDICAL_HISTORY_CALLBACK: &str = "medical-history";
pub const TREATMENT_CALLBACK: &str = "treatment";

const SIGN_UP_URL_TEMPLATE: &str = "https://web.telegram.org/a/#";

/// Song behind the /info easter egg.
const INFO_SONG_URL: &str = "https://www.youtube.com/watch?v=RWIJExat-lQ";

/// Placeholder shown when an optional treatment/vaccine date is absent.
const NO_DATE: &str = "-";

/// Fixed-format template the user fills to register a pet. Labels and their
/// order are part of the extraction contract.
pub fn pet_form_template() -> String {
    format!("{ADD_PET_RECORD_COMMAND}\n\nName: \nBirth Date: \nType: ")
}

/// Fixed-format template for alarms; the end date accepts `N/A`.
pub fn alarm_form_template() -> String {
    format!("{REGISTER_ALARM_COMMAND}\n\nMessage: \nHours: \nStart Date: \nEnd Date: N/A")
}

/// One helper button that drops the form template into the user's input box.
pub fn form_helper_keyboard(button_text: &str, form: String) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::switch_inline_query_current_chat(button_text, form),
    ]])
}

/// Yes/No menu offered to unregistered users.
pub fn account_creation_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            "Yes",
            CREATE_ACCOUNT_CALLBACK,
        )],
        vec![InlineKeyboardButton::callback("No", OMIT_ACCOUNT_CALLBACK)],
    ])
}

/// URL button pointing the user at the sign-up page for their telegram id.
pub fn sign_up_keyboard(telegram_id: i64) -> anyhow::Result<InlineKeyboardMarkup> {
    let url = url::Url::parse(&format!("{SIGN_UP_URL_TEMPLATE}{telegram_id}"))?;
    Ok(InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::url("Sign Up", url),
    ]]))
}

/// One button per pet, labelled with the name and a species emoji. The
/// callback carries everything the detail card needs.
pub fn pets_keyboard(pets: &[PetSummary]) -> InlineKeyboardMarkup {
    let rows = pets
        .iter()
        .map(|pet| {
            let label = format!("{} {}", pet.name, formatter::pet_type_emoji(&pet.pet_type));
            let data = format!(
                "{PET_INFO_CALLBACK}|{}|{}|{}",
                pet.id, pet.name, pet.pet_type
            );
            vec![InlineKeyboardButton::callback(label, data)]
        })
        .collect::<Vec<_>>();

    InlineKeyboardMarkup::new(rows)
}

/// Medical history / vaccines menu under a pet card.
pub fn pet_info_keyboard(pet_id: i64) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            "Medical history 📙",
            format!("{MEDICAL_HISTORY_CALLBACK}|{pet_id}"),
        )],
        vec![InlineKeyboardButton::callback(
            "Vaccines 💉",
            format!("{VACCINES_CALLBACK}|{pet_id}"),
        )],
    ])
}

/// One button per treatment, newest first (the requester guarantees order).
pub fn treatments_keyboard(treatments: &[Treatment]) -> InlineKeyboardMarkup {
    let rows = treatments
        .iter()
        .map(|treatment| {
            let label = format!(
                "{} {}",
                treatment.treatment_type,
                formatter::date_to_string(&treatment.date_start)
            );
            let data = format!("{TREATMENT_CALLBACK}|{}", treatment.id);
            vec![InlineKeyboardButton::callback(label, data)]
        })
        .collect::<Vec<_>>();

    InlineKeyboardMarkup::new(rows)
}

/// Welcome message listing the bot features, shown to registered users.
pub fn welcome_message(user_name: &str) -> String {
    let mut message = format!(
        "Welcome to {APP_NAME}, {user_name}! I'm {BOT_NAME} and I'll help you to perform different operations from Telegram ✈️. My features are:\n\n"
    );

    let features = vec![
        "/start: action to start a conversation with me 🐶🤖".to_string(),
        "/createPet: creates a register for your pet on-demand 📓".to_string(),
        "/getPets: looks for information about your pets 🐶 🐱 🐊 🦦".to_string(),
        "/setAlarm: sets an alarm whenever you want in your timezone ⏰".to_string(),
    ];

    message.push_str(&formatter::unordered_list(&features));
    message
}

/// Prompt shown to users the users service does not know about.
pub fn not_registered_message() -> String {
    format!(
        "You are not registered in {}, do you want to create an account now?\n\n👀 If you don't have an account you will not be able to perform operations with {}",
        formatter::bold(APP_NAME),
        formatter::italic(BOT_NAME),
    )
}

/// Easter egg reply for /info: a song recommendation addressed to the user.
pub fn info_message(first_name: &str) -> String {
    format!(
        "Dale cachorro, escuchate {} {first_name} 🎶",
        formatter::link("esta", INFO_SONG_URL),
    )
}

pub fn try_again_pet_message() -> String {
    "Try again editing the form message or execute /createPet to start again".to_string()
}

pub fn try_again_alarm_message() -> String {
    "Try again editing the form message or execute /setAlarm to start again".to_string()
}

pub fn generic_failure_message() -> String {
    "Oops, something went wrong. Please try again".to_string()
}

/// Pet detail card shown when a pet button is pressed.
pub fn pet_card(name: &str, pet_type: &str) -> String {
    let mut message = format!("{}\n\n", formatter::bold(name));
    let items = vec![format!(
        "Type: {} {}",
        pet_type,
        formatter::pet_type_emoji(pet_type)
    )];
    message.push_str(&formatter::unordered_list(&items));
    message
}

/// Vaccine list: name in bold, then first/last/next dose dates.
pub fn vaccines_message(vaccines: &[Vaccine]) -> String {
    let mut message = String::new();
    for vaccine in vaccines {
        message.push_str(&format!("{}\n", formatter::bold(&vaccine.name)));

        let next_dose = vaccine
            .next_dose
            .as_ref()
            .map(formatter::date_to_string)
            .unwrap_or_else(|| NO_DATE.to_string());

        let dose_dates = vec![
            formatter::date_to_string(&vaccine.first_dose),
            formatter::date_to_string(&vaccine.last_dose),
            next_dose,
        ];

        message.push_str(&formatter::unordered_list(&dose_dates));
    }

    message
}

/// Treatment card: header with dates, then the comment list (already
/// sorted newest first by the domain model).
pub fn treatment_message(treatment: &Treatment) -> String {
    let date_end = treatment
        .date_end
        .as_ref()
        .map(formatter::date_to_string)
        .unwrap_or_else(|| NO_DATE.to_string());

    let next_turn = treatment
        .next_turn
        .as_ref()
        .map(formatter::date_to_string)
        .unwrap_or_else(|| NO_DATE.to_string());

    let mut message = format!(
        "{}: {}\nNext Turn: {}\nDate End: {}\nComments:\n",
        treatment.treatment_type,
        formatter::date_to_string(&treatment.date_start),
        next_turn,
        date_end,
    );

    let comment_lines = treatment
        .comments
        .iter()
        .map(|comment| comment.display_line())
        .collect::<Vec<_>>();

    message.push_str(&formatter::unordered_list(&comment_lines));
    message
}
