//! # Form extraction
//!
//! Users reply to bot prompts with fixed-template text blocks ("forms")
//! whose labeled lines are parsed with anchored regexes. The labels and
//! their order are a contract: extraction tolerates extra whitespace and
//! blank lines between fields but rejects reordered or renamed labels.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

// Capture group tags shared with the handlers.
pub const NAME_TAG: &str = "Name";
pub const BIRTH_DATE_TAG: &str = "BirthDate";
pub const TYPE_TAG: &str = "Type";
pub const MESSAGE_TAG: &str = "Message";
pub const HOURS_TAG: &str = "Hours";
pub const START_DATE_TAG: &str = "StartDate";
pub const END_DATE_TAG: &str = "EndDate";

/// Sentinel accepted in optional date fields instead of a real date.
pub const NOT_APPLICABLE: &str = "N/A";

/// Pattern for the pet registration form (`Name` / `Birth Date` / `Type`).
pub static PET_FORM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"Name:\s?(?P<Name>[^\n]*)\s+Birth Date:\s?(?P<BirthDate>[^\n]*)\s+Type:\s?(?P<Type>[^\n]*)",
    )
    .expect("pet form pattern must compile")
});

/// Pattern for the alarm form (`Message` / `Hours` / `Start Date` / `End Date`).
pub static ALARM_FORM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"Message:\s*(?P<Message>[^\n]*)\s*Hours:\s*(?P<Hours>[^\n]*)\s+Start Date:\s*(?P<StartDate>[^\n]*)\s+End Date:\s*(?P<EndDate>[^\n]*)",
    )
    .expect("alarm form pattern must compile")
});

/// Why a form reply could not be turned into a field mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// The overall template did not match: labels renamed, reordered or
    /// removed. Takes precedence over any missing-field report.
    InvalidForm,
    /// The template matched but a required tag was not captured.
    MissingField(String),
}

impl std::fmt::Display for FormError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormError::InvalidForm => write!(f, "invalid form structure"),
            FormError::MissingField(tag) => write!(f, "missing field: {tag}"),
        }
    }
}

impl std::error::Error for FormError {}

/// Extracts the named capture groups of `pattern` from `raw` into a
/// tag-to-value mapping, then checks that every tag in `required` was
/// captured. Values keep their content untouched except for trailing
/// spaces; an empty value for a present tag is valid (length rules belong
/// to the caller).
pub fn extract_form(
    pattern: &Regex,
    raw: &str,
    required: &[&str],
) -> Result<HashMap<String, String>, FormError> {
    let captures = pattern.captures(raw).ok_or(FormError::InvalidForm)?;

    let mut fields = HashMap::new();
    for group_name in pattern.capture_names().flatten() {
        if let Some(value) = captures.name(group_name) {
            fields.insert(
                group_name.to_string(),
                value.as_str().trim_end_matches(' ').to_string(),
            );
        }
    }

    for tag in required {
        if !fields.contains_key(*tag) {
            return Err(FormError::MissingField((*tag).to_string()));
        }
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_pet_form_with_all_fields() {
        let raw = "Name: Cartucho\nBirth Date: 2020/03/15\nType: dog";
        let fields = extract_form(
            &PET_FORM_PATTERN,
            raw,
            &[NAME_TAG, BIRTH_DATE_TAG, TYPE_TAG],
        )
        .unwrap();

        assert_eq!(fields[NAME_TAG], "Cartucho");
        assert_eq!(fields[BIRTH_DATE_TAG], "2020/03/15");
        assert_eq!(fields[TYPE_TAG], "dog");
    }

    #[test]
    fn test_extract_tolerates_blank_lines_between_fields() {
        let raw = "Name: Cartucho\n\n\nBirth Date: 2020/03/15\n\nType: dog";
        let fields = extract_form(
            &PET_FORM_PATTERN,
            raw,
            &[NAME_TAG, BIRTH_DATE_TAG, TYPE_TAG],
        )
        .unwrap();

        assert_eq!(fields[NAME_TAG], "Cartucho");
        assert_eq!(fields[TYPE_TAG], "dog");
    }

    #[test]
    fn test_extract_rejects_reordered_labels() {
        let raw = "Type: dog\nName: Cartucho\nBirth Date: 2020/03/15";
        let err = extract_form(
            &PET_FORM_PATTERN,
            raw,
            &[NAME_TAG, BIRTH_DATE_TAG, TYPE_TAG],
        )
        .unwrap_err();

        assert_eq!(err, FormError::InvalidForm);
    }

    #[test]
    fn test_extract_rejects_renamed_label() {
        let raw = "Nombre: Cartucho\nBirth Date: 2020/03/15\nType: dog";
        let err = extract_form(
            &PET_FORM_PATTERN,
            raw,
            &[NAME_TAG, BIRTH_DATE_TAG, TYPE_TAG],
        )
        .unwrap_err();

        assert_eq!(err, FormError::InvalidForm);
    }

    #[test]
    fn test_missing_required_tag_is_reported_by_name() {
        let raw = "Name: Cartucho\nBirth Date: 2020/03/15\nType: dog";
        let err = extract_form(&PET_FORM_PATTERN, raw, &[NAME_TAG, "Color"]).unwrap_err();

        assert_eq!(err, FormError::MissingField("Color".to_string()));
    }

    #[test]
    fn test_empty_value_for_present_tag_is_valid() {
        let raw = "Name: \nBirth Date: 2020/03/15\nType: dog";
        let fields = extract_form(
            &PET_FORM_PATTERN,
            raw,
            &[NAME_TAG, BIRTH_DATE_TAG, TYPE_TAG],
        )
        .unwrap();

        assert_eq!(fields[NAME_TAG], "");
    }

    #[test]
    fn test_extract_alarm_form_keeps_sentinel_end_date() {
        let raw = "Message: pill time\nHours: 9:30,21:30\nStart Date: 2024/01/01\nEnd Date: N/A";
        let fields = extract_form(
            &ALARM_FORM_PATTERN,
            raw,
            &[MESSAGE_TAG, HOURS_TAG, START_DATE_TAG, END_DATE_TAG],
        )
        .unwrap();

        assert_eq!(fields[MESSAGE_TAG], "pill time");
        assert_eq!(fields[HOURS_TAG], "9:30,21:30");
        assert_eq!(fields[END_DATE_TAG], NOT_APPLICABLE);
    }

    #[test]
    fn test_trailing_spaces_are_stripped_from_values() {
        let raw = "Message: pill time   \nHours: 9:30\nStart Date: 2024/01/01\nEnd Date: N/A";
        let fields = extract_form(&ALARM_FORM_PATTERN, raw, &[MESSAGE_TAG]).unwrap();

        assert_eq!(fields[MESSAGE_TAG], "pill time");
    }
}
