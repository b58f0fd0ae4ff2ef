//! Field validators for extracted form values.
//!
//! Each validator is independent and side-effect free; handlers decide the
//! order, stop at the first failure and turn the message into a retry prompt.

use chrono::{NaiveDate, NaiveTime};

/// Species accepted by the pets service, matched case-insensitively.
pub const VALID_PET_TYPES: &[&str] = &[
    "monkey",
    "gorilla",
    "orangutan",
    "dog",
    "poodle",
    "wolf",
    "fox",
    "raccoon",
    "cat",
    "lion",
    "tiger",
    "leopard",
    "horse",
    "zebra",
    "deer",
    "bison",
    "ox",
    "water buffalo",
    "cow",
    "pig",
    "boar",
    "ram",
    "ewe",
    "goat",
    "camel",
    "llama",
    "giraffe",
    "elephant",
    "mammoth",
    "rhinoceros",
    "hippopotamus",
    "mouse",
    "rat",
    "hamster",
    "rabbit",
    "chipmunk",
    "beaver",
    "hedgehog",
    "bat",
    "bear",
    "polar bear",
    "koala",
    "panda",
    "sloth",
    "otter",
    "skunk",
    "kangaroo",
    "badger",
    "paw",
    "turkey",
    "chicken",
    "rooster",
    "bird",
    "penguin",
    "dove",
    "eagle",
    "duck",
    "swan",
    "owl",
    "dodo",
    "feather",
    "flamingo",
    "peacock",
    "parrot",
    "frog",
    "crocodile",
    "turtle",
    "lizard",
    "snake",
    "dragon",
    "sauropod",
    "whale",
    "dolphin",
    "seal",
    "fish",
    "blowfish",
    "shark",
    "octopus",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidPetType,
    InvalidDate(String),
    InvalidHour(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidPetType => {
                write!(
                    f,
                    "invalid pet type: valid types are {}",
                    VALID_PET_TYPES.join(", ")
                )
            }
            ValidationError::InvalidDate(date) => write!(f, "invalid date: {date}"),
            ValidationError::InvalidHour(hour) => write!(f, "invalid hour: {hour}"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Checks the given type against [`VALID_PET_TYPES`], ignoring case.
pub fn validate_pet_type(pet_type: &str) -> Result<(), ValidationError> {
    let pet_type = pet_type.to_lowercase();
    if !VALID_PET_TYPES.contains(&pet_type.as_str()) {
        return Err(ValidationError::InvalidPetType);
    }

    Ok(())
}

/// Checks that the date reads as `year/month/day`.
pub fn validate_date(date: &str) -> Result<(), ValidationError> {
    NaiveDate::parse_from_str(date, "%Y/%m/%d")
        .map(|_| ())
        .map_err(|_| ValidationError::InvalidDate(date.to_string()))
}

/// Checks a single hour in `H:MM` or `HH:MM` form. Comma-separated lists
/// are split by the caller and validated element-wise.
pub fn validate_hour(hour: &str) -> Result<(), ValidationError> {
    NaiveTime::parse_from_str(hour.trim(), "%H:%M")
        .map(|_| ())
        .map_err(|_| ValidationError::InvalidHour(hour.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_pet_type_is_case_insensitive() {
        assert!(validate_pet_type("rabbit").is_ok());
        assert!(validate_pet_type("RABBIT").is_ok());
        assert!(validate_pet_type("RaBBiT").is_ok());
    }

    #[test]
    fn test_validate_pet_type_accepts_the_whimsical_species() {
        assert!(validate_pet_type("paw").is_ok());
        assert!(validate_pet_type("dodo").is_ok());
        assert!(validate_pet_type("feather").is_ok());
        assert!(validate_pet_type("dragon").is_ok());
        assert!(validate_pet_type("Sauropod").is_ok());
    }

    #[test]
    fn test_validate_pet_type_rejects_unknown_species() {
        let err = validate_pet_type("Bad Bunny").unwrap_err();
        assert_eq!(err, ValidationError::InvalidPetType);
        assert!(err.to_string().contains("valid types are"));

        assert!(validate_pet_type("T-Rex").is_err());
    }

    #[test]
    fn test_validate_date_accepts_year_month_day_only() {
        assert!(validate_date("2023/12/10").is_ok());

        assert!(validate_date("10/12/2023").is_err());
        assert!(validate_date("12/10/2023").is_err());
        assert!(validate_date("2023-12-10").is_err());
    }

    #[test]
    fn test_validate_hour_formats() {
        assert!(validate_hour("9:30").is_ok());
        assert!(validate_hour("09:30").is_ok());
        assert!(validate_hour("23:59").is_ok());

        assert!(validate_hour("25:00").is_err());
        assert!(validate_hour("9.30").is_err());
        assert!(validate_hour("half past nine").is_err());
    }
}
