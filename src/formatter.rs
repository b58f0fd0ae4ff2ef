//! Markdown helpers shared by the bot handlers.

use chrono::{DateTime, Utc};

pub fn bold(text: &str) -> String {
    format!("**{text}**")
}

pub fn italic(text: &str) -> String {
    format!("_{text}_")
}

pub fn link(text: &str, url: &str) -> String {
    format!("[{text}]({url})")
}

pub fn unordered_list(items: &[String]) -> String {
    let mut output = String::new();
    for item in items {
        output.push_str(&format!("\t• {item}\n\n"));
    }

    output
}

/// Uppercases the first character and lowercases the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Renders a timestamp the way users type dates in forms: `YYYY/MM/DD`.
pub fn date_to_string(date: &DateTime<Utc>) -> String {
    date.format("%Y/%m/%d").to_string()
}

/// Emoji shown next to the pet name on buttons. Types come from the backend
/// already validated, anything unexpected falls back to a paw.
pub fn pet_type_emoji(pet_type: &str) -> &'static str {
    match pet_type.to_lowercase().as_str() {
        "dog" | "poodle" => "🐶",
        "cat" => "🐱",
        "rabbit" => "🐰",
        "hamster" => "🐹",
        "mouse" | "rat" => "🐭",
        "horse" => "🐴",
        "cow" | "ox" => "🐮",
        "pig" | "boar" => "🐷",
        "bird" | "parrot" => "🦜",
        "chicken" | "rooster" => "🐔",
        "duck" | "swan" => "🦆",
        "turtle" => "🐢",
        "lizard" | "snake" => "🦎",
        "frog" => "🐸",
        "fish" | "blowfish" => "🐠",
        "crocodile" => "🐊",
        "otter" => "🦦",
        _ => "🐾",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_bold_italic_link() {
        assert_eq!(bold("Pet Place"), "**Pet Place**");
        assert_eq!(italic("Ringot"), "_Ringot_");
        assert_eq!(
            link("sign up", "https://example.com"),
            "[sign up](https://example.com)"
        );
    }

    #[test]
    fn test_unordered_list_bullets_items() {
        let list = unordered_list(&["only".to_string()]);
        assert_eq!(list, "\t• only\n\n");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("firulais"), "Firulais");
        assert_eq!(capitalize("CARTUCHO"), "Cartucho");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_date_to_string_uses_slashes() {
        let date = Utc.with_ymd_and_hms(2024, 1, 8, 15, 0, 0).unwrap();
        assert_eq!(date_to_string(&date), "2024/01/08");
    }

    #[test]
    fn test_pet_type_emoji_falls_back_to_paw() {
        assert_eq!(pet_type_emoji("DOG"), "🐶");
        assert_eq!(pet_type_emoji("dragon"), "🐾");
    }
}
