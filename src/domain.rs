//! Domain types exchanged with the Pet Place backend services.
//!
//! Treatments, vaccines and users are read-only projections of backend JSON.
//! `Treatment` keeps its comments sorted from most recent to oldest; the
//! ordering is established while deserializing and handlers rely on it when
//! rendering the comment list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::formatter;

/// Request body sent to the pets service to create a pet record.
///
/// Built once from a validated form submission and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PetRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub pet_type: String,
    pub register_date: DateTime<Utc>,
    pub birth_date: String,
    pub owner_id: i64,
}

impl PetRequest {
    /// Normalizes validated form values into the wire shape: capitalized
    /// name, lowercase type, birth date with slashes turned into dashes.
    /// The registration timestamp is taken here, not from user input.
    pub fn new(name: &str, pet_type: &str, birth_date: &str, owner_id: i64) -> Self {
        Self {
            name: formatter::capitalize(name),
            pet_type: pet_type.to_lowercase(),
            register_date: Utc::now(),
            birth_date: birth_date.replace('/', "-"),
            owner_id,
        }
    }
}

/// Brief pet identification, enough to build one button per pet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PetSummary {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub pet_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Treatment {
    pub id: String,
    #[serde(rename = "type")]
    pub treatment_type: String,
    #[serde(deserialize_with = "comments_newest_first")]
    pub comments: Vec<Comment>,
    pub date_start: DateTime<Utc>,
    pub date_end: Option<DateTime<Utc>>,
    #[serde(rename = "next_dose")]
    pub next_turn: Option<DateTime<Utc>>,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub date_added: DateTime<Utc>,
    pub information: String,
    pub owner: String,
}

impl Comment {
    /// One display line, e.g. `2023/12/18 by Lasso: take the full dose`.
    pub fn display_line(&self) -> String {
        format!(
            "{} by {}: {}",
            formatter::date_to_string(&self.date_added),
            self.owner,
            self.information
        )
    }
}

/// Sorts comments by descending date while deserializing, so every consumer
/// sees the most recent comment first.
fn comments_newest_first<'de, D>(deserializer: D) -> Result<Vec<Comment>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut comments = Vec::<Comment>::deserialize(deserializer)?;
    comments.sort_by(|a, b| b.date_added.cmp(&a.date_added));
    Ok(comments)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vaccine {
    pub name: String,
    pub first_dose: DateTime<Utc>,
    pub last_dose: DateTime<Utc>,
    pub next_dose: Option<DateTime<Utc>>,
}

/// User profile kept by the users service, looked up by telegram id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub user_id: i64,
    pub full_name: String,
    pub email: String,
    pub city: String,
}

/// One notification relayed through the webhook to a Telegram user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub telegram_id: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_pet_request_normalizes_fields() {
        let request = PetRequest::new("firulais", "DOG", "2020/03/15", 69);

        assert_eq!(request.name, "Firulais");
        assert_eq!(request.pet_type, "dog");
        assert_eq!(request.birth_date, "2020-03-15");
        assert_eq!(request.owner_id, 69);
    }

    #[test]
    fn test_comments_sorted_newest_first_on_deserialize() {
        let base = Utc.with_ymd_and_hms(2023, 12, 10, 12, 0, 0).unwrap();
        let raw = serde_json::json!({
            "id": "1",
            "type": "Medical appointment",
            "comments": [
                {"date_added": base - Duration::days(2), "information": "two days ago", "owner": "Lasso"},
                {"date_added": base, "information": "today", "owner": "Arjona"},
                {"date_added": base - Duration::days(1), "information": "yesterday", "owner": "Lasso"},
            ],
            "date_start": base,
            "date_end": null,
            "next_dose": null,
            "last_modified": base,
        });

        let treatment: Treatment = serde_json::from_value(raw).unwrap();
        let order: Vec<&str> = treatment
            .comments
            .iter()
            .map(|c| c.information.as_str())
            .collect();

        assert_eq!(order, vec!["today", "yesterday", "two days ago"]);
    }

    #[test]
    fn test_comment_display_line() {
        let comment = Comment {
            date_added: Utc.with_ymd_and_hms(2023, 12, 18, 9, 30, 0).unwrap(),
            information: "nothing to report".to_string(),
            owner: "Lasso".to_string(),
        };

        assert_eq!(
            comment.display_line(),
            "2023/12/18 by Lasso: nothing to report"
        );
    }

    #[test]
    fn test_pet_summary_uses_type_alias_in_json() {
        let summary: PetSummary =
            serde_json::from_str(r#"{"id": 1, "name": "Cartucho", "type": "DOG"}"#).unwrap();

        assert_eq!(summary.pet_type, "DOG");
    }
}
