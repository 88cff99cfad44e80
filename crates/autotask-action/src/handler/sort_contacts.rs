//! Contact sorting action handler.
//!
//! Sorts a JSON array of contact objects by last name, then first name.
//! The sort is stable and each object's key order is kept as read.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::HandlerError;
use crate::handler::{fs, json};
use crate::handler::{ActionContext, ActionHandler};
use crate::types::ActionKind;

pub struct SortContactsHandler;

fn name_field<'a>(
    contact: &'a Map<String, Value>,
    index: usize,
    field: &str,
) -> Result<&'a str, HandlerError> {
    match contact.get(field) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(HandlerError::domain(format!(
            "contact {} has a non-string \"{}\"",
            index, field
        ))),
        None => Err(HandlerError::domain(format!(
            "contact {} is missing \"{}\"",
            index, field
        ))),
    }
}

/// Parse, validate and sort `content`, returning the pretty-printed result.
pub fn sort_contacts(content: &str) -> Result<String, HandlerError> {
    let contacts: Vec<Map<String, Value>> = serde_json::from_str(content).map_err(|e| {
        HandlerError::domain(format!(
            "contacts.json is not a JSON array of objects: {}",
            e
        ))
    })?;

    // Validate every key up front so the sort itself cannot fail halfway.
    let mut keyed = Vec::with_capacity(contacts.len());
    for (index, contact) in contacts.iter().enumerate() {
        let last = name_field(contact, index, "last_name")?.to_string();
        let first = name_field(contact, index, "first_name")?.to_string();
        keyed.push(((last, first), index));
    }
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    let sorted: Vec<&Map<String, Value>> = keyed.iter().map(|(_, i)| &contacts[*i]).collect();
    json::to_pretty_ascii(&sorted, "contacts")
}

#[async_trait]
impl ActionHandler for SortContactsHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::SortContacts
    }

    async fn execute(&self, ctx: &ActionContext) -> Result<String, HandlerError> {
        let input = ctx.target("input")?.clone();
        let output = ctx.target("output")?.clone();

        fs::blocking(move || {
            let content = fs::read_input(&input)?;
            let sorted = sort_contacts(&content)?;
            fs::write_output(&output, sorted.as_bytes())
        })
        .await?;

        tracing::info!("Contacts sorted");
        Ok("Contacts sorted successfully.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::testing::{spec, Sandbox};

    #[tokio::test]
    async fn test_sorts_by_last_then_first_name() {
        let sandbox = Sandbox::new();
        sandbox.write(
            "contacts.json",
            r#"[
                {"first_name": "Zoe", "last_name": "Adams", "email": "z@a.io"},
                {"first_name": "Bob", "last_name": "Young", "email": "b@y.io"},
                {"first_name": "Amy", "last_name": "Adams", "email": "a@a.io"}
            ]"#,
        );
        let ctx = sandbox.context(spec(ActionKind::SortContacts), &[]);

        let msg = SortContactsHandler.execute(&ctx).await.unwrap();
        assert_eq!(msg, "Contacts sorted successfully.");

        let written = sandbox.read("contacts-sorted.json");
        let expected = r#"[
  {
    "first_name": "Amy",
    "last_name": "Adams",
    "email": "a@a.io"
  },
  {
    "first_name": "Zoe",
    "last_name": "Adams",
    "email": "z@a.io"
  },
  {
    "first_name": "Bob",
    "last_name": "Young",
    "email": "b@y.io"
  }
]"#;
        assert_eq!(written, expected);
    }

    #[test]
    fn test_sort_is_stable_on_equal_names() {
        let content = r#"[
            {"first_name": "Ann", "last_name": "Lee", "id": 1},
            {"first_name": "Ann", "last_name": "Kim", "id": 2},
            {"first_name": "Ann", "last_name": "Lee", "id": 3}
        ]"#;
        let sorted: Vec<Value> = serde_json::from_str(&sort_contacts(content).unwrap()).unwrap();
        let ids: Vec<i64> = sorted.iter().map(|c| c["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_missing_name_field_is_domain_error() {
        let err = sort_contacts(r#"[{"first_name": "Ann"}]"#).unwrap_err();
        assert_eq!(
            err,
            HandlerError::Domain("contact 0 is missing \"last_name\"".to_string())
        );
    }

    #[test]
    fn test_non_string_name_is_domain_error() {
        let err = sort_contacts(r#"[{"first_name": "A", "last_name": 3}]"#).unwrap_err();
        assert!(matches!(err, HandlerError::Domain(msg) if msg.contains("non-string")));
    }

    #[test]
    fn test_malformed_json_is_domain_error() {
        assert!(matches!(
            sort_contacts("{\"not\": \"an array\"}"),
            Err(HandlerError::Domain(_))
        ));
        assert!(matches!(sort_contacts("[1, 2]"), Err(HandlerError::Domain(_))));
    }

    #[test]
    fn test_non_ascii_names_are_escaped() {
        let sorted = sort_contacts(r#"[{"first_name": "Zoë", "last_name": "Brontë"}]"#).unwrap();
        assert!(sorted.contains("\"Zo\\u00eb\""));
        assert!(sorted.contains("\"Bront\\u00eb\""));
        assert!(sorted.is_ascii());
    }

    #[test]
    fn test_empty_array_stays_empty() {
        assert_eq!(sort_contacts("[]").unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_failed_sort_leaves_no_output() {
        let sandbox = Sandbox::new();
        sandbox.write("contacts.json", "not json");
        let ctx = sandbox.context(spec(ActionKind::SortContacts), &[]);

        assert!(SortContactsHandler.execute(&ctx).await.is_err());
        assert!(!sandbox.path("contacts-sorted.json").exists());
    }
}
