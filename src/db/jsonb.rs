// Helpers for the JSONB columns (`giveaway.participants`, `giveaway_object.holder`).
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;

pub fn to_jsonb<T: Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

pub fn from_jsonb<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::db::jsonb::{from_jsonb, to_jsonb};
    use crate::error::Error;
    use crate::giveaway::models::Participant;

    #[test]
    fn test_participants_are_stored_as_json_array() {
        let participants = vec![Participant::new(1, "alice"), Participant::new(2, "bob")];

        let value = to_jsonb(&participants).unwrap();
        assert_eq!(
            value,
            json!([
                {"user_id": 1, "username": "alice"},
                {"user_id": 2, "username": "bob"},
            ])
        );
    }

    #[test]
    fn test_get_storage_error_for_malformed_column() {
        let result = from_jsonb::<Vec<Participant>>(json!({"user_id": "not a number"}));

        assert!(matches!(result, Err(Error::Storage(_))));
    }
}
