use lazy_static::lazy_static;
use regex::Regex;

use crate::giveaway::models::ObjectType;

lazy_static! {
    // The last `[...]` group on the key side of the delimiter.
    static ref OBJECT_INFO_REGEX: Regex =
        Regex::new(r"(?s)^(?P<value>.*?)\s*(?P<object_info>\[[^\[\]]*\])\s*$").unwrap();
}

const KEY_DELIMITER: &str = "->";

#[readonly::make]
#[derive(Debug, Clone)]
pub struct ParsedReward {
    pub value: String,
    pub description: Option<String>,
    pub object_info: Option<String>,
    pub object_type: ObjectType,
}

// Splits the reward text in the `VALUE [object info] -> description` format.
// Anything with the `->` delimiter is a key; the rest is stored as is.
pub fn parse_reward(text: &str) -> ParsedReward {
    let (key_part, description) = match text.split_once(KEY_DELIMITER) {
        Some(parts) => parts,
        None => {
            return ParsedReward {
                value: text.trim().to_owned(),
                description: None,
                object_info: None,
                object_type: ObjectType::Other,
            };
        }
    };

    let key_part = key_part.trim();
    let (value, object_info) = match OBJECT_INFO_REGEX.captures(key_part) {
        Some(captures) if !captures["value"].trim().is_empty() => (
            captures["value"].trim().to_string(),
            Some(captures["object_info"].to_string()),
        ),
        _ => (key_part.to_string(), None),
    };

    ParsedReward {
        value: match value.is_empty() {
            true => text.trim().to_owned(),
            false => value,
        },
        description: Some(description.trim().to_string()).filter(|found| !found.is_empty()),
        object_info,
        object_type: ObjectType::Key,
    }
}
