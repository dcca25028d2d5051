// DDL of the `giveaway` and `giveaway_object` tables.
pub const CREATE_TABLES: &str = include_str!("../../migrations/0001_create_giveaways.sql");

pub const GIVEAWAY_COLUMNS: [&str; 7] = [
    "id",
    "description",
    "participants",
    "finished",
    "created_at",
    "state",
    "roll_policy",
];

pub const GIVEAWAY_OBJECT_COLUMNS: [&str; 8] = [
    "id",
    "giveaway_id",
    "value",
    "description",
    "object_info",
    "object_type",
    "object_state",
    "holder",
];

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::db::models::{GiveawayObjectRow, GiveawayRow};
    use crate::db::schema::{CREATE_TABLES, GIVEAWAY_COLUMNS, GIVEAWAY_OBJECT_COLUMNS};
    use crate::giveaway::models::{Giveaway, GiveawayId, ObjectType, Reward, RollPolicy};

    fn field_names(value: Value) -> Vec<String> {
        match value {
            Value::Object(fields) => fields.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn test_rows_match_the_columns() {
        let giveaway = Giveaway::new(GiveawayId(1), "test giveaway", RollPolicy::Random);
        let reward = Reward::new(GiveawayId(1), "CODE1", ObjectType::Key);
        let giveaway_row = serde_json::to_value(GiveawayRow::try_from(&giveaway).unwrap()).unwrap();
        let object_row = serde_json::to_value(GiveawayObjectRow::try_from(&reward).unwrap()).unwrap();

        let mut expected = GIVEAWAY_COLUMNS.to_vec();
        expected.sort();
        assert_eq!(field_names(giveaway_row), expected);

        let mut expected = GIVEAWAY_OBJECT_COLUMNS.to_vec();
        expected.sort();
        assert_eq!(field_names(object_row), expected);
    }

    #[test]
    fn test_ddl_declares_every_column() {
        for column in GIVEAWAY_COLUMNS.iter().chain(GIVEAWAY_OBJECT_COLUMNS.iter()) {
            assert!(CREATE_TABLES.contains(&format!("    {} ", column)), "{} is missing", column);
        }
        assert!(CREATE_TABLES.contains("ON DELETE CASCADE"));
    }
}
