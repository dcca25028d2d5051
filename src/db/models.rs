use std::convert::TryFrom;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::db::jsonb::{from_jsonb, to_jsonb};
use crate::error::{Error, Result};
use crate::giveaway::models::{
    Giveaway, GiveawayId, GiveawayState, Participant, Reward, RewardId, RollPolicy,
};

// A row of the `giveaway` table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GiveawayRow {
    pub id: u64,
    pub description: String,
    pub participants: Value,
    pub finished: bool,
    pub created_at: DateTime<Utc>,
    pub state: String,
    pub roll_policy: String,
}

impl TryFrom<&Giveaway> for GiveawayRow {
    type Error = Error;

    fn try_from(giveaway: &Giveaway) -> Result<Self> {
        Ok(GiveawayRow {
            id: giveaway.id().0,
            description: giveaway.description().to_string(),
            participants: to_jsonb(&giveaway.participants())?,
            finished: giveaway.is_finished(),
            created_at: giveaway.created_at(),
            state: giveaway.state().as_str().to_string(),
            roll_policy: giveaway.roll_policy().as_str().to_string(),
        })
    }
}

impl TryFrom<GiveawayRow> for Giveaway {
    type Error = Error;

    fn try_from(row: GiveawayRow) -> Result<Self> {
        let state = row.state.parse::<GiveawayState>()?;
        if row.finished != (state == GiveawayState::Finished) {
            let message = format!(
                "The giveaway #{} is stored as `{}` with finished={}.",
                row.id, row.state, row.finished
            );
            return Err(Error::Storage(message));
        }

        let roll_policy = row
            .roll_policy
            .parse::<RollPolicy>()
            .map_err(|err| Error::Storage(err.to_string()))?;
        let participants = from_jsonb::<Vec<Participant>>(row.participants)?;

        Ok(Giveaway::restore(
            GiveawayId(row.id),
            row.description,
            participants,
            state,
            roll_policy,
            row.created_at,
        ))
    }
}

// A row of the `giveaway_object` table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GiveawayObjectRow {
    pub id: Uuid,
    pub giveaway_id: u64,
    pub value: String,
    pub description: Option<String>,
    pub object_info: Option<String>,
    pub object_type: String,
    pub object_state: String,
    pub holder: Option<Value>,
}

impl TryFrom<&Reward> for GiveawayObjectRow {
    type Error = Error;

    fn try_from(reward: &Reward) -> Result<Self> {
        let holder = match reward.holder() {
            Some(participant) => Some(to_jsonb(participant)?),
            None => None,
        };

        Ok(GiveawayObjectRow {
            id: reward.id().0,
            giveaway_id: reward.giveaway_id().0,
            value: reward.value().to_string(),
            description: reward.description().map(str::to_string),
            object_info: reward.object_info().map(str::to_string),
            object_type: reward.object_type().as_str().to_string(),
            object_state: reward.object_state().as_str().to_string(),
            holder,
        })
    }
}

impl TryFrom<GiveawayObjectRow> for Reward {
    type Error = Error;

    fn try_from(row: GiveawayObjectRow) -> Result<Self> {
        let holder = match row.holder {
            Some(value) => Some(from_jsonb::<Participant>(value)?),
            None => None,
        };

        Ok(Reward::restore(
            RewardId(row.id),
            GiveawayId(row.giveaway_id),
            row.value,
            row.description,
            row.object_info,
            row.object_type.parse()?,
            row.object_state.parse()?,
            holder,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::convert::TryFrom;

    use serde_json::json;

    use crate::db::models::{GiveawayObjectRow, GiveawayRow};
    use crate::error::Error;
    use crate::giveaway::models::{
        Giveaway, GiveawayId, GiveawayState, ObjectState, ObjectType, Participant, Reward,
        RollPolicy,
    };

    #[test]
    fn test_giveaway_row_columns() {
        let mut giveaway = Giveaway::new(GiveawayId(4), "Holiday Drop", RollPolicy::Random);
        giveaway.add_participant(Participant::new(1, "alice"));
        giveaway.set_state(GiveawayState::Finished);

        let row = GiveawayRow::try_from(&giveaway).unwrap();
        assert_eq!(row.id, 4);
        assert_eq!(row.description, "Holiday Drop");
        assert_eq!(row.participants, json!([{"user_id": 1, "username": "alice"}]));
        assert_eq!(row.finished, true);
        assert_eq!(row.state, "Finished");
        assert_eq!(row.roll_policy, "random");
    }

    #[test]
    fn test_get_error_for_inconsistent_finished_flag() {
        let giveaway = Giveaway::new(GiveawayId(1), "test giveaway", RollPolicy::Random);
        let mut row = GiveawayRow::try_from(&giveaway).unwrap();
        row.finished = true;

        let result = Giveaway::try_from(row);
        assert!(matches!(result, Err(Error::Storage(_))));
    }

    #[test]
    fn test_pending_reward_row_keeps_the_holder() {
        let mut reward = Reward::new(GiveawayId(2), "CODE1", ObjectType::Key);
        reward.set_object_state(ObjectState::Pending);
        reward.set_holder(Some(Participant::new(1, "alice")));

        let row = GiveawayObjectRow::try_from(&reward).unwrap();
        assert_eq!(row.giveaway_id, 2);
        assert_eq!(row.object_type, "Key");
        assert_eq!(row.object_state, "Pending");
        assert_eq!(row.holder, Some(json!({"user_id": 1, "username": "alice"})));

        let restored = Reward::try_from(row).unwrap();
        assert_eq!(restored, reward);
    }

    #[test]
    fn test_get_error_for_unknown_object_state() {
        let reward = Reward::new(GiveawayId(2), "CODE1", ObjectType::Key);
        let mut row = GiveawayObjectRow::try_from(&reward).unwrap();
        row.object_state = "Lost".to_string();

        let result = Reward::try_from(row);
        assert_eq!(
            result.unwrap_err(),
            Error::Storage("Unknown object state `Lost`.".to_string())
        );
    }
}
