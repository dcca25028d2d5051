use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::giveaway::util::ParsedReward;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct GiveawayId(pub u64);

impl fmt::Display for GiveawayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct RewardId(pub Uuid);

impl RewardId {
    pub fn new() -> Self {
        RewardId(Uuid::new_v4())
    }
}

impl Default for RewardId {
    fn default() -> Self {
        RewardId::new()
    }
}

impl fmt::Display for RewardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    user_id: u64,
    username: String,
}

impl Participant {
    pub fn new(user_id: u64, username: &str) -> Self {
        Participant {
            user_id,
            username: username.to_string(),
        }
    }

    // Returns a unique identifier in the chat
    pub fn get_user_id(&self) -> u64 {
        self.user_id
    }

    // Returns a display name in the chat room
    pub fn get_username(&self) -> String {
        self.username.clone()
    }
}

// Usernames can change between commands, the user id can't.
impl PartialEq for Participant {
    fn eq(&self, other: &Self) -> bool {
        self.user_id == other.user_id
    }
}

impl Eq for Participant {}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum GiveawayState {
    // Created by the owner, rewards can be added but nobody can join yet.
    Created,
    // Open for joins and rolls.
    Started,
    // Paused by the owner. Pending rewards can still be resolved.
    Deactivated,
    // Terminal. Nothing can be changed anymore.
    Finished,
}

impl GiveawayState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GiveawayState::Created => "Created",
            GiveawayState::Started => "Started",
            GiveawayState::Deactivated => "Deactivated",
            GiveawayState::Finished => "Finished",
        }
    }

    pub fn can_transition_to(&self, next: GiveawayState) -> bool {
        matches!(
            (self, next),
            (GiveawayState::Created, GiveawayState::Started)
                | (GiveawayState::Started, GiveawayState::Deactivated)
                | (GiveawayState::Deactivated, GiveawayState::Started)
                | (GiveawayState::Started, GiveawayState::Finished)
                | (GiveawayState::Deactivated, GiveawayState::Finished)
        )
    }
}

impl FromStr for GiveawayState {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "Created" => Ok(GiveawayState::Created),
            "Started" => Ok(GiveawayState::Started),
            "Deactivated" => Ok(GiveawayState::Deactivated),
            "Finished" => Ok(GiveawayState::Finished),
            other => Err(Error::Storage(format!("Unknown giveaway state `{}`.", other))),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum RollPolicy {
    // Uniform choice among all unused rewards.
    Random,
    // The participant picks the reward by its number in the list.
    Manual,
}

impl RollPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RollPolicy::Random => "random",
            RollPolicy::Manual => "manual",
        }
    }
}

impl FromStr for RollPolicy {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "random" => Ok(RollPolicy::Random),
            "manual" => Ok(RollPolicy::Manual),
            other => Err(Error::Config(format!(
                "Unknown roll policy `{}`. Expected `random` or `manual`.",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Giveaway {
    id: GiveawayId,
    description: String,
    // Join order is preserved.
    participants: Vec<Participant>,
    state: GiveawayState,
    roll_policy: RollPolicy,
    created_at: DateTime<Utc>,
}

impl Giveaway {
    pub fn new(id: GiveawayId, description: &str, roll_policy: RollPolicy) -> Self {
        Giveaway {
            id,
            description: description.to_string(),
            participants: Vec::new(),
            state: GiveawayState::Created,
            roll_policy,
            created_at: Utc::now(),
        }
    }

    pub(crate) fn restore(
        id: GiveawayId,
        description: String,
        participants: Vec<Participant>,
        state: GiveawayState,
        roll_policy: RollPolicy,
        created_at: DateTime<Utc>,
    ) -> Self {
        Giveaway {
            id,
            description,
            participants,
            state,
            roll_policy,
            created_at,
        }
    }

    pub fn id(&self) -> GiveawayId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn state(&self) -> GiveawayState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == GiveawayState::Finished
    }

    pub fn is_started(&self) -> bool {
        self.state == GiveawayState::Started
    }

    pub fn roll_policy(&self) -> RollPolicy {
        self.roll_policy
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn has_participant(&self, participant: &Participant) -> bool {
        self.participants.contains(participant)
    }

    pub(crate) fn set_state(&mut self, state: GiveawayState) {
        self.state = state;
    }

    pub(crate) fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    pub(crate) fn add_participant(&mut self, participant: Participant) {
        self.participants.push(participant);
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ObjectType {
    // Store or game key, usually in the `AAAAA-BBBBB-CCCCC [Store] -> Game` form.
    Key,
    Other,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Key => "Key",
            ObjectType::Other => "Other",
        }
    }
}

impl FromStr for ObjectType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "Key" => Ok(ObjectType::Key),
            "Other" => Ok(ObjectType::Other),
            other => Err(Error::Storage(format!("Unknown object type `{}`.", other))),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ObjectState {
    // The reward has been activated by someone and works without any issues.
    Activated,
    // The reward was taken by someone, but not verified yet.
    Pending,
    // The reward hasn't been taken by anyone.
    Unused,
}

impl ObjectState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectState::Activated => "Activated",
            ObjectState::Pending => "Pending",
            ObjectState::Unused => "Unused",
        }
    }

    // A finished giveaway may only hold rewards in these states.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ObjectState::Pending)
    }

    pub fn can_transition_to(&self, next: ObjectState) -> bool {
        matches!(
            (self, next),
            (ObjectState::Unused, ObjectState::Pending)
                | (ObjectState::Pending, ObjectState::Activated)
                | (ObjectState::Pending, ObjectState::Unused)
        )
    }
}

impl FromStr for ObjectState {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "Activated" => Ok(ObjectState::Activated),
            "Pending" => Ok(ObjectState::Pending),
            "Unused" => Ok(ObjectState::Unused),
            other => Err(Error::Storage(format!("Unknown object state `{}`.", other))),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Reward {
    // A unique identifier of the reward in the giveaway(s)
    id: RewardId,
    giveaway_id: GiveawayId,
    // The actual prize.
    value: String,
    description: Option<String>,
    // Additional info about the reward (e.g. the store where the key can be activated)
    object_info: Option<String>,
    object_type: ObjectType,
    object_state: ObjectState,
    // Who rolled the reward. Cleared when the reward is returned to the pool.
    holder: Option<Participant>,
}

impl Reward {
    pub fn new(giveaway_id: GiveawayId, value: &str, object_type: ObjectType) -> Self {
        Reward {
            id: RewardId::new(),
            giveaway_id,
            value: value.to_string(),
            description: None,
            object_info: None,
            object_type,
            object_state: ObjectState::Unused,
            holder: None,
        }
    }

    pub fn from_parsed(giveaway_id: GiveawayId, parsed: &ParsedReward) -> Self {
        Reward {
            id: RewardId::new(),
            giveaway_id,
            value: parsed.value.clone(),
            description: parsed.description.clone(),
            object_info: parsed.object_info.clone(),
            object_type: parsed.object_type,
            object_state: ObjectState::Unused,
            holder: None,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        id: RewardId,
        giveaway_id: GiveawayId,
        value: String,
        description: Option<String>,
        object_info: Option<String>,
        object_type: ObjectType,
        object_state: ObjectState,
        holder: Option<Participant>,
    ) -> Self {
        Reward {
            id,
            giveaway_id,
            value,
            description,
            object_info,
            object_type,
            object_state,
            holder,
        }
    }

    pub fn id(&self) -> RewardId {
        self.id
    }

    pub fn giveaway_id(&self) -> GiveawayId {
        self.giveaway_id
    }

    // Returns the reward's store key or a plain text
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn object_info(&self) -> Option<&str> {
        self.object_info.as_deref()
    }

    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    pub fn object_state(&self) -> ObjectState {
        self.object_state
    }

    pub fn holder(&self) -> Option<&Participant> {
        self.holder.as_ref()
    }

    pub fn is_pending_for(&self, participant: &Participant) -> bool {
        self.object_state == ObjectState::Pending && self.holder.as_ref() == Some(participant)
    }

    pub(crate) fn set_object_state(&mut self, state: ObjectState) {
        self.object_state = state;
    }

    pub(crate) fn set_holder(&mut self, holder: Option<Participant>) {
        self.holder = holder;
    }
}
