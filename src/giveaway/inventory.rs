use std::convert::TryFrom;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::db::models::GiveawayObjectRow;
use crate::error::{Error, Result};
use crate::giveaway::models::{GiveawayId, ObjectState, ObjectType, Reward, RewardId};
use crate::giveaway::util::parse_reward;
use crate::state::BotState;
use crate::storage::GiveawayStorage;

// Manages the rewards attached to the giveaways.
pub struct RewardInventory {
    state: Arc<BotState>,
    storage: Arc<dyn GiveawayStorage>,
}

impl RewardInventory {
    pub fn new(state: Arc<BotState>, storage: Arc<dyn GiveawayStorage>) -> Self {
        RewardInventory { state, storage }
    }

    pub fn add(&self, giveaway_id: GiveawayId, value: &str, object_type: ObjectType) -> Result<Reward> {
        let reward = Reward::new(giveaway_id, value, object_type);
        let mut added = self.attach(giveaway_id, vec![reward])?;
        Ok(added.remove(0))
    }

    // Parses the text into the certain type of reward and adds it to the giveaway.
    pub fn add_parsed(&self, giveaway_id: GiveawayId, text: &str) -> Result<Reward> {
        let reward = Reward::from_parsed(giveaway_id, &parse_reward(text));
        let mut added = self.attach(giveaway_id, vec![reward])?;
        Ok(added.remove(0))
    }

    // Adds one reward per non-empty line. Either every line is added or none.
    pub fn add_many(&self, giveaway_id: GiveawayId, text: &str) -> Result<Vec<Reward>> {
        let rewards = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| Reward::from_parsed(giveaway_id, &parse_reward(line)))
            .collect::<Vec<Reward>>();
        self.attach(giveaway_id, rewards)
    }

    #[instrument(skip(self))]
    pub fn remove(&self, reward_id: RewardId) -> Result<Reward> {
        let owner = self.state.locate_reward(reward_id)?;
        self.state.with_giveaway(owner, |entry| {
            if entry.giveaway.is_finished() {
                let message = format!(
                    "The giveaway #{} has been finished, its rewards can't be changed.",
                    owner
                );
                return Err(Error::InvalidTransition(message));
            }

            let position = entry
                .reward_position(reward_id)
                .ok_or_else(|| reward_not_found(reward_id))?;
            if entry.rewards[position].object_state() == ObjectState::Pending {
                let message = "The reward is waiting for confirmation. Please, confirm \
                    or deny it before removing."
                    .to_string();
                return Err(Error::InvalidState(message));
            }

            self.storage.delete_object(reward_id.0)?;
            self.state.unindex_reward(reward_id);
            let removed = entry.rewards.remove(position);
            info!(giveaway = %owner, reward = %reward_id, "reward removed");
            Ok(removed)
        })
    }

    // Returns the rewards of the giveaway in the order they were added.
    pub fn list(&self, giveaway_id: GiveawayId) -> Result<Vec<Reward>> {
        self.state
            .with_giveaway(giveaway_id, |entry| Ok(entry.rewards.clone()))
    }

    pub fn get(&self, reward_id: RewardId) -> Result<Reward> {
        let owner = self.state.locate_reward(reward_id)?;
        self.state.with_giveaway(owner, |entry| {
            entry
                .reward_position(reward_id)
                .map(|position| entry.rewards[position].clone())
                .ok_or_else(|| reward_not_found(reward_id))
        })
    }

    fn attach(&self, giveaway_id: GiveawayId, rewards: Vec<Reward>) -> Result<Vec<Reward>> {
        self.state.with_giveaway(giveaway_id, |entry| {
            // A finished giveaway is gone as far as new rewards are concerned.
            if entry.giveaway.is_finished() {
                let message = format!(
                    "The giveaway #{} has been finished, new rewards can't be added.",
                    giveaway_id
                );
                return Err(Error::NotFound(message));
            }

            let rows = rewards
                .iter()
                .map(GiveawayObjectRow::try_from)
                .collect::<Result<Vec<GiveawayObjectRow>>>()?;
            self.storage.save_objects(&rows)?;

            for reward in rewards.iter() {
                self.state.index_reward(reward.id(), giveaway_id);
                debug!(giveaway = %giveaway_id, reward = %reward.id(), "reward added");
            }
            entry.rewards.extend(rewards.iter().cloned());
            Ok(rewards)
        })
    }
}

pub(crate) fn reward_not_found(reward_id: RewardId) -> Error {
    Error::NotFound(format!("The requested reward {} was not found.", reward_id))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::error::Error;
    use crate::giveaway::inventory::RewardInventory;
    use crate::giveaway::models::{GiveawayId, ObjectState, ObjectType, RewardId, RollPolicy};
    use crate::giveaway::registry::GiveawayRegistry;
    use crate::state::BotState;
    use crate::storage::{GiveawayStorage, MemoryStorage};

    fn setup() -> (GiveawayRegistry, RewardInventory, Arc<MemoryStorage>) {
        let state = Arc::new(BotState::new());
        let storage = Arc::new(MemoryStorage::new());
        let registry = GiveawayRegistry::new(state.clone(), storage.clone(), RollPolicy::Random);
        let inventory = RewardInventory::new(state, storage.clone());
        (registry, inventory, storage)
    }

    #[test]
    fn test_get_rewards_for_a_new_giveaway() {
        let (registry, inventory, _) = setup();
        let id = registry.create("test giveaway").unwrap().id();

        assert!(inventory.list(id).unwrap().is_empty());
    }

    #[test]
    fn test_add_reward() {
        let (registry, inventory, storage) = setup();
        let id = registry.create("test giveaway").unwrap().id();

        let reward = inventory.add(id, "CODE1", ObjectType::Key).unwrap();
        assert_eq!(reward.giveaway_id(), id);
        assert_eq!(reward.object_state(), ObjectState::Unused);
        assert_eq!(inventory.list(id).unwrap(), vec![reward.clone()]);
        assert_eq!(inventory.get(reward.id()).unwrap(), reward);
        assert_eq!(storage.load_objects().unwrap().len(), 1);
    }

    #[test]
    fn test_rewards_are_listed_in_creation_order() {
        let (registry, inventory, _) = setup();
        let id = registry.create("test giveaway").unwrap().id();
        inventory.add(id, "first", ObjectType::Other).unwrap();
        inventory.add(id, "second", ObjectType::Other).unwrap();
        inventory.add(id, "third", ObjectType::Other).unwrap();

        let values = inventory
            .list(id)
            .unwrap()
            .iter()
            .map(|reward| reward.value().to_string())
            .collect::<Vec<String>>();
        assert_eq!(values, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_add_parsed_reward() {
        let (registry, inventory, _) = setup();
        let id = registry.create("test giveaway").unwrap().id();

        let reward = inventory
            .add_parsed(id, "AAAAA-BBBBB-CCCCC-DDDD [Store] -> Some game")
            .unwrap();
        assert_eq!(reward.value(), "AAAAA-BBBBB-CCCCC-DDDD");
        assert_eq!(reward.object_type(), ObjectType::Key);
    }

    #[test]
    fn test_add_many_skips_blank_lines() {
        let (registry, inventory, _) = setup();
        let id = registry.create("test giveaway").unwrap().id();

        let added = inventory
            .add_many(id, "AAAAA-BBBBB -> Game\n\n  just a text  \n")
            .unwrap();
        assert_eq!(added.len(), 2);
        assert_eq!(added[0].object_type(), ObjectType::Key);
        assert_eq!(added[1].value(), "just a text");
        assert_eq!(inventory.list(id).unwrap().len(), 2);
    }

    #[test]
    fn test_get_error_for_adding_to_unknown_giveaway() {
        let (_, inventory, _) = setup();

        let result = inventory.add(GiveawayId(3), "CODE1", ObjectType::Key);
        assert_eq!(
            result.unwrap_err(),
            Error::NotFound("The requested giveaway #3 was not found.".to_string())
        );
    }

    #[test]
    fn test_get_error_for_adding_to_finished_giveaway() {
        let (registry, inventory, _) = setup();
        let id = registry.create("test giveaway").unwrap().id();
        registry.start(id).unwrap();
        registry.finish(id).unwrap();

        let result = inventory.add(id, "CODE1", ObjectType::Key);
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_remove_reward() {
        let (registry, inventory, storage) = setup();
        let id = registry.create("test giveaway").unwrap().id();
        let reward = inventory.add(id, "CODE1", ObjectType::Key).unwrap();

        let removed = inventory.remove(reward.id()).unwrap();
        assert_eq!(removed, reward);
        assert!(inventory.list(id).unwrap().is_empty());
        assert!(storage.load_objects().unwrap().is_empty());
        assert!(matches!(inventory.get(reward.id()), Err(Error::NotFound(_))));
        assert!(matches!(inventory.remove(reward.id()), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_get_error_for_removing_unknown_reward() {
        let (_, inventory, _) = setup();

        assert!(matches!(inventory.remove(RewardId::new()), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_get_error_for_removing_from_finished_giveaway() {
        let (registry, inventory, _) = setup();
        let id = registry.create("test giveaway").unwrap().id();
        let reward = inventory.add(id, "CODE1", ObjectType::Key).unwrap();
        registry.start(id).unwrap();
        registry.finish(id).unwrap();

        let result = inventory.remove(reward.id());
        assert!(matches!(result, Err(Error::InvalidTransition(_))));
        assert_eq!(inventory.list(id).unwrap().len(), 1);
    }
}
