use std::collections::{HashMap, HashSet};
use std::convert::TryFrom;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::giveaway::allocator::RollAllocator;
use crate::giveaway::inventory::RewardInventory;
use crate::giveaway::models::{Giveaway, GiveawayId, ObjectState, Reward, RollPolicy};
use crate::giveaway::registry::GiveawayRegistry;
use crate::state::{BotState, GiveawayEntry};
use crate::storage::{GiveawayStorage, MemoryStorage};

// Entry point to the giveaway engine. All three components share the same
// state and storage, so the manager can be cloned into any number of tasks.
#[derive(Clone)]
#[non_exhaustive]
pub struct GiveawayManager {
    state: Arc<BotState>,
    registry: Arc<GiveawayRegistry>,
    inventory: Arc<RewardInventory>,
    allocator: Arc<RollAllocator>,
}

impl GiveawayManager {
    // Creates an empty manager backed by the in-memory storage.
    pub fn new(config: &Config) -> Self {
        GiveawayManager::with_storage(Arc::new(MemoryStorage::new()), config.roll_policy())
    }

    pub fn with_storage(storage: Arc<dyn GiveawayStorage>, default_policy: RollPolicy) -> Self {
        GiveawayManager::from_state(Arc::new(BotState::new()), storage, default_policy)
    }

    // Rebuilds the giveaways, rewards and their holders from the stored rows.
    #[instrument(skip(storage))]
    pub fn restore(storage: Arc<dyn GiveawayStorage>, default_policy: RollPolicy) -> Result<Self> {
        let mut rewards: HashMap<GiveawayId, Vec<Reward>> = HashMap::new();
        for row in storage.load_objects()? {
            let reward = Reward::try_from(row)?;
            rewards.entry(reward.giveaway_id()).or_default().push(reward);
        }

        let state = Arc::new(BotState::new());
        let mut restored = 0;
        for row in storage.load_giveaways()? {
            let giveaway = Giveaway::try_from(row)?;
            let mut entry = GiveawayEntry::new(giveaway);
            entry.rewards = rewards.remove(&entry.giveaway.id()).unwrap_or_default();
            validate_entry(&entry)?;
            state.insert(entry);
            restored += 1;
        }

        if let Some(orphan) = rewards.keys().next() {
            let message = format!(
                "The stored rewards reference the missing giveaway #{}.",
                orphan
            );
            return Err(Error::Storage(message));
        }

        // Ids of deleted giveaways stay taken after a restart.
        state.reserve_ids(storage.last_giveaway_id()?);

        info!(giveaways = restored, "giveaways restored from the storage");
        Ok(GiveawayManager::from_state(state, storage, default_policy))
    }

    fn from_state(
        state: Arc<BotState>,
        storage: Arc<dyn GiveawayStorage>,
        default_policy: RollPolicy,
    ) -> Self {
        GiveawayManager {
            registry: Arc::new(GiveawayRegistry::new(
                state.clone(),
                storage.clone(),
                default_policy,
            )),
            inventory: Arc::new(RewardInventory::new(state.clone(), storage.clone())),
            allocator: Arc::new(RollAllocator::new(state.clone(), storage)),
            state,
        }
    }

    pub fn registry(&self) -> &GiveawayRegistry {
        &self.registry
    }

    pub fn inventory(&self) -> &RewardInventory {
        &self.inventory
    }

    pub fn allocator(&self) -> &RollAllocator {
        &self.allocator
    }

    pub fn state(&self) -> &BotState {
        &self.state
    }
}

// Rejects stored giveaways that couldn't have been produced by the engine.
fn validate_entry(entry: &GiveawayEntry) -> Result<()> {
    let giveaway = &entry.giveaway;
    let corrupted = |reason: String| {
        let message = format!("The stored giveaway #{} is corrupted: {}.", giveaway.id(), reason);
        Err(Error::Storage(message))
    };

    let mut user_ids = HashSet::new();
    for participant in giveaway.participants() {
        if !user_ids.insert(participant.get_user_id()) {
            return corrupted(format!(
                "user {} has joined more than once",
                participant.get_user_id()
            ));
        }
    }

    let mut pending_holders = HashSet::new();
    for reward in entry.rewards.iter() {
        match (reward.object_state(), reward.holder()) {
            (ObjectState::Pending, _) if giveaway.is_finished() => {
                return corrupted(format!("the reward {} is pending after finish", reward.id()));
            }
            (ObjectState::Pending, None) => {
                return corrupted(format!("the pending reward {} has no holder", reward.id()));
            }
            (ObjectState::Pending, Some(holder)) => {
                if !giveaway.has_participant(holder) {
                    return corrupted(format!(
                        "the reward {} is held by user {} who hasn't joined",
                        reward.id(),
                        holder.get_user_id()
                    ));
                }
                if !pending_holders.insert(holder.get_user_id()) {
                    return corrupted(format!(
                        "user {} holds more than one pending reward",
                        holder.get_user_id()
                    ));
                }
            }
            (ObjectState::Unused, Some(_)) => {
                return corrupted(format!("the unused reward {} has a holder", reward.id()));
            }
            _ => {}
        }
    }

    Ok(())
}
