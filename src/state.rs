use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use orx_concurrent_vec::ConcurrentVec;

use crate::error::{Error, Result};
use crate::giveaway::models::{Giveaway, GiveawayId, Reward, RewardId, RollPolicy};

// A giveaway together with the rewards it owns. Always accessed under
// its own lock, so the rewards can't change while a roll is in progress.
#[derive(Debug, Clone)]
pub struct GiveawayEntry {
    pub giveaway: Giveaway,
    pub rewards: Vec<Reward>,
    // Set under the lock by delete. Callers that were waiting for the lock
    // must treat the giveaway as gone.
    pub deleted: bool,
}

impl GiveawayEntry {
    pub fn new(giveaway: Giveaway) -> Self {
        GiveawayEntry {
            giveaway,
            rewards: Vec::new(),
            deleted: false,
        }
    }

    pub fn reward_position(&self, reward_id: RewardId) -> Option<usize> {
        self.rewards.iter().position(|reward| reward.id() == reward_id)
    }
}

pub type GiveawayCell = Arc<Mutex<GiveawayEntry>>;

#[non_exhaustive]
pub struct BotState {
    giveaways: DashMap<GiveawayId, GiveawayCell>,
    // Creation order of the giveaways. Deleted ids stay here and are skipped on reads.
    order: ConcurrentVec<GiveawayId>,
    // Which giveaway owns the reward.
    reward_index: DashMap<RewardId, GiveawayId>,
    next_id: AtomicU64,
}

impl BotState {
    pub fn new() -> Self {
        BotState {
            giveaways: DashMap::new(),
            order: ConcurrentVec::new(),
            reward_index: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    // Builds a giveaway with the next free id. The giveaway isn't visible
    // to others until it's inserted.
    pub fn new_giveaway(&self, description: &str, roll_policy: RollPolicy) -> Giveaway {
        let id = GiveawayId(self.next_id.fetch_add(1, Ordering::SeqCst));
        Giveaway::new(id, description, roll_policy)
    }

    pub fn insert(&self, entry: GiveawayEntry) {
        let id = entry.giveaway.id();
        for reward in entry.rewards.iter() {
            self.reward_index.insert(reward.id(), id);
        }

        // Restored ids must never be handed out again.
        self.reserve_ids(id.0);
        self.giveaways.insert(id, Arc::new(Mutex::new(entry)));
        self.order.push(id);
    }

    pub fn remove(&self, id: GiveawayId) -> Option<GiveawayCell> {
        let (_, cell) = self.giveaways.remove(&id)?;
        self.reward_index.retain(|_, owner| *owner != id);
        Some(cell)
    }

    pub fn get(&self, id: GiveawayId) -> Result<GiveawayCell> {
        // The map guard is dropped before the caller takes the giveaway lock.
        match self.giveaways.get(&id) {
            Some(cell) => Ok(cell.value().clone()),
            None => Err(Error::NotFound(format!(
                "The requested giveaway #{} was not found.",
                id
            ))),
        }
    }

    // Returns all giveaways in the order they were created. Ids are handed out
    // before the push, so the log is sorted to keep concurrent creates in id order.
    pub fn get_giveaways(&self) -> Vec<GiveawayCell> {
        let mut ids = self.order.clone_to_vec();
        ids.sort_unstable();
        ids.into_iter()
            .filter_map(|id| self.giveaways.get(&id).map(|cell| cell.value().clone()))
            .collect()
    }

    // Makes sure ids up to `last_id` are never handed out again.
    pub fn reserve_ids(&self, last_id: u64) {
        self.next_id.fetch_max(last_id + 1, Ordering::SeqCst);
    }

    pub fn locate_reward(&self, reward_id: RewardId) -> Result<GiveawayId> {
        match self.reward_index.get(&reward_id) {
            Some(owner) => Ok(*owner.value()),
            None => Err(Error::NotFound(format!(
                "The requested reward {} was not found.",
                reward_id
            ))),
        }
    }

    pub fn index_reward(&self, reward_id: RewardId, owner: GiveawayId) {
        self.reward_index.insert(reward_id, owner);
    }

    pub fn unindex_reward(&self, reward_id: RewardId) {
        self.reward_index.remove(&reward_id);
    }

    // Runs the closure with the giveaway locked. Operations on other
    // giveaways are not blocked.
    pub fn with_giveaway<T, F>(&self, id: GiveawayId, func: F) -> Result<T>
    where
        F: FnOnce(&mut GiveawayEntry) -> Result<T>,
    {
        let cell = self.get(id)?;
        let mut guard = cell.lock()?;
        if guard.deleted {
            return Err(Error::NotFound(format!(
                "The requested giveaway #{} was not found.",
                id
            )));
        }
        func(&mut guard)
    }
}

impl fmt::Debug for BotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotState")
            .field("giveaways", &self.giveaways.len())
            .field("rewards", &self.reward_index.len())
            .field("next_id", &self.next_id.load(Ordering::SeqCst))
            .finish()
    }
}

impl Default for BotState {
    fn default() -> Self {
        BotState::new()
    }
}
