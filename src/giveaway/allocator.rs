use std::convert::TryFrom;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::db::models::GiveawayObjectRow;
use crate::error::{Error, Result};
use crate::giveaway::inventory::reward_not_found;
use crate::giveaway::models::{
    GiveawayId, ObjectState, Participant, Reward, RewardId, RollPolicy,
};
use crate::giveaway::strategies::{
    GiveawayStrategy, ManualSelectStrategy, RandomSelectStrategy, RollOptions,
};
use crate::state::{BotState, GiveawayEntry};
use crate::storage::GiveawayStorage;

// Hands out the rewards to the participants and tracks the confirmations.
pub struct RollAllocator {
    state: Arc<BotState>,
    storage: Arc<dyn GiveawayStorage>,
    random: RandomSelectStrategy,
    manual: ManualSelectStrategy,
}

impl RollAllocator {
    pub fn new(state: Arc<BotState>, storage: Arc<dyn GiveawayStorage>) -> Self {
        RollAllocator {
            state,
            storage,
            random: RandomSelectStrategy::new(),
            manual: ManualSelectStrategy::new(),
        }
    }

    // Moves one unused reward to the pending state on behalf of the participant,
    // using the roll policy of the giveaway.
    pub fn roll(&self, giveaway_id: GiveawayId, participant: &Participant) -> Result<Reward> {
        self.roll_reward(giveaway_id, participant, None)
    }

    // Same as `roll`, but the participant picks the reward by its 1-based number.
    pub fn roll_numbered(
        &self,
        giveaway_id: GiveawayId,
        participant: &Participant,
        reward_number: usize,
    ) -> Result<Reward> {
        self.roll_reward(giveaway_id, participant, Some(reward_number))
    }

    // Confirms that the reward was received and has been activated.
    pub fn confirm(&self, reward_id: RewardId) -> Result<Reward> {
        self.resolve(reward_id, ObjectState::Activated)
    }

    // Returns the reward back to the pool.
    pub fn deny(&self, reward_id: RewardId) -> Result<Reward> {
        self.resolve(reward_id, ObjectState::Unused)
    }

    #[instrument(skip(self))]
    fn roll_reward(
        &self,
        giveaway_id: GiveawayId,
        participant: &Participant,
        reward_number: Option<usize>,
    ) -> Result<Reward> {
        // Selection and marking happen under the giveaway lock, so two
        // concurrent rolls never get the same reward.
        self.state.with_giveaway(giveaway_id, |entry| {
            self.check_giveaway_is_active(entry)?;
            self.check_participant_joined(entry, participant)?;
            self.check_user_has_pending_rewards(entry, participant)?;
            self.check_no_unused_rewards(entry)?;

            let strategy = self.strategy(entry.giveaway.roll_policy(), reward_number);
            let options = RollOptions::new(participant, &entry.rewards, reward_number);
            let position = strategy.roll(&options)?;

            let mut reward = entry.rewards[position].clone();
            reward.set_object_state(ObjectState::Pending);
            reward.set_holder(Some(participant.clone()));
            self.storage.save_object(&GiveawayObjectRow::try_from(&reward)?)?;
            entry.rewards[position] = reward.clone();

            info!(
                giveaway = %giveaway_id,
                reward = %reward.id(),
                user_id = participant.get_user_id(),
                "reward rolled"
            );
            Ok(reward)
        })
    }

    #[instrument(skip(self))]
    fn resolve(&self, reward_id: RewardId, next: ObjectState) -> Result<Reward> {
        let owner = self.state.locate_reward(reward_id)?;
        self.state.with_giveaway(owner, |entry| {
            let position = entry
                .reward_position(reward_id)
                .ok_or_else(|| reward_not_found(reward_id))?;

            let current = entry.rewards[position].object_state();
            if !current.can_transition_to(next) {
                let message = match current {
                    ObjectState::Activated => "The reward has been activated already.".to_string(),
                    _ => "The reward must be rolled before confirming or returning.".to_string(),
                };
                return Err(Error::InvalidState(message));
            }

            let mut reward = entry.rewards[position].clone();
            reward.set_object_state(next);
            if next == ObjectState::Unused {
                reward.set_holder(None);
            }
            self.storage.save_object(&GiveawayObjectRow::try_from(&reward)?)?;
            entry.rewards[position] = reward.clone();

            info!(giveaway = %owner, reward = %reward_id, state = next.as_str(), "reward resolved");
            Ok(reward)
        })
    }

    fn strategy(&self, policy: RollPolicy, reward_number: Option<usize>) -> &dyn GiveawayStrategy {
        match (policy, reward_number) {
            (_, Some(_)) | (RollPolicy::Manual, None) => &self.manual,
            (RollPolicy::Random, None) => &self.random,
        }
    }

    fn check_giveaway_is_active(&self, entry: &GiveawayEntry) -> Result<()> {
        if !entry.giveaway.is_started() {
            let message =
                "The giveaway hasn't started yet or has been suspended by the owner.".to_string();
            return Err(Error::InvalidTransition(message));
        }

        Ok(())
    }

    fn check_participant_joined(&self, entry: &GiveawayEntry, participant: &Participant) -> Result<()> {
        if !entry.giveaway.has_participant(participant) {
            let message = format!(
                "{} must join the giveaway #{} before rolling.",
                participant.get_username(),
                entry.giveaway.id()
            );
            return Err(Error::NotJoined(message));
        }

        Ok(())
    }

    fn check_user_has_pending_rewards(
        &self,
        entry: &GiveawayEntry,
        participant: &Participant,
    ) -> Result<()> {
        if entry.rewards.iter().any(|reward| reward.is_pending_for(participant)) {
            let message = "It's not possible to have more than one reward in \
                the pending state. Please, confirm or deny the previous reward first."
                .to_string();
            return Err(Error::PendingResolutionRequired(message));
        }

        Ok(())
    }

    fn check_no_unused_rewards(&self, entry: &GiveawayEntry) -> Result<()> {
        let no_unused_rewards = !entry
            .rewards
            .iter()
            .any(|reward| reward.object_state() == ObjectState::Unused);

        if no_unused_rewards {
            let message = "All possible rewards have been handed out.".to_string();
            return Err(Error::Exhausted(message));
        }

        Ok(())
    }
}
