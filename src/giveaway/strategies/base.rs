use crate::error::Result;
use crate::giveaway::models::{Participant, Reward};

pub struct RollOptions<'a> {
    user: &'a Participant,
    rewards: &'a [Reward],
    reward_number: Option<usize>,
}

impl<'a> RollOptions<'a> {
    pub fn new(user: &'a Participant, rewards: &'a [Reward], reward_number: Option<usize>) -> Self {
        RollOptions {
            user,
            rewards,
            reward_number,
        }
    }

    // Returns the initiator of the roll command.
    pub fn user(&self) -> &'a Participant {
        self.user
    }

    // Returns the rewards of the giveaway in the listed order.
    pub fn rewards(&self) -> &'a [Reward] {
        self.rewards
    }

    // Returns the 1-based reward number picked by the user (if any).
    pub fn reward_number(&self) -> Option<usize> {
        self.reward_number
    }
}

pub trait GiveawayStrategy: Send + Sync {
    // Returns the position of the selected reward in `options.rewards()`.
    // The selected reward is always `Unused`.
    fn roll(&self, options: &RollOptions) -> Result<usize>;
}
