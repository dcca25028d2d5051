use crate::error::{Error, Result};
use crate::giveaway::models::ObjectState;
use crate::giveaway::strategies::base::{GiveawayStrategy, RollOptions};

#[derive(Debug, Default)]
pub struct ManualSelectStrategy;

impl ManualSelectStrategy {
    pub fn new() -> Self {
        ManualSelectStrategy {}
    }
}

impl GiveawayStrategy for ManualSelectStrategy {
    fn roll(&self, options: &RollOptions) -> Result<usize> {
        let number = match options.reward_number() {
            Some(number) => number,
            None => {
                let message = "This giveaway requires the reward number to roll.".to_string();
                return Err(Error::InvalidState(message));
            }
        };

        let rewards = options.rewards();
        match number > 0 && number < rewards.len() + 1 {
            true => {
                if rewards[number - 1].object_state() != ObjectState::Unused {
                    let message = "This reward has already been taken by someone.".to_string();
                    return Err(Error::InvalidState(message));
                }

                Ok(number - 1)
            }
            false => {
                let message = "The requested reward was not found.".to_string();
                Err(Error::NotFound(message))
            }
        }
    }
}
