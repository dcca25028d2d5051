use rand::seq::SliceRandom;

use crate::error::{Error, Result};
use crate::giveaway::models::ObjectState;
use crate::giveaway::strategies::base::{GiveawayStrategy, RollOptions};

// Picks uniformly among the rewards that are still unused.
#[derive(Debug, Default)]
pub struct RandomSelectStrategy;

impl RandomSelectStrategy {
    pub fn new() -> Self {
        RandomSelectStrategy {}
    }
}

impl GiveawayStrategy for RandomSelectStrategy {
    fn roll(&self, options: &RollOptions) -> Result<usize> {
        let candidates = options
            .rewards()
            .iter()
            .enumerate()
            .filter(|(_, reward)| reward.object_state() == ObjectState::Unused)
            .map(|(position, _)| position)
            .collect::<Vec<usize>>();

        match candidates.choose(&mut rand::thread_rng()) {
            Some(position) => Ok(*position),
            None => {
                let message = "All possible rewards have been handed out.".to_string();
                Err(Error::Exhausted(message))
            }
        }
    }
}
