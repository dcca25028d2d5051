pub mod base;
pub mod manual;
pub mod random;

pub use crate::giveaway::strategies::base::{GiveawayStrategy, RollOptions};
pub use crate::giveaway::strategies::manual::ManualSelectStrategy;
pub use crate::giveaway::strategies::random::RandomSelectStrategy;
