pub mod allocator;
pub mod inventory;
pub mod manager;
pub mod models;
pub mod registry;
pub mod strategies;
pub mod util;

pub use crate::giveaway::allocator::RollAllocator;
pub use crate::giveaway::inventory::RewardInventory;
pub use crate::giveaway::manager::GiveawayManager;
pub use crate::giveaway::registry::GiveawayRegistry;
