pub mod commands;
pub mod config;
pub mod console;
pub mod db;
pub mod error;
pub mod giveaway;
pub mod state;
pub mod storage;

pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::giveaway::GiveawayManager;
