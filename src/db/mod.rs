pub mod jsonb;
pub mod models;
pub mod schema;

pub use crate::db::models::{GiveawayObjectRow, GiveawayRow};
