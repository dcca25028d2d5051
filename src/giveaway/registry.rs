use std::convert::TryFrom;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::db::models::GiveawayRow;
use crate::error::{Error, Result};
use crate::giveaway::models::{Giveaway, GiveawayId, GiveawayState, Participant, RollPolicy};
use crate::state::{BotState, GiveawayEntry};
use crate::storage::GiveawayStorage;

// Authoritative store of the giveaways and their lifecycle.
pub struct GiveawayRegistry {
    state: Arc<BotState>,
    storage: Arc<dyn GiveawayStorage>,
    default_policy: RollPolicy,
}

impl GiveawayRegistry {
    pub fn new(
        state: Arc<BotState>,
        storage: Arc<dyn GiveawayStorage>,
        default_policy: RollPolicy,
    ) -> Self {
        GiveawayRegistry {
            state,
            storage,
            default_policy,
        }
    }

    // Creates a giveaway with the default roll policy.
    pub fn create(&self, description: &str) -> Result<Giveaway> {
        self.create_with_policy(description, self.default_policy)
    }

    #[instrument(skip(self))]
    pub fn create_with_policy(&self, description: &str, roll_policy: RollPolicy) -> Result<Giveaway> {
        let giveaway = self.state.new_giveaway(description, roll_policy);
        self.storage.save_giveaway(&GiveawayRow::try_from(&giveaway)?)?;
        self.state.insert(GiveawayEntry::new(giveaway.clone()));

        info!(giveaway = %giveaway.id(), "giveaway created");
        Ok(giveaway)
    }

    // Returns all giveaways (including finished ones) in creation order.
    pub fn list(&self) -> Result<Vec<Giveaway>> {
        let mut giveaways = Vec::new();
        for cell in self.state.get_giveaways() {
            let entry = cell.lock()?;
            if !entry.deleted {
                giveaways.push(entry.giveaway.clone());
            }
        }
        Ok(giveaways)
    }

    pub fn get(&self, id: GiveawayId) -> Result<Giveaway> {
        self.state.with_giveaway(id, |entry| Ok(entry.giveaway.clone()))
    }

    // Opens the giveaway for joins and rolls. Also resumes a deactivated giveaway.
    pub fn start(&self, id: GiveawayId) -> Result<Giveaway> {
        self.transition(id, GiveawayState::Started)
    }

    // Suspends joins and rolls without losing anything.
    pub fn deactivate(&self, id: GiveawayId) -> Result<Giveaway> {
        self.transition(id, GiveawayState::Deactivated)
    }

    // Closes the giveaway for good. Every rolled reward must be resolved first.
    pub fn finish(&self, id: GiveawayId) -> Result<Giveaway> {
        self.transition(id, GiveawayState::Finished)
    }

    #[instrument(skip(self))]
    pub fn join(&self, id: GiveawayId, participant: &Participant) -> Result<Giveaway> {
        self.state.with_giveaway(id, |entry| {
            if !entry.giveaway.is_started() {
                let message =
                    "The giveaway hasn't started yet or has been suspended by the owner.".to_string();
                return Err(Error::InvalidTransition(message));
            }

            if entry.giveaway.has_participant(participant) {
                let message = format!(
                    "{} has already joined the giveaway #{}.",
                    participant.get_username(),
                    id
                );
                return Err(Error::DuplicateParticipant(message));
            }

            let mut updated = entry.giveaway.clone();
            updated.add_participant(participant.clone());
            self.commit(entry, updated)
        })
    }

    #[instrument(skip(self))]
    pub fn describe(&self, id: GiveawayId, description: &str) -> Result<Giveaway> {
        self.state.with_giveaway(id, |entry| {
            if entry.giveaway.is_finished() {
                let message = format!("The giveaway #{} has been finished already.", id);
                return Err(Error::InvalidTransition(message));
            }

            let mut updated = entry.giveaway.clone();
            updated.set_description(description);
            self.commit(entry, updated)
        })
    }

    // Deletes the giveaway with all its rewards.
    #[instrument(skip(self))]
    pub fn delete(&self, id: GiveawayId) -> Result<Giveaway> {
        let deleted = self.state.with_giveaway(id, |entry| {
            if entry.rewards.iter().any(|reward| !reward.object_state().is_terminal()) {
                let message = format!(
                    "The giveaway #{} has rewards waiting for confirmation.",
                    id
                );
                return Err(Error::InvalidTransition(message));
            }

            self.storage.delete_giveaway(id.0)?;
            entry.deleted = true;
            Ok(entry.giveaway.clone())
        })?;

        self.state.remove(id);
        info!(giveaway = %id, "giveaway deleted");
        Ok(deleted)
    }

    #[instrument(skip(self))]
    fn transition(&self, id: GiveawayId, next: GiveawayState) -> Result<Giveaway> {
        self.state.with_giveaway(id, |entry| {
            let current = entry.giveaway.state();
            if !current.can_transition_to(next) {
                let message = format!(
                    "The giveaway #{} can't be moved from {} to {}.",
                    id,
                    current.as_str(),
                    next.as_str()
                );
                return Err(Error::InvalidTransition(message));
            }

            let has_pending = entry
                .rewards
                .iter()
                .any(|reward| !reward.object_state().is_terminal());
            if next == GiveawayState::Finished && has_pending {
                let message = format!(
                    "The giveaway #{} can't be finished while rewards are pending. \
                    Please, confirm or deny them first.",
                    id
                );
                return Err(Error::InvalidTransition(message));
            }

            let mut updated = entry.giveaway.clone();
            updated.set_state(next);
            let giveaway = self.commit(entry, updated)?;
            info!(giveaway = %id, from = current.as_str(), to = next.as_str(), "giveaway state changed");
            Ok(giveaway)
        })
    }

    // Persists the new version of the giveaway and only then replaces the
    // in-memory one.
    fn commit(&self, entry: &mut GiveawayEntry, updated: Giveaway) -> Result<Giveaway> {
        self.storage.save_giveaway(&GiveawayRow::try_from(&updated)?)?;
        entry.giveaway = updated.clone();
        Ok(updated)
    }
}
