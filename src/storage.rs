use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use uuid::Uuid;

use crate::db::models::{GiveawayObjectRow, GiveawayRow};
use crate::error::{Error, Result};

// Persistence collaborator for the `giveaway` and `giveaway_object` tables.
// Calls are made while the owning giveaway is locked, so every write for one
// giveaway is already serialized by the caller.
pub trait GiveawayStorage: Send + Sync {
    // Inserts or updates the giveaway row.
    fn save_giveaway(&self, row: &GiveawayRow) -> Result<()>;

    // Deletes the giveaway row together with its objects.
    fn delete_giveaway(&self, id: u64) -> Result<()>;

    // Inserts or updates the object row. The owning giveaway row must exist.
    fn save_object(&self, row: &GiveawayObjectRow) -> Result<()>;

    // Saves all rows or none of them.
    fn save_objects(&self, rows: &[GiveawayObjectRow]) -> Result<()> {
        for row in rows {
            self.save_object(row)?;
        }
        Ok(())
    }

    fn delete_object(&self, id: Uuid) -> Result<()>;

    // Returns all giveaway rows ordered by id.
    fn load_giveaways(&self) -> Result<Vec<GiveawayRow>>;

    // Returns all object rows in insertion order.
    fn load_objects(&self) -> Result<Vec<GiveawayObjectRow>>;

    // Returns the highest giveaway id ever saved, deleted ones included.
    // Zero when nothing was saved yet.
    fn last_giveaway_id(&self) -> Result<u64>;
}

#[derive(Debug, Clone)]
struct StoredObject {
    serial: u64,
    row: GiveawayObjectRow,
}

// In-memory tables with the same integrity rules as the relational layout.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    giveaways: DashMap<u64, GiveawayRow>,
    objects: DashMap<Uuid, StoredObject>,
    serial: AtomicU64,
    // Works like the id sequence of the `giveaway` table: deletes don't lower it.
    last_giveaway_id: AtomicU64,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    fn check_foreign_key(&self, row: &GiveawayObjectRow) -> Result<()> {
        if !self.giveaways.contains_key(&row.giveaway_id) {
            let message = format!(
                "The object {} references the missing giveaway #{}.",
                row.id, row.giveaway_id
            );
            return Err(Error::Storage(message));
        }
        Ok(())
    }

    fn upsert_object(&self, row: &GiveawayObjectRow) {
        // Updates keep the original position of the row.
        let serial = match self.objects.get(&row.id) {
            Some(stored) => stored.serial,
            None => self.serial.fetch_add(1, Ordering::SeqCst),
        };
        let stored = StoredObject {
            serial,
            row: row.clone(),
        };
        self.objects.insert(row.id, stored);
    }
}

impl GiveawayStorage for MemoryStorage {
    fn save_giveaway(&self, row: &GiveawayRow) -> Result<()> {
        self.giveaways.insert(row.id, row.clone());
        self.last_giveaway_id.fetch_max(row.id, Ordering::SeqCst);
        Ok(())
    }

    fn delete_giveaway(&self, id: u64) -> Result<()> {
        self.objects.retain(|_, stored| stored.row.giveaway_id != id);
        self.giveaways.remove(&id);
        Ok(())
    }

    fn save_object(&self, row: &GiveawayObjectRow) -> Result<()> {
        self.check_foreign_key(row)?;
        self.upsert_object(row);
        Ok(())
    }

    fn save_objects(&self, rows: &[GiveawayObjectRow]) -> Result<()> {
        for row in rows {
            self.check_foreign_key(row)?;
        }
        for row in rows {
            self.upsert_object(row);
        }
        Ok(())
    }

    fn delete_object(&self, id: Uuid) -> Result<()> {
        self.objects.remove(&id);
        Ok(())
    }

    fn load_giveaways(&self) -> Result<Vec<GiveawayRow>> {
        let mut rows = self
            .giveaways
            .iter()
            .map(|pair| pair.value().clone())
            .collect::<Vec<GiveawayRow>>();
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }

    fn load_objects(&self) -> Result<Vec<GiveawayObjectRow>> {
        let mut stored = self
            .objects
            .iter()
            .map(|pair| pair.value().clone())
            .collect::<Vec<StoredObject>>();
        stored.sort_by_key(|object| object.serial);
        Ok(stored.into_iter().map(|object| object.row).collect())
    }

    fn last_giveaway_id(&self) -> Result<u64> {
        Ok(self.last_giveaway_id.load(Ordering::SeqCst))
    }
}
