//! Read markers for notifications
//!
//! Stored at: <state_dir>/notifications_read.json

use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::warn;

use fleetdesk_types::Result;

/// Persistent set of notification ids the user has acknowledged
pub struct ReadStateStore {
    store_path: PathBuf,
    read: HashMap<String, DateTime<Utc>>,
}

impl ReadStateStore {
    /// Create or load a read-state store
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join("notifications_read.json");

        let read = if store_path.exists() {
            let file = File::open(&store_path)?;
            let reader = BufReader::new(file);
            match serde_json::from_reader(reader) {
                Ok(read) => read,
                Err(e) => {
                    warn!(
                        "Ignoring unreadable read-state file {}: {}",
                        store_path.display(),
                        e
                    );
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        Ok(Self { store_path, read })
    }

    fn save(&self) -> Result<()> {
        let file = File::create(&self.store_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.read)?;
        Ok(())
    }

    pub fn is_read(&self, id: &str) -> bool {
        self.read.contains_key(id)
    }

    /// Mark notifications read. Returns how many were newly marked.
    pub fn mark_read<'a, I>(&mut self, ids: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let now = Utc::now();
        let mut added = 0;
        for id in ids {
            if !self.read.contains_key(id) {
                self.read.insert(id.to_string(), now);
                added += 1;
            }
        }
        if added > 0 {
            self.save()?;
        }
        Ok(added)
    }

    /// Drop markers for notifications that no longer exist
    pub fn retain_only(&mut self, active_ids: &HashSet<String>) -> Result<usize> {
        let before = self.read.len();
        self.read.retain(|id, _| active_ids.contains(id));
        let removed = before - self.read.len();
        if removed > 0 {
            self.save()?;
        }
        Ok(removed)
    }

    pub fn count(&self) -> usize {
        self.read.len()
    }
}
