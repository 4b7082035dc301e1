use std::collections::HashMap;

use crate::vec3::Vec3;

/// Most recent observed position of one player.
#[derive(Debug, Clone, PartialEq)]
pub struct LivePositionRecord {
    pub id: String,
    pub current_position: Vec3,
}

/// Latest position per registered player, fed by the physics adapter.
///
/// Records keep registration order so scans over the snapshot are stable.
#[derive(Debug, Default)]
pub struct PositionTracker {
    records: Vec<LivePositionRecord>,
    index: HashMap<String, usize>,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `id`. Registering an id again replaces its record.
    pub fn register(&mut self, id: &str) {
        let record = LivePositionRecord {
            id: id.to_string(),
            current_position: Vec3::ZERO,
        };
        match self.index.get(id) {
            Some(&idx) => self.records[idx] = record,
            None => {
                self.index.insert(id.to_string(), self.records.len());
                self.records.push(record);
            }
        }
    }

    /// Overwrite the position of a registered player. Unknown ids are ignored.
    pub fn on_position_update(&mut self, id: &str, position: Vec3) {
        if let Some(&idx) = self.index.get(id) {
            self.records[idx].current_position = position;
        }
    }

    pub fn get(&self, id: &str) -> Option<Vec3> {
        self.index
            .get(id)
            .map(|&idx| self.records[idx].current_position)
    }

    pub fn snapshot(&self) -> &[LivePositionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.index.clear();
    }
}
