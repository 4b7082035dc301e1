use std::collections::HashSet;

/// One classification, fixed once recorded.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishRecord {
    pub id: String,
    pub name: String,
    /// Race clock in seconds when the classification was processed.
    pub finish_time: f64,
    /// 1-based finishing position, or 0 for out-of-bounds.
    pub rank: u32,
    pub is_out_of_bounds: bool,
}

/// Append-only record of finishes and out-of-bounds exits for one race.
///
/// Each id is recorded at most once across both buckets. Ranks come from
/// `next_rank`, which only moves on a successful finish insert.
#[derive(Debug)]
pub struct RankingLedger {
    finished: Vec<FinishRecord>,
    out_of_bounds: Vec<FinishRecord>,
    seen: HashSet<String>,
    next_rank: u32,
}

impl Default for RankingLedger {
    fn default() -> Self {
        Self {
            finished: Vec::new(),
            out_of_bounds: Vec::new(),
            seen: HashSet::new(),
            next_rank: 1,
        }
    }
}

impl RankingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finish. Returns the new record, or `None` if `id` was
    /// already classified.
    pub fn record_finish(
        &mut self,
        id: &str,
        name: &str,
        finish_time: f64,
    ) -> Option<&FinishRecord> {
        if !self.seen.insert(id.to_string()) {
            return None;
        }
        let rank = self.next_rank;
        self.next_rank += 1;
        self.finished.push(FinishRecord {
            id: id.to_string(),
            name: name.to_string(),
            finish_time,
            rank,
            is_out_of_bounds: false,
        });
        self.finished.last()
    }

    /// Record an out-of-bounds exit. Same idempotence as [`Self::record_finish`].
    pub fn record_out_of_bounds(
        &mut self,
        id: &str,
        name: &str,
        finish_time: f64,
    ) -> Option<&FinishRecord> {
        if !self.seen.insert(id.to_string()) {
            return None;
        }
        self.out_of_bounds.push(FinishRecord {
            id: id.to_string(),
            name: name.to_string(),
            finish_time,
            rank: 0,
            is_out_of_bounds: true,
        });
        self.out_of_bounds.last()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn finisher_count(&self) -> usize {
        self.finished.len()
    }

    pub fn len(&self) -> usize {
        self.finished.len() + self.out_of_bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Finishers in rank order, then out-of-bounds players in arrival order.
    pub fn list(&self) -> Vec<FinishRecord> {
        self.finished
            .iter()
            .chain(self.out_of_bounds.iter())
            .cloned()
            .collect()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
