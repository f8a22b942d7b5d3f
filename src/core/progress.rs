use serde::Serialize;

use crate::core::ConversionOutcome;

/// Notification emitted before an item starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchProgress {
    /// 1-based position of the item about to be processed
    pub index: usize,
    /// Number of accepted items in the batch
    pub total: usize,
    /// Display name of the item about to be processed
    pub current_name: String,
}

impl BatchProgress {
    pub fn new(index: usize, total: usize, current_name: &str) -> Self {
        Self {
            index,
            total,
            current_name: current_name.to_string(),
        }
    }

    /// Share of items finished before this one, 0-100.
    pub fn percentage(&self) -> usize {
        if self.total > 0 {
            (self.index.saturating_sub(1) * 100) / self.total
        } else {
            0
        }
    }
}

/// One element of the incremental event stream for a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum BatchEvent {
    /// An item is about to start
    Progress(BatchProgress),
    /// An item reached a terminal state
    Completed(ConversionOutcome),
    /// A newer batch took over; no further events follow
    Superseded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_counts_finished_items() {
        assert_eq!(BatchProgress::new(1, 4, "a").percentage(), 0);
        assert_eq!(BatchProgress::new(3, 4, "c").percentage(), 50);
        assert_eq!(BatchProgress::new(1, 0, "x").percentage(), 0);
    }
}
