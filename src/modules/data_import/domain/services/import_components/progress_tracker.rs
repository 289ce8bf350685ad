use crate::log_debug;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use super::types::ImportProgress;

/// Manages progress reporting and batching for import operations
#[derive(Clone, Default)]
pub struct ProgressTracker {
    sender: Option<UnboundedSender<ImportProgress>>,
    batch_config: ProgressBatchConfig,
}

#[derive(Clone)]
struct ProgressBatchConfig {
    batch_size: usize,
}

impl Default for ProgressBatchConfig {
    fn default() -> Self {
        Self { batch_size: 1 }
    }
}

impl ProgressTracker {
    pub fn new(sender: Option<UnboundedSender<ImportProgress>>) -> Self {
        Self {
            sender,
            batch_config: ProgressBatchConfig::default(),
        }
    }

    /// Tracker wired to a fresh channel; the receiver gets every emitted event
    pub fn channel() -> (Self, UnboundedReceiver<ImportProgress>) {
        let (tx, rx) = unbounded_channel();
        (Self::new(Some(tx)), rx)
    }

    /// Emit roughly 50 events per batch instead of one per row
    pub fn with_batch_config(mut self, total_items: usize) -> Self {
        self.batch_config.batch_size = std::cmp::max(1, total_items / 50);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }

    /// The final row always emits
    pub fn should_emit(&self, processed: usize, total: usize) -> bool {
        processed == total || processed % self.batch_config.batch_size == 0
    }

    pub fn emit_import_progress(&self, progress: ImportProgress) -> bool {
        if let Some(ref sender) = self.sender {
            match sender.send(progress) {
                Ok(_) => true,
                Err(_) => {
                    // Subscriber went away; the import itself carries on.
                    log_debug!("Import progress receiver dropped");
                    false
                }
            }
        } else {
            false
        }
    }
}
