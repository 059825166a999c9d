//! Transfer executor adapters.

use crate::domain::{HtlcError, TransferInstruction};
use crate::ports::TransferExecutor;
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

/// Executor that records every instruction instead of moving value.
///
/// Useful for hosts that settle custody out of band and for tests. A failure
/// can be scheduled with [`RecordingTransferExecutor::fail_next`].
#[derive(Debug, Default)]
pub struct RecordingTransferExecutor {
    executed: Mutex<Vec<TransferInstruction>>,
    pending_failure: Mutex<Option<String>>,
}

impl RecordingTransferExecutor {
    /// Empty executor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Instructions executed so far, in order.
    pub fn executed(&self) -> Vec<TransferInstruction> {
        self.executed.lock().clone()
    }

    /// Make the next `execute` call fail with `reason`.
    pub fn fail_next(&self, reason: impl Into<String>) {
        *self.pending_failure.lock() = Some(reason.into());
    }
}

#[async_trait]
impl TransferExecutor for RecordingTransferExecutor {
    async fn execute(&self, instruction: &TransferInstruction) -> Result<(), HtlcError> {
        if let Some(reason) = self.pending_failure.lock().take() {
            return Err(HtlcError::TransferFailed {
                instruction: instruction.clone(),
                reason,
            });
        }
        debug!(swap_id = %instruction.swap_id, to = %instruction.to, "[htlc] transfer recorded");
        self.executed.lock().push(instruction.clone());
        Ok(())
    }
}
