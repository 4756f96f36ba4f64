use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/**
    Cooperative cancellation flag shared with the playback thread.

    Checked before every packet read, so a cancelled loop stops after
    finishing the packet it is currently working on.
*/
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
