use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

use parking_lot::Mutex;

/**
    Lifecycle of a session's playback loop.

    `Idle -> Running -> {Exhausted | Failed | Cancelled}`. The three
    terminal states are all "stopped"; they differ only in why.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PlaybackState {
    Idle = 0,
    Running = 1,
    /// The source ran out of packets and every buffered frame was delivered.
    Exhausted = 2,
    /// A packet read failed.
    Failed = 3,
    /// Playback was stopped by the owner.
    Cancelled = 4,
}

impl PlaybackState {
    pub fn is_stopped(self) -> bool {
        matches!(self, Self::Exhausted | Self::Failed | Self::Cancelled)
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Running,
            2 => Self::Exhausted,
            3 => Self::Failed,
            4 => Self::Cancelled,
            _ => Self::Idle,
        }
    }
}

/**
    Counters and state readable from any thread while playback runs.
*/
#[derive(Debug)]
pub struct PlaybackStatus {
    state: AtomicU8,
    packets_read: AtomicU64,
    frames_delivered: AtomicU64,
    decode_faults: AtomicU64,
    last_error: Mutex<Option<String>>,
}

impl Default for PlaybackStatus {
    fn default() -> Self {
        Self {
            state: AtomicU8::new(PlaybackState::Idle as u8),
            packets_read: AtomicU64::new(0),
            frames_delivered: AtomicU64::new(0),
            decode_faults: AtomicU64::new(0),
            last_error: Mutex::new(None),
        }
    }
}

impl PlaybackStatus {
    pub fn state(&self) -> PlaybackState {
        PlaybackState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn set_state(&self, state: PlaybackState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /**
        Move `from -> to` only if the current state is `from`.
    */
    pub(crate) fn transition(&self, from: PlaybackState, to: PlaybackState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn packets_read(&self) -> u64 {
        self.packets_read.load(Ordering::Relaxed)
    }

    pub fn frames_delivered(&self) -> u64 {
        self.frames_delivered.load(Ordering::Acquire)
    }

    /// Packets or frames skipped because they failed to decode or convert.
    pub fn decode_faults(&self) -> u64 {
        self.decode_faults.load(Ordering::Relaxed)
    }

    /// Message of the read error that ended playback, if any.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    pub(crate) fn record_packet(&self) {
        self.packets_read.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_frame(&self) {
        self.frames_delivered.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn record_fault(&self) {
        self.decode_faults.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_error(&self, message: String) {
        *self.last_error.lock() = Some(message);
    }
}
