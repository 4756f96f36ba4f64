/*!
    The converted-frame buffer shared between the playback thread and readers.

    Two buffers of identical size exist for the lifetime of a session. The
    playback thread converts into the back buffer it owns, then swaps it
    with the front buffer under a short write lock. Readers only ever see a
    whole frame, and neither buffer is reallocated after load.
*/

use std::mem;
use std::ops::Deref;

use ffmpeg_types::{PixelFormat, Pts};
use parking_lot::{RwLock, RwLockReadGuard};

#[derive(Debug)]
struct Published {
    data: Vec<u8>,
    sequence: u64,
    pts: Option<Pts>,
}

/**
    Latest converted frame of a session, at fixed dimensions and layout.
*/
#[derive(Debug)]
pub struct FrameSlot {
    width: u32,
    height: u32,
    format: PixelFormat,
    front: RwLock<Published>,
}

impl FrameSlot {
    pub(crate) fn new(width: u32, height: u32, format: PixelFormat, frame_size: usize) -> Self {
        Self {
            width,
            height,
            format,
            front: RwLock::new(Published {
                data: vec![0; frame_size],
                sequence: 0,
                pts: None,
            }),
        }
    }

    /**
        Allocate a back buffer matching this slot.
    */
    pub(crate) fn back_buffer(&self) -> Vec<u8> {
        vec![0; self.frame_size()]
    }

    /**
        Make `back` the readable frame. `back` receives the previous front buffer.

        Returns the new sequence number.
    */
    pub(crate) fn publish(&self, back: &mut Vec<u8>, pts: Option<Pts>) -> u64 {
        let mut front = self.front.write();
        debug_assert_eq!(front.data.len(), back.len());
        mem::swap(&mut front.data, back);
        front.sequence += 1;
        front.pts = pts;
        front.sequence
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    /// Bytes in one frame: `width * height * bytes_per_pixel`.
    pub fn frame_size(&self) -> usize {
        self.front.read().data.len()
    }

    /// Number of frames published so far. Zero until the first frame.
    pub fn sequence(&self) -> u64 {
        self.front.read().sequence
    }

    /**
        Borrow the latest frame.

        Playback blocks on its next publish while the guard is held, so keep
        it short or use [`copy_to_vec`](Self::copy_to_vec).
    */
    pub fn read(&self) -> FrameRef<'_> {
        FrameRef {
            guard: self.front.read(),
        }
    }

    pub fn copy_to_vec(&self) -> Vec<u8> {
        self.front.read().data.clone()
    }
}

/**
    Read guard over the published frame.
*/
pub struct FrameRef<'a> {
    guard: RwLockReadGuard<'a, Published>,
}

impl FrameRef<'_> {
    pub fn data(&self) -> &[u8] {
        &self.guard.data
    }

    pub fn sequence(&self) -> u64 {
        self.guard.sequence
    }

    pub fn pts(&self) -> Option<Pts> {
        self.guard.pts
    }
}

impl Deref for FrameRef<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.guard.data
    }
}
