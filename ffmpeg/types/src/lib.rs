/*!
    Shared types for the decode pipeline.

    This crate defines the vocabulary that crosses crate boundaries: stream
    descriptors, packets, pixel layouts and the error type. It has no dependency
    on FFmpeg, so the pipeline core can be exercised without the native libraries.
*/

mod error;
mod format;
mod packet;
mod stream;
mod time;

pub use error::{Error, Result};
pub use format::{CodecId, MediaKind, PixelFormat};
pub use packet::Packet;
pub use stream::{StreamDescriptor, VideoParams};
pub use time::{Pts, Rational};
