/*!
    Stream descriptors.
*/

use crate::{CodecId, MediaKind, PixelFormat, Rational};

/**
    Video-only attributes of a stream.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoParams {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Native pixel layout, if it is one we know by name.
    pub pixel_format: Option<PixelFormat>,
    /// Average frame rate, if the container declares one.
    pub frame_rate: Option<Rational>,
}

/**
    Description of one elementary stream in a container.

    Immutable once discovered. `index` is the container's stream index and is
    stable for the lifetime of the container.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamDescriptor {
    pub index: usize,
    pub kind: MediaKind,
    pub codec: CodecId,
    pub time_base: Rational,
    /// Present for video streams only.
    pub video: Option<VideoParams>,
}

impl StreamDescriptor {
    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }

    pub fn is_audio(&self) -> bool {
        self.kind == MediaKind::Audio
    }

    /**
        Returns `(width, height)` for video streams.
    */
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.video.as_ref().map(|v| (v.width, v.height))
    }
}
