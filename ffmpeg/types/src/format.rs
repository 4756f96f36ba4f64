/*!
    Media kind, codec and pixel layout types.
*/

use std::fmt;

/**
    Kind of an elementary stream.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Video,
    Audio,
    /// Subtitles, data, attachments and anything else.
    Other,
}

/**
    Codec of an elementary stream.

    Only codecs commonly found in desktop containers get their own variant,
    everything else is carried by name.
*/
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CodecId {
    H264,
    H265,
    Vp8,
    Vp9,
    Av1,
    Mpeg4,
    Mpeg2Video,
    Aac,
    Mp3,
    Opus,
    Vorbis,
    Flac,
    Ac3,
    Pcm,
    Other(String),
}

impl CodecId {
    /**
        Short codec name, as FFmpeg spells it.
    */
    pub fn name(&self) -> &str {
        match self {
            Self::H264 => "h264",
            Self::H265 => "hevc",
            Self::Vp8 => "vp8",
            Self::Vp9 => "vp9",
            Self::Av1 => "av1",
            Self::Mpeg4 => "mpeg4",
            Self::Mpeg2Video => "mpeg2video",
            Self::Aac => "aac",
            Self::Mp3 => "mp3",
            Self::Opus => "opus",
            Self::Vorbis => "vorbis",
            Self::Flac => "flac",
            Self::Ac3 => "ac3",
            Self::Pcm => "pcm",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for CodecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/**
    Video pixel layouts.

    A subset of what decoders produce. Layouts not listed here are still
    decodable and convertible, they are just reported as `None` on the
    stream descriptor.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Planar YUV 4:2:0, 12bpp
    Yuv420p,
    /// Semi-planar YUV 4:2:0, 12bpp
    Nv12,
    /// Planar YUV 4:2:2, 16bpp
    Yuv422p,
    /// Planar YUV 4:4:4, 24bpp
    Yuv444p,
    /// Planar YUV 4:2:0, 10-bit
    Yuv420p10,
    /// Packed RGB, 24bpp
    Rgb24,
    /// Packed BGR, 24bpp
    Bgr24,
    /// Packed RGBA, 32bpp
    Rgba,
    /// Packed BGRA, 32bpp
    Bgra,
}

impl PixelFormat {
    /**
        Returns the number of bytes per pixel for packed layouts.

        Planar layouts have no single per-pixel size and return `None`.
        Only packed layouts can be used as a conversion target.
    */
    pub const fn bytes_per_pixel(self) -> Option<usize> {
        match self {
            Self::Rgb24 | Self::Bgr24 => Some(3),
            Self::Rgba | Self::Bgra => Some(4),
            _ => None,
        }
    }

    /**
        Size in bytes of a tightly packed `width x height` image in this layout.
    */
    pub const fn frame_size(self, width: u32, height: u32) -> Option<usize> {
        match self.bytes_per_pixel() {
            Some(bpp) => Some(width as usize * height as usize * bpp),
            None => None,
        }
    }

    pub const fn is_planar(self) -> bool {
        self.bytes_per_pixel().is_none()
    }
}
