/*!
    Error type shared by the pipeline crates.
*/

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/**
    Errors produced while opening, demuxing, decoding or converting media.

    The first group of variants can only occur while a session is being set up.
    `Read`, `Decode` and `Conversion` occur while packets are flowing.
*/
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot open '{}' as a media container: {reason}", path.display())]
    SourceNotFound { path: PathBuf, reason: String },

    #[error("cannot determine stream layout of '{}': {reason}", path.display())]
    FormatUnrecognized { path: PathBuf, reason: String },

    #[error("no decoder available for codec '{codec}'")]
    UnsupportedCodec { codec: String },

    #[error("decoder for codec '{codec}' rejected its parameters: {reason}")]
    DecoderInit { codec: String, reason: String },

    #[error("cannot build pixel converter: {0}")]
    ConverterInit(String),

    #[error("packet read failed: {0}")]
    Read(String),

    #[error("decode failed: {0}")]
    Decode(String),

    #[error("pixel conversion failed: {0}")]
    Conversion(String),

    #[error("media library initialization failed: {0}")]
    Init(String),
}

impl Error {
    pub fn read(message: impl Into<String>) -> Self {
        Self::Read(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    pub fn conversion(message: impl Into<String>) -> Self {
        Self::Conversion(message.into())
    }

    /**
        Returns true for faults scoped to a single packet or frame.

        These never terminate a playback loop.
    */
    pub fn is_per_packet(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::Conversion(_))
    }
}
