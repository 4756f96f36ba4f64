use std::io;
use std::path::{Path, PathBuf};

use ffmpeg_types::Error as MediaError;
use thiserror::Error;

/**
    Why a session could not be loaded.

    Every variant names the path that was being loaded. No session exists
    after a load error and no resources are held.
*/
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open '{}': {reason}", path.display())]
    SourceNotFound { path: PathBuf, reason: String },

    #[error("cannot determine stream layout of '{}': {reason}", path.display())]
    FormatUnrecognized { path: PathBuf, reason: String },

    #[error("'{}' has no video stream", path.display())]
    NoVideoStream { path: PathBuf },

    #[error("'{}' has no audio stream", path.display())]
    NoAudioStream { path: PathBuf },

    #[error("'{}' uses codec '{codec}' which has no decoder", path.display())]
    UnsupportedCodec { path: PathBuf, codec: String },

    #[error("cannot open '{codec}' decoder for '{}': {reason}", path.display())]
    DecoderInitFailed {
        path: PathBuf,
        codec: String,
        reason: String,
    },

    #[error("cannot build pixel converter for '{}': {reason}", path.display())]
    ConverterInitFailed { path: PathBuf, reason: String },
}

impl LoadError {
    /**
        Attach the session path to a backend error raised during load.

        Backend errors that carry their own path keep it.
    */
    pub(crate) fn from_media(path: &Path, err: MediaError) -> Self {
        let path = path.to_path_buf();
        match err {
            MediaError::SourceNotFound { path, reason } => Self::SourceNotFound { path, reason },
            MediaError::FormatUnrecognized { path, reason } => {
                Self::FormatUnrecognized { path, reason }
            }
            MediaError::UnsupportedCodec { codec } => Self::UnsupportedCodec { path, codec },
            MediaError::DecoderInit { codec, reason } => Self::DecoderInitFailed {
                path,
                codec,
                reason,
            },
            MediaError::ConverterInit(reason) => Self::ConverterInitFailed { path, reason },
            MediaError::Init(reason) => Self::SourceNotFound { path, reason },
            other @ (MediaError::Read(_) | MediaError::Decode(_) | MediaError::Conversion(_)) => {
                Self::FormatUnrecognized {
                    path,
                    reason: other.to_string(),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::SourceNotFound { path, .. }
            | Self::FormatUnrecognized { path, .. }
            | Self::NoVideoStream { path }
            | Self::NoAudioStream { path }
            | Self::UnsupportedCodec { path, .. }
            | Self::DecoderInitFailed { path, .. }
            | Self::ConverterInitFailed { path, .. } => path,
        }
    }
}

/**
    Errors from driving an already loaded session.
*/
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("playback was already started or stopped")]
    AlreadyStarted,

    #[error("failed to spawn playback thread: {0}")]
    Spawn(#[source] io::Error),
}
