use ffmpeg_types::StreamDescriptor;
use thiserror::Error;

/**
    The streams a session plays.

    Each field holds the lowest-indexed stream of its kind.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedStreams {
    pub video: StreamDescriptor,
    pub audio: StreamDescriptor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no video stream")]
    NoVideoStream,
    #[error("no audio stream")]
    NoAudioStream,
}

/**
    Pick the first video and first audio stream by index.

    Both are required; video is checked first.
*/
pub fn select_streams(streams: &[StreamDescriptor]) -> Result<SelectedStreams, SelectionError> {
    let first = |pred: fn(&StreamDescriptor) -> bool| {
        streams
            .iter()
            .filter(|s| pred(s))
            .min_by_key(|s| s.index)
            .cloned()
    };

    let video = first(StreamDescriptor::is_video).ok_or(SelectionError::NoVideoStream)?;
    let audio = first(StreamDescriptor::is_audio).ok_or(SelectionError::NoAudioStream)?;
    Ok(SelectedStreams { video, audio })
}
