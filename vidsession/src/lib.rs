/*!
    Background decode-and-deliver sessions.

    A [`VideoSession`] opens a media file, selects its first video and first
    audio stream, and opens a decoder for each plus a pixel converter for the
    video. Once started, a dedicated thread pulls packets from the container,
    decodes the video ones, converts every completed frame into a fixed packed
    layout and notifies the registered frame callback. Audio packets are read
    and discarded.

    ```ignore
    let backend = FfmpegBackend::init()?;
    let mut session = VideoSession::load(&backend, "clip.mp4")?;
    session.register_frame_callback(|slot| {
        let frame = slot.read();
        upload(frame.data(), slot.width(), slot.height());
    });
    session.start()?;
    let state = session.wait();
    ```

    FFmpeg sits behind the [`MediaBackend`] traits, so the pipeline itself
    can be driven by any demuxer/decoder implementation.
*/

mod backend;
mod cancel;
mod config;
mod error;
mod ffmpeg;
mod frame_slot;
mod playback;
mod selector;
mod session;
mod status;

#[cfg(test)]
mod testing;

pub use backend::{FrameConverter, FrameDecoder, MediaBackend, PacketSource, RawFrame};
pub use cancel::CancellationToken;
pub use config::SessionConfig;
pub use error::{LoadError, SessionError};
pub use ffmpeg::FfmpegBackend;
pub use frame_slot::{FrameRef, FrameSlot};
pub use playback::{FaultCallback, FinishedCallback, FrameCallback};
pub use selector::{SelectedStreams, SelectionError, select_streams};
pub use session::VideoSession;
pub use status::{PlaybackState, PlaybackStatus};

pub use ffmpeg_transform::{ScalingAlgorithm, VideoTransformConfig};
pub use ffmpeg_types::{
    CodecId, Error as MediaError, MediaKind, Packet, PixelFormat, Pts, Rational,
    StreamDescriptor, VideoParams,
};
