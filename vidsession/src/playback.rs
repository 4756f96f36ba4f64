/*!
    The background decode loop.

    One loop runs per session on its own thread. It reads packets in
    container order, decodes those of the selected video stream, converts
    every completed frame into the session's back buffer and publishes it.
    Audio and any other streams are read and dropped.
*/

use std::path::PathBuf;
use std::sync::Arc;

use ffmpeg_types::{Error, Packet};
use log::{debug, info, trace, warn};
use parking_lot::Mutex;

use crate::backend::{FrameConverter, FrameDecoder, MediaBackend, PacketSource, RawFrame};
use crate::cancel::CancellationToken;
use crate::frame_slot::FrameSlot;
use crate::status::{PlaybackState, PlaybackStatus};

/// Invoked on the playback thread after each frame is published.
pub type FrameCallback = Box<dyn FnMut(&FrameSlot) + Send>;
/// Invoked on the playback thread for each skipped packet or frame.
pub type FaultCallback = Box<dyn FnMut(&Error) + Send>;
/// Invoked once on the playback thread with the terminal state.
pub type FinishedCallback = Box<dyn FnMut(PlaybackState) + Send>;

#[derive(Default)]
pub(crate) struct Callbacks {
    pub frame: Option<FrameCallback>,
    pub fault: Option<FaultCallback>,
    pub finished: Option<FinishedCallback>,
}

pub(crate) struct PlaybackLoop<B: MediaBackend> {
    pub source: B::Source,
    pub decoder: B::VideoDecoder,
    pub converter: B::Converter,
    pub video_index: usize,
    pub audio_index: usize,
    pub frames: Arc<FrameSlot>,
    pub back: Vec<u8>,
    pub status: Arc<PlaybackStatus>,
    pub callbacks: Arc<Mutex<Callbacks>>,
    pub cancel: CancellationToken,
    pub path: PathBuf,
}

impl<B: MediaBackend> PlaybackLoop<B> {
    /**
        Run until the source is exhausted, a read fails or the token is
        cancelled. Returns the terminal state, which is also stored in the
        shared status before the finished callback runs.
    */
    pub fn run(mut self) -> PlaybackState {
        debug!("playback of {} started", self.path.display());

        let state = loop {
            if self.cancel.is_cancelled() {
                break PlaybackState::Cancelled;
            }

            match self.source.read_packet() {
                Ok(Some(packet)) => {
                    self.status.record_packet();
                    self.route(&packet);
                }
                Ok(None) => {
                    self.flush();
                    break PlaybackState::Exhausted;
                }
                Err(e) => {
                    warn!("read fault in {}: {}", self.path.display(), e);
                    self.status.record_error(e.to_string());
                    break PlaybackState::Failed;
                }
            }
        };

        self.finish(state)
    }

    fn route(&mut self, packet: &Packet) {
        if packet.stream_index == self.video_index {
            if let Err(e) = self.decoder.send_packet(packet) {
                report_fault(&self.status, &self.callbacks, &e);
                return;
            }
            self.drain();
        } else if packet.stream_index == self.audio_index {
            trace!("discarding audio packet ({} bytes)", packet.data.len());
        } else {
            trace!("discarding packet from stream {}", packet.stream_index);
        }
    }

    fn flush(&mut self) {
        if let Err(e) = self.decoder.send_eof() {
            report_fault(&self.status, &self.callbacks, &e);
            return;
        }
        self.drain();
    }

    /**
        Convert and publish every frame the decoder has ready.
    */
    fn drain(&mut self) {
        loop {
            let frame = match self.decoder.receive_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(e) => {
                    report_fault(&self.status, &self.callbacks, &e);
                    break;
                }
            };

            let pts = frame.frame_pts();
            if let Err(e) = self.converter.convert(frame, &mut self.back) {
                report_fault(&self.status, &self.callbacks, &e);
                continue;
            }

            self.frames.publish(&mut self.back, pts);
            self.status.record_frame();

            let taken = self.callbacks.lock().frame.take();
            if let Some(mut callback) = taken {
                callback(&self.frames);
                restore(&mut self.callbacks.lock().frame, callback);
            }
        }
    }

    fn finish(self, state: PlaybackState) -> PlaybackState {
        self.status.set_state(state);

        info!(
            "playback of {} ended: {:?}, {} frames delivered, {} packets read, {} faults",
            self.path.display(),
            state,
            self.status.frames_delivered(),
            self.status.packets_read(),
            self.status.decode_faults()
        );

        let taken = self.callbacks.lock().finished.take();
        if let Some(mut callback) = taken {
            callback(state);
            restore(&mut self.callbacks.lock().finished, callback);
        }
        state
    }
}

fn report_fault(status: &PlaybackStatus, callbacks: &Mutex<Callbacks>, err: &Error) {
    status.record_fault();
    debug!("skipping packet: {}", err);
    let taken = callbacks.lock().fault.take();
    if let Some(mut callback) = taken {
        callback(err);
        restore(&mut callbacks.lock().fault, callback);
    }
}

/**
    Put a callback back after it ran outside the lock, unless a new one was
    registered meanwhile.
*/
fn restore<C>(slot: &mut Option<C>, callback: C) {
    if slot.is_none() {
        *slot = Some(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MediaBackend;
    use crate::testing::{FakeBackend, HEIGHT, Step, WIDTH};
    use ffmpeg_transform::VideoTransformConfig;
    use ffmpeg_types::{PixelFormat, Pts};
    use std::path::Path;

    fn playback(backend: &FakeBackend) -> PlaybackLoop<FakeBackend> {
        let mut source = backend.open(Path::new("loop.mkv")).unwrap();
        let streams = source.probe().unwrap();
        let decoder = backend.open_video_decoder(&source, &streams[0]).unwrap();
        let target = VideoTransformConfig::new(WIDTH, HEIGHT, PixelFormat::Rgb24);
        let converter = backend
            .open_converter(&decoder, &streams[0], &target)
            .unwrap();
        let frames = Arc::new(FrameSlot::new(
            WIDTH,
            HEIGHT,
            PixelFormat::Rgb24,
            target.frame_size().unwrap(),
        ));
        PlaybackLoop {
            source,
            decoder,
            converter,
            video_index: 0,
            audio_index: 1,
            back: frames.back_buffer(),
            frames,
            status: Arc::new(PlaybackStatus::default()),
            callbacks: Arc::new(Mutex::new(Callbacks::default())),
            cancel: CancellationToken::new(),
            path: "loop.mkv".into(),
        }
    }

    #[test]
    fn published_frame_carries_packet_pts() {
        let backend = FakeBackend::standard(vec![Step::Audio, Step::Video(4), Step::Video(5)]);
        let playback = playback(&backend);
        let frames = Arc::clone(&playback.frames);
        let status = Arc::clone(&playback.status);

        assert_eq!(playback.run(), PlaybackState::Exhausted);
        assert_eq!(status.state(), PlaybackState::Exhausted);

        let frame = frames.read();
        assert_eq!(frame.sequence(), 2);
        assert_eq!(frame.pts(), Some(Pts(1)));
        assert!(frame.iter().all(|&b| b == 5));
    }

    #[test]
    fn cancelled_before_first_read() {
        let backend = FakeBackend::standard(vec![Step::Video(1)]);
        let playback = playback(&backend);
        playback.cancel.cancel();
        let status = Arc::clone(&playback.status);

        assert_eq!(playback.run(), PlaybackState::Cancelled);
        assert_eq!(status.packets_read(), 0);
        assert_eq!(status.frames_delivered(), 0);
    }
}
