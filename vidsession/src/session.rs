/*!
    The session facade: load-time validation and playback control.
*/

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use ffmpeg_transform::VideoTransformConfig;
use ffmpeg_types::{Error as MediaError, PixelFormat, StreamDescriptor};
use log::{error, info};
use parking_lot::Mutex;

use crate::backend::{FrameConverter, MediaBackend, PacketSource};
use crate::cancel::CancellationToken;
use crate::config::SessionConfig;
use crate::error::{LoadError, SessionError};
use crate::ffmpeg::FfmpegBackend;
use crate::frame_slot::{FrameRef, FrameSlot};
use crate::playback::{Callbacks, PlaybackLoop};
use crate::selector::{SelectionError, select_streams};
use crate::status::{PlaybackState, PlaybackStatus};

/**
    A loaded media file and its background playback.

    A session only exists once every load step has succeeded, so it always
    has an open container, both decoders, a converter and its frame buffers.
    They are released when the session is dropped, after the playback
    thread has been cancelled and joined.
*/
pub struct VideoSession<B: MediaBackend = FfmpegBackend> {
    path: PathBuf,
    video_stream: StreamDescriptor,
    audio_stream: StreamDescriptor,
    audio_decoder: B::AudioDecoder,
    frames: Arc<FrameSlot>,
    status: Arc<PlaybackStatus>,
    callbacks: Arc<Mutex<Callbacks>>,
    cancel: CancellationToken,
    /// Present until `start` hands it to the playback thread.
    pending: Option<PlaybackLoop<B>>,
    worker: Option<JoinHandle<PlaybackState>>,
    config: SessionConfig,
}

impl<B: MediaBackend> VideoSession<B> {
    /**
        Load `path` with the default [`SessionConfig`].
    */
    pub fn load(backend: &B, path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Self::load_with(backend, path, SessionConfig::default())
    }

    /**
        Open `path`, select its first video and audio streams, find both
        decoders before opening either, build the pixel converter, and
        allocate the frame buffers.

        Playback does not begin until [`start`](Self::start).
    */
    pub fn load_with(
        backend: &B,
        path: impl AsRef<Path>,
        config: SessionConfig,
    ) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let media_err = |e: MediaError| LoadError::from_media(path, e);

        let mut source = backend.open(path).map_err(media_err)?;
        let streams = source.probe().map_err(media_err)?;

        let selected = select_streams(&streams).map_err(|e| match e {
            SelectionError::NoVideoStream => LoadError::NoVideoStream {
                path: path.to_path_buf(),
            },
            SelectionError::NoAudioStream => LoadError::NoAudioStream {
                path: path.to_path_buf(),
            },
        })?;

        let (width, height) = match selected.video.dimensions() {
            Some((w, h)) if w > 0 && h > 0 => (w, h),
            other => {
                return Err(LoadError::FormatUnrecognized {
                    path: path.to_path_buf(),
                    reason: format!("video stream has no usable dimensions ({:?})", other),
                });
            }
        };

        backend
            .find_decoder(&source, &selected.video)
            .map_err(media_err)?;
        backend
            .find_decoder(&source, &selected.audio)
            .map_err(media_err)?;

        let decoder = backend
            .open_video_decoder(&source, &selected.video)
            .map_err(media_err)?;
        let audio_decoder = backend
            .open_audio_decoder(&source, &selected.audio)
            .map_err(media_err)?;

        let target = VideoTransformConfig::new(width, height, config.output_format)
            .with_algorithm(config.scaling);
        let frame_size = target.frame_size().ok_or_else(|| LoadError::ConverterInitFailed {
            path: path.to_path_buf(),
            reason: format!("{:?} is not a packed output layout", config.output_format),
        })?;

        let converter = backend
            .open_converter(&decoder, &selected.video, &target)
            .map_err(media_err)?;
        if converter.frame_size() != frame_size {
            return Err(LoadError::ConverterInitFailed {
                path: path.to_path_buf(),
                reason: format!(
                    "converter writes {} bytes per frame, expected {}",
                    converter.frame_size(),
                    frame_size
                ),
            });
        }

        let frames = Arc::new(FrameSlot::new(width, height, config.output_format, frame_size));
        let status = Arc::new(PlaybackStatus::default());
        let callbacks = Arc::new(Mutex::new(Callbacks::default()));
        let cancel = CancellationToken::new();

        info!(
            "loaded {}: video #{} {} {}x{}, audio #{} {} ({:?}), output {:?}",
            path.display(),
            selected.video.index,
            selected.video.codec,
            width,
            height,
            selected.audio.index,
            selected.audio.codec,
            audio_decoder,
            config.output_format
        );

        let pending = PlaybackLoop {
            source,
            decoder,
            converter,
            video_index: selected.video.index,
            audio_index: selected.audio.index,
            back: frames.back_buffer(),
            frames: Arc::clone(&frames),
            status: Arc::clone(&status),
            callbacks: Arc::clone(&callbacks),
            cancel: cancel.clone(),
            path: path.to_path_buf(),
        };

        Ok(Self {
            path: path.to_path_buf(),
            video_stream: selected.video,
            audio_stream: selected.audio,
            audio_decoder,
            frames,
            status,
            callbacks,
            cancel,
            pending: Some(pending),
            worker: None,
            config,
        })
    }

    /**
        Launch playback on a dedicated thread and return immediately.

        A session plays once: calling this again, or after [`stop`](Self::stop),
        fails with [`SessionError::AlreadyStarted`].
    */
    pub fn start(&mut self) -> Result<(), SessionError> {
        let playback = self.pending.take().ok_or(SessionError::AlreadyStarted)?;
        if !self
            .status
            .transition(PlaybackState::Idle, PlaybackState::Running)
        {
            return Err(SessionError::AlreadyStarted);
        }

        let status = Arc::clone(&self.status);
        let spawned = thread::Builder::new()
            .name(self.config.thread_name.clone())
            .spawn(move || {
                match panic::catch_unwind(AssertUnwindSafe(|| playback.run())) {
                    Ok(state) => state,
                    Err(_) => {
                        error!("playback thread panicked");
                        status.record_error("playback thread panicked".to_string());
                        status.set_state(PlaybackState::Failed);
                        PlaybackState::Failed
                    }
                }
            });

        match spawned {
            Ok(handle) => {
                self.worker = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.status.set_state(PlaybackState::Failed);
                self.status.record_error(e.to_string());
                Err(SessionError::Spawn(e))
            }
        }
    }

    /**
        Set the callback invoked after each converted frame is published.

        Runs on the playback thread, one frame at a time and in decode order.
        The next frame is not decoded until the callback returns. Callbacks
        run without any session lock held, so registering from another
        thread never waits on a running callback; the newly registered one
        takes effect from the next invocation.
    */
    pub fn register_frame_callback<F>(&self, callback: F)
    where
        F: FnMut(&FrameSlot) + Send + 'static,
    {
        self.callbacks.lock().frame = Some(Box::new(callback));
    }

    /**
        Set the callback invoked for each packet or frame that failed to
        decode or convert. Playback continues after these.
    */
    pub fn register_fault_callback<F>(&self, callback: F)
    where
        F: FnMut(&MediaError) + Send + 'static,
    {
        self.callbacks.lock().fault = Some(Box::new(callback));
    }

    /**
        Set the callback invoked once with the terminal state when playback ends.
    */
    pub fn register_finished_callback<F>(&self, callback: F)
    where
        F: FnMut(PlaybackState) + Send + 'static,
    {
        self.callbacks.lock().finished = Some(Box::new(callback));
    }

    /**
        Cancel playback and wait for the playback thread to exit.

        The loop stops at the next packet boundary. A session that was never
        started moves straight to `Cancelled`.
    */
    pub fn stop(&mut self) -> PlaybackState {
        self.cancel.cancel();
        if self.pending.take().is_some() {
            self.status
                .transition(PlaybackState::Idle, PlaybackState::Cancelled);
        }
        self.wait()
    }

    /**
        Block until playback ends and return the terminal state.

        Returns the current state straight away if playback is not running.
    */
    pub fn wait(&mut self) -> PlaybackState {
        match self.worker.take() {
            Some(handle) => handle.join().unwrap_or(PlaybackState::Failed),
            None => self.status.state(),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.status.state()
    }

    pub fn status(&self) -> &PlaybackStatus {
        &self.status
    }

    pub fn width(&self) -> u32 {
        self.frames.width()
    }

    pub fn height(&self) -> u32 {
        self.frames.height()
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.frames.pixel_format()
    }

    /**
        Shared handle to the converted frame, usable from any thread.
    */
    pub fn frame_slot(&self) -> Arc<FrameSlot> {
        Arc::clone(&self.frames)
    }

    pub fn current_frame(&self) -> FrameRef<'_> {
        self.frames.read()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn video_stream(&self) -> &StreamDescriptor {
        &self.video_stream
    }

    pub fn audio_stream(&self) -> &StreamDescriptor {
        &self.audio_stream
    }

    /// The opened audio decoder. Audio is not decoded during playback.
    pub fn audio_decoder(&self) -> &B::AudioDecoder {
        &self.audio_decoder
    }

    /**
        Token that cancels this session's playback when triggered.
    */
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl<B: MediaBackend> Drop for VideoSession<B> {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

impl<B: MediaBackend> std::fmt::Debug for VideoSession<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoSession")
            .field("path", &self.path)
            .field("video_stream", &self.video_stream.index)
            .field("audio_stream", &self.audio_stream.index)
            .field("width", &self.frames.width())
            .field("height", &self.frames.height())
            .field("state", &self.status.state())
            .finish()
    }
}
