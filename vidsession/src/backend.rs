/*!
    The seam between the pipeline and the media library.

    The pipeline only needs three capabilities: demux, decode and
    convert-pixels. [`MediaBackend`] builds one of each for a session;
    [`FfmpegBackend`](crate::FfmpegBackend) is the production implementation.
*/

use std::fmt::Debug;
use std::path::Path;

use ffmpeg_transform::VideoTransformConfig;
use ffmpeg_types::{Packet, Pts, Result, StreamDescriptor};

/**
    An opened container that yields compressed packets.
*/
pub trait PacketSource: Send + 'static {
    /**
        Describe every elementary stream, by ascending index.

        Fails with `FormatUnrecognized` when stream layout cannot be determined.
    */
    fn probe(&mut self) -> Result<Vec<StreamDescriptor>>;

    /**
        Block until the next whole packet is available.

        `Ok(None)` means the container is exhausted. Any error is a read
        fault that ends playback.
    */
    fn read_packet(&mut self) -> Result<Option<Packet>>;
}

/**
    A decoded, not yet converted video frame.
*/
pub trait RawFrame {
    fn frame_pts(&self) -> Option<Pts>;
}

/**
    A video decoder bound to one stream.

    Decoding one packet is `send_packet` followed by `receive_frame` until
    it returns `None`. Frames are borrowed from the decoder and are only
    valid until the next call.
*/
pub trait FrameDecoder: Send + 'static {
    type Frame: RawFrame;

    fn send_packet(&mut self, packet: &Packet) -> Result<()>;

    /**
        Signal end of stream so frames held for reordering can be drained.
    */
    fn send_eof(&mut self) -> Result<()>;

    fn receive_frame(&mut self) -> Result<Option<&Self::Frame>>;
}

/**
    Converts raw frames into the session's fixed output layout.
*/
pub trait FrameConverter: Send + 'static {
    type Frame: RawFrame;

    /**
        Exact size of the buffer `convert` writes.
    */
    fn frame_size(&self) -> usize;

    /**
        Overwrite `output` with `frame` in the target layout.
    */
    fn convert(&mut self, frame: &Self::Frame, output: &mut [u8]) -> Result<()>;
}

/**
    Factory for the per-session demux, decode and convert objects.
*/
pub trait MediaBackend: 'static {
    type Source: PacketSource;
    type VideoDecoder: FrameDecoder;
    type AudioDecoder: Debug + Send + 'static;
    type Converter: FrameConverter<Frame = <Self::VideoDecoder as FrameDecoder>::Frame>;

    /**
        Open a container. Fails with `SourceNotFound`.
    */
    fn open(&self, path: &Path) -> Result<Self::Source>;

    /**
        Check that a decoder exists for `stream` without opening it.
        Fails with `UnsupportedCodec`.
    */
    fn find_decoder(&self, source: &Self::Source, stream: &StreamDescriptor) -> Result<()>;

    /**
        Open a video decoder. Fails with `UnsupportedCodec` or `DecoderInit`.
    */
    fn open_video_decoder(
        &self,
        source: &Self::Source,
        stream: &StreamDescriptor,
    ) -> Result<Self::VideoDecoder>;

    /**
        Open an audio decoder. Fails with `UnsupportedCodec` or `DecoderInit`.
    */
    fn open_audio_decoder(
        &self,
        source: &Self::Source,
        stream: &StreamDescriptor,
    ) -> Result<Self::AudioDecoder>;

    /**
        Build a converter from the decoder's native layout to `target`.
        Fails with `ConverterInit`.
    */
    fn open_converter(
        &self,
        decoder: &Self::VideoDecoder,
        stream: &StreamDescriptor,
        target: &VideoTransformConfig,
    ) -> Result<Self::Converter>;
}
