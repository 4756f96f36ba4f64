/*!
    [`MediaBackend`] implementation on top of the `ffmpeg-*` crates.
*/

use std::path::Path;

use ffmpeg_decode::{AudioDecoder, VideoDecoder, find_decoder};
use ffmpeg_next::util::frame::video::Video as VideoFrameFFmpeg;
use ffmpeg_source::{CodecConfig, Source};
use ffmpeg_transform::{VideoTransform, VideoTransformConfig};
use ffmpeg_types::{Error, Packet, Pts, Result, StreamDescriptor};

use crate::backend::{FrameConverter, FrameDecoder, MediaBackend, PacketSource, RawFrame};

/**
    FFmpeg-backed demux, decode and pixel conversion.

    Obtained from [`FfmpegBackend::init`], which initializes the library, so
    holding one proves initialization has happened.
*/
#[derive(Debug)]
pub struct FfmpegBackend {
    _private: (),
}

impl FfmpegBackend {
    pub fn init() -> Result<Self> {
        ffmpeg_next::init().map_err(|e| Error::Init(e.to_string()))?;
        Ok(Self { _private: () })
    }
}

fn codec_config(source: &Source, stream: &StreamDescriptor) -> Result<CodecConfig> {
    source
        .codec_config(stream.index)
        .ok_or_else(|| Error::DecoderInit {
            codec: stream.codec.to_string(),
            reason: format!("stream {} has no codec parameters", stream.index),
        })
}

impl MediaBackend for FfmpegBackend {
    type Source = Source;
    type VideoDecoder = VideoDecoder;
    type AudioDecoder = AudioDecoder;
    type Converter = VideoTransform;

    fn open(&self, path: &Path) -> Result<Source> {
        Source::open(path)
    }

    fn find_decoder(&self, source: &Source, stream: &StreamDescriptor) -> Result<()> {
        find_decoder(&codec_config(source, stream)?)
    }

    fn open_video_decoder(
        &self,
        source: &Source,
        stream: &StreamDescriptor,
    ) -> Result<VideoDecoder> {
        VideoDecoder::new(codec_config(source, stream)?)
    }

    fn open_audio_decoder(
        &self,
        source: &Source,
        stream: &StreamDescriptor,
    ) -> Result<AudioDecoder> {
        AudioDecoder::new(codec_config(source, stream)?)
    }

    fn open_converter(
        &self,
        decoder: &VideoDecoder,
        _stream: &StreamDescriptor,
        target: &VideoTransformConfig,
    ) -> Result<VideoTransform> {
        VideoTransform::new(
            decoder.width(),
            decoder.height(),
            decoder.format(),
            target.clone(),
        )
    }
}

impl PacketSource for Source {
    fn probe(&mut self) -> Result<Vec<StreamDescriptor>> {
        Source::probe(self)
    }

    fn read_packet(&mut self) -> Result<Option<Packet>> {
        self.next_packet()
    }
}

impl RawFrame for VideoFrameFFmpeg {
    fn frame_pts(&self) -> Option<Pts> {
        self.pts().or_else(|| self.timestamp()).map(Pts)
    }
}

impl FrameDecoder for VideoDecoder {
    type Frame = VideoFrameFFmpeg;

    fn send_packet(&mut self, packet: &Packet) -> Result<()> {
        VideoDecoder::send_packet(self, packet)
    }

    fn send_eof(&mut self) -> Result<()> {
        VideoDecoder::send_eof(self)
    }

    fn receive_frame(&mut self) -> Result<Option<&VideoFrameFFmpeg>> {
        VideoDecoder::receive_frame(self)
    }
}

impl FrameConverter for VideoTransform {
    type Frame = VideoFrameFFmpeg;

    fn frame_size(&self) -> usize {
        VideoTransform::frame_size(self)
    }

    fn convert(&mut self, frame: &VideoFrameFFmpeg, output: &mut [u8]) -> Result<()> {
        self.convert_into(frame, output)
    }
}
