/*!
    Scripted in-memory backend for exercising sessions without media files.
*/

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use ffmpeg_transform::VideoTransformConfig;
use ffmpeg_types::{
    CodecId, Error, MediaKind, Packet, Pts, Rational, Result, StreamDescriptor, VideoParams,
};

use crate::backend::{FrameConverter, FrameDecoder, MediaBackend, PacketSource, RawFrame};

pub(crate) fn video_stream(index: usize, width: u32, height: u32) -> StreamDescriptor {
    StreamDescriptor {
        index,
        kind: MediaKind::Video,
        codec: CodecId::H264,
        time_base: Rational::new(1, 30),
        video: Some(VideoParams {
            width,
            height,
            pixel_format: None,
            frame_rate: Some(Rational::new(30, 1)),
        }),
    }
}

pub(crate) fn audio_stream(index: usize) -> StreamDescriptor {
    StreamDescriptor {
        index,
        kind: MediaKind::Audio,
        codec: CodecId::Aac,
        time_base: Rational::new(1, 48000),
        video: None,
    }
}

pub(crate) fn other_stream(index: usize) -> StreamDescriptor {
    StreamDescriptor {
        index,
        kind: MediaKind::Other,
        codec: CodecId::Other("bin_data".into()),
        time_base: Rational::new(1, 1000),
        video: None,
    }
}

/// One read from the scripted source.
#[derive(Clone, Debug)]
pub(crate) enum Step {
    /// A video packet whose decoded frame is filled with this byte.
    Video(u8),
    /// A video packet the decoder rejects.
    Corrupt,
    Audio,
    /// A packet from a stream index no session selects.
    Other,
    /// A packet on an explicit stream.
    Raw(Packet),
    ReadError,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FailStage {
    Open,
    Probe,
    /// No decoder exists for the video codec.
    VideoCodecMissing,
    /// No decoder exists for the audio codec.
    AudioCodecMissing,
    /// The video decoder exists but refuses to open.
    VideoDecoder,
    /// The audio decoder exists but refuses to open.
    AudioDecoder,
    Converter,
}

#[derive(Clone, Debug)]
pub(crate) struct FakeBackend {
    streams: Vec<StreamDescriptor>,
    script: Vec<Step>,
    endless: bool,
    reorder_delay: usize,
    fail_convert_on: Option<u8>,
    fail_at: Vec<FailStage>,
}

pub(crate) const WIDTH: u32 = 8;
pub(crate) const HEIGHT: u32 = 6;

impl FakeBackend {
    pub fn new(streams: Vec<StreamDescriptor>, script: Vec<Step>) -> Self {
        Self {
            streams,
            script,
            endless: false,
            reorder_delay: 0,
            fail_convert_on: None,
            fail_at: Vec::new(),
        }
    }

    /// Video #0 at `WIDTH x HEIGHT`, audio #1, data #2.
    pub fn standard(script: Vec<Step>) -> Self {
        Self::new(
            vec![
                video_stream(0, WIDTH, HEIGHT),
                audio_stream(1),
                other_stream(2),
            ],
            script,
        )
    }

    /// Keep producing video packets after the script runs out.
    pub fn endless(mut self) -> Self {
        self.endless = true;
        self
    }

    /// Hold back this many frames until later packets or EOF arrive.
    pub fn with_reorder_delay(mut self, frames: usize) -> Self {
        self.reorder_delay = frames;
        self
    }

    pub fn with_failing_conversion(mut self, fill: u8) -> Self {
        self.fail_convert_on = Some(fill);
        self
    }

    pub fn failing_at(mut self, stage: FailStage) -> Self {
        self.fail_at.push(stage);
        self
    }

    fn fails_at(&self, stage: FailStage) -> bool {
        self.fail_at.contains(&stage)
    }

    fn first_index(&self, kind: MediaKind) -> usize {
        self.streams
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| s.index)
            .min()
            .unwrap_or(usize::MAX)
    }
}

#[derive(Debug)]
pub(crate) struct FakeSource {
    path: PathBuf,
    streams: Vec<StreamDescriptor>,
    steps: VecDeque<Step>,
    endless: bool,
    fail_probe: bool,
    video_index: usize,
    audio_index: usize,
    next_pts: i64,
}

impl PacketSource for FakeSource {
    fn probe(&mut self) -> Result<Vec<StreamDescriptor>> {
        if self.fail_probe {
            return Err(Error::FormatUnrecognized {
                path: self.path.clone(),
                reason: "no stream headers".into(),
            });
        }
        Ok(self.streams.clone())
    }

    fn read_packet(&mut self) -> Result<Option<Packet>> {
        let step = match self.steps.pop_front() {
            Some(step) => step,
            None if self.endless => {
                thread::sleep(Duration::from_millis(1));
                Step::Video((self.next_pts % 251) as u8 + 1)
            }
            None => return Ok(None),
        };

        let pts = self.next_pts;
        let packet = match step {
            Step::Video(fill) => {
                self.next_pts += 1;
                Packet::new(self.video_index, vec![fill]).with_pts(pts)
            }
            Step::Corrupt => {
                self.next_pts += 1;
                Packet::new(self.video_index, Vec::new()).with_pts(pts)
            }
            Step::Audio => Packet::new(self.audio_index, vec![0; 16]),
            Step::Other => Packet::new(usize::MAX - 1, vec![0xff]),
            Step::Raw(packet) => packet,
            Step::ReadError => return Err(Error::read("simulated i/o failure")),
        };
        Ok(Some(packet))
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct FakeFrame {
    pub fill: u8,
    pub pts: Option<Pts>,
}

impl RawFrame for FakeFrame {
    fn frame_pts(&self) -> Option<Pts> {
        self.pts
    }
}

#[derive(Debug)]
pub(crate) struct FakeDecoder {
    held: VecDeque<FakeFrame>,
    current: FakeFrame,
    delay: usize,
    eof: bool,
}

impl FrameDecoder for FakeDecoder {
    type Frame = FakeFrame;

    fn send_packet(&mut self, packet: &Packet) -> Result<()> {
        let Some(&fill) = packet.data.first() else {
            return Err(Error::decode("invalid NAL unit"));
        };
        self.held.push_back(FakeFrame {
            fill,
            pts: packet.pts,
        });
        Ok(())
    }

    fn send_eof(&mut self) -> Result<()> {
        self.eof = true;
        Ok(())
    }

    fn receive_frame(&mut self) -> Result<Option<&FakeFrame>> {
        if self.held.len() > self.delay || (self.eof && !self.held.is_empty()) {
            if let Some(frame) = self.held.pop_front() {
                self.current = frame;
                return Ok(Some(&self.current));
            }
        }
        Ok(None)
    }
}

#[derive(Debug)]
pub(crate) struct FakeAudioDecoder;

#[derive(Debug)]
pub(crate) struct FakeConverter {
    frame_size: usize,
    fail_on: Option<u8>,
}

impl FrameConverter for FakeConverter {
    type Frame = FakeFrame;

    fn frame_size(&self) -> usize {
        self.frame_size
    }

    fn convert(&mut self, frame: &FakeFrame, output: &mut [u8]) -> Result<()> {
        if self.fail_on == Some(frame.fill) {
            return Err(Error::conversion("simulated scaler fault"));
        }
        if output.len() != self.frame_size {
            return Err(Error::conversion("wrong output size"));
        }
        output.fill(frame.fill);
        Ok(())
    }
}

impl MediaBackend for FakeBackend {
    type Source = FakeSource;
    type VideoDecoder = FakeDecoder;
    type AudioDecoder = FakeAudioDecoder;
    type Converter = FakeConverter;

    fn open(&self, path: &Path) -> Result<FakeSource> {
        if self.fails_at(FailStage::Open) {
            return Err(Error::SourceNotFound {
                path: path.to_path_buf(),
                reason: "No such file or directory".into(),
            });
        }
        Ok(FakeSource {
            path: path.to_path_buf(),
            streams: self.streams.clone(),
            steps: self.script.iter().cloned().collect(),
            endless: self.endless,
            fail_probe: self.fails_at(FailStage::Probe),
            video_index: self.first_index(MediaKind::Video),
            audio_index: self.first_index(MediaKind::Audio),
            next_pts: 0,
        })
    }

    fn find_decoder(&self, _source: &FakeSource, stream: &StreamDescriptor) -> Result<()> {
        let missing = match stream.kind {
            MediaKind::Video => self.fails_at(FailStage::VideoCodecMissing),
            MediaKind::Audio => self.fails_at(FailStage::AudioCodecMissing),
            MediaKind::Other => true,
        };
        if missing {
            return Err(Error::UnsupportedCodec {
                codec: stream.codec.to_string(),
            });
        }
        Ok(())
    }

    fn open_video_decoder(
        &self,
        _source: &FakeSource,
        stream: &StreamDescriptor,
    ) -> Result<FakeDecoder> {
        if self.fails_at(FailStage::VideoDecoder) {
            return Err(Error::DecoderInit {
                codec: stream.codec.to_string(),
                reason: "invalid SPS".into(),
            });
        }
        Ok(FakeDecoder {
            held: VecDeque::new(),
            current: FakeFrame::default(),
            delay: self.reorder_delay,
            eof: false,
        })
    }

    fn open_audio_decoder(
        &self,
        _source: &FakeSource,
        stream: &StreamDescriptor,
    ) -> Result<FakeAudioDecoder> {
        if self.fails_at(FailStage::AudioDecoder) {
            return Err(Error::DecoderInit {
                codec: stream.codec.to_string(),
                reason: "invalid extradata".into(),
            });
        }
        Ok(FakeAudioDecoder)
    }

    fn open_converter(
        &self,
        _decoder: &FakeDecoder,
        _stream: &StreamDescriptor,
        target: &VideoTransformConfig,
    ) -> Result<FakeConverter> {
        if self.fails_at(FailStage::Converter) {
            return Err(Error::ConverterInit("no conversion path".into()));
        }
        let frame_size = target
            .frame_size()
            .ok_or_else(|| Error::ConverterInit("planar target".into()))?;
        Ok(FakeConverter {
            frame_size,
            fail_on: self.fail_convert_on,
        })
    }
}
