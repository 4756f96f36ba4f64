/*!
    Video decoder implementation.
*/

use ffmpeg_next::{
    codec::decoder::Video as VideoDecoderFFmpeg, ffi, format::Pixel, packet,
    util::frame::video::Video as VideoFrameFFmpeg,
};

use ffmpeg_source::CodecConfig;
use ffmpeg_types::{CodecId, Error, Packet, Rational, Result};

use crate::context::open_decoder;

/**
    Video decoder.

    Follows the send/receive model: feed a packet with [`send_packet`], then
    call [`receive_frame`] until it returns `None`. A packet may complete
    zero, one or several frames depending on how the codec buffers (B-frame
    reordering, multi-packet access units).

    Received frames are borrowed from storage inside the decoder and are
    overwritten by the next receive, so they must be consumed first.

    [`send_packet`]: VideoDecoder::send_packet
    [`receive_frame`]: VideoDecoder::receive_frame
*/
pub struct VideoDecoder {
    decoder: VideoDecoderFFmpeg,
    frame: VideoFrameFFmpeg,
    codec: CodecId,
    time_base: Rational,
    frames_decoded: u64,
}

// SAFETY: the codec context and frame are owned exclusively by this value
// and are only used through `&mut self`.
unsafe impl Send for VideoDecoder {}

impl VideoDecoder {
    /**
        Open a video decoder for the given stream.

        Fails with [`Error::UnsupportedCodec`] if FFmpeg has no decoder for
        the codec, or [`Error::DecoderInit`] if the decoder refuses to open.
    */
    pub fn new(codec_config: CodecConfig) -> Result<Self> {
        let (opened, codec, time_base) = open_decoder(codec_config)?;

        let decoder = opened.video().map_err(|e| Error::DecoderInit {
            codec: codec.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            decoder,
            frame: VideoFrameFFmpeg::empty(),
            codec,
            time_base,
            frames_decoded: 0,
        })
    }

    pub fn codec(&self) -> &CodecId {
        &self.codec
    }

    pub fn time_base(&self) -> Rational {
        self.time_base
    }

    /**
        Native frame width as configured on the codec context.
    */
    pub fn width(&self) -> u32 {
        self.decoder.width()
    }

    pub fn height(&self) -> u32 {
        self.decoder.height()
    }

    /**
        Native pixel format as configured on the codec context.
    */
    pub fn format(&self) -> Pixel {
        self.decoder.format()
    }

    pub fn frames_decoded(&self) -> u64 {
        self.frames_decoded
    }

    /**
        Feed one compressed packet to the decoder.

        A corrupt packet fails with [`Error::Decode`]; the decoder stays
        usable for the following packets. An empty payload is rejected
        without reaching the codec, which would take it as end of stream.
    */
    pub fn send_packet(&mut self, packet: &Packet) -> Result<()> {
        if packet.data.is_empty() {
            return Err(Error::decode(format!("{}: empty packet", self.codec)));
        }

        let mut ffmpeg_pkt = ffmpeg_next::Packet::copy(&packet.data);

        ffmpeg_pkt.set_pts(packet.pts.map(|p| p.0));
        ffmpeg_pkt.set_dts(packet.dts.map(|p| p.0));
        ffmpeg_pkt.set_duration(packet.duration);
        if packet.is_keyframe {
            ffmpeg_pkt.set_flags(packet::Flags::KEY);
        }

        self.decoder
            .send_packet(&ffmpeg_pkt)
            .map_err(|e| Error::decode(format!("{}: {}", self.codec, e)))
    }

    /**
        Signal end of stream so buffered frames can be drained.
    */
    pub fn send_eof(&mut self) -> Result<()> {
        match self.decoder.send_eof() {
            Ok(()) | Err(ffmpeg_next::Error::Eof) => Ok(()),
            Err(e) => Err(Error::decode(format!("{}: {}", self.codec, e))),
        }
    }

    /**
        Receive the next completed frame, if any.

        Returns `Ok(None)` when the decoder needs more input or has been
        fully drained after [`send_eof`](VideoDecoder::send_eof).
    */
    pub fn receive_frame(&mut self) -> Result<Option<&VideoFrameFFmpeg>> {
        match self.decoder.receive_frame(&mut self.frame) {
            Ok(()) => {
                self.frames_decoded += 1;
                Ok(Some(&self.frame))
            }
            Err(ffmpeg_next::Error::Other { errno }) if errno == ffi::EAGAIN => Ok(None),
            Err(ffmpeg_next::Error::Eof) => Ok(None),
            Err(e) => Err(Error::decode(format!("{}: {}", self.codec, e))),
        }
    }
}

impl std::fmt::Debug for VideoDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoDecoder")
            .field("codec", &self.codec)
            .field("time_base", &self.time_base)
            .field("frames_decoded", &self.frames_decoded)
            .finish_non_exhaustive()
    }
}
