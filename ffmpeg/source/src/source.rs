/*!
    Media source implementation.
*/

use std::ffi::CString;
use std::path::{Path, PathBuf};
use std::ptr;

use ffmpeg_next::{
    ffi,
    format::{context::Input as InputContext, stream::Stream},
};

use ffmpeg_types::{Error, MediaKind, Packet, Pts, Result, StreamDescriptor, VideoParams};

use crate::codec_config::CodecConfig;
use crate::convert::{
    codec_id_from_ffmpeg, media_kind_from_ffmpeg, pixel_format_from_raw, rational_from_ffmpeg,
};

/**
    An opened media container.

    Created by [`Source::open`]. Call [`Source::probe`] to discover the
    elementary streams, then pull compressed packets with
    [`Source::next_packet`] until it returns `None`.

    The read cursor is internal state, so a source must only be driven from
    one thread at a time.
*/
pub struct Source {
    input: InputContext,
    path: PathBuf,
    /// Filled by the first successful probe.
    streams: Option<Vec<StreamDescriptor>>,
    packets_read: u64,
}

// SAFETY: the format context is owned exclusively by this value and is only
// touched through `&mut self`. Nothing borrowed from it outlives a method
// call: `codec_config` hands out detached copies of the stream parameters.
unsafe impl Send for Source {}

impl Source {
    /**
        Open a media file.

        Only the container header is read here. Fails with
        [`Error::SourceNotFound`] if the path cannot be opened or is not a
        container FFmpeg recognizes.
    */
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let c_path = path
            .to_str()
            .and_then(|p| CString::new(p).ok())
            .ok_or_else(|| Error::SourceNotFound {
                path: path.clone(),
                reason: "path is not representable as a C string".to_string(),
            })?;

        // SAFETY: `ctx` starts null so avformat_open_input allocates it. On
        // failure FFmpeg frees the context itself; on success ownership moves
        // into `InputContext`, which closes it on drop.
        let input = unsafe {
            let mut ctx: *mut ffi::AVFormatContext = ptr::null_mut();
            let ret = ffi::avformat_open_input(
                &mut ctx,
                c_path.as_ptr(),
                ptr::null_mut(),
                ptr::null_mut(),
            );
            if ret < 0 {
                return Err(Error::SourceNotFound {
                    path,
                    reason: ffmpeg_next::Error::from(ret).to_string(),
                });
            }
            InputContext::wrap(ctx)
        };

        log::debug!("opened container {}", path.display());

        Ok(Self {
            input,
            path,
            streams: None,
            packets_read: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /**
        Number of packets returned so far.
    */
    pub fn packets_read(&self) -> u64 {
        self.packets_read
    }

    /**
        Describe every elementary stream in the container, by ascending index.

        Reads ahead into the file as far as FFmpeg needs to determine stream
        parameters. The result is cached, so repeated calls are cheap. Fails
        with [`Error::FormatUnrecognized`] if stream information cannot be
        determined or the container holds no streams at all.
    */
    pub fn probe(&mut self) -> Result<Vec<StreamDescriptor>> {
        if let Some(streams) = &self.streams {
            return Ok(streams.clone());
        }

        // SAFETY: the context pointer is valid for the lifetime of `self.input`.
        let ret =
            unsafe { ffi::avformat_find_stream_info(self.input.as_mut_ptr(), ptr::null_mut()) };
        if ret < 0 {
            return Err(Error::FormatUnrecognized {
                path: self.path.clone(),
                reason: ffmpeg_next::Error::from(ret).to_string(),
            });
        }

        let streams: Vec<StreamDescriptor> =
            self.input.streams().map(|s| describe_stream(&s)).collect();

        if streams.is_empty() {
            return Err(Error::FormatUnrecognized {
                path: self.path.clone(),
                reason: "container holds no streams".to_string(),
            });
        }

        self.streams = Some(streams.clone());
        Ok(streams)
    }

    /**
        Codec parameters of the stream at `index`, for opening a decoder.

        The parameters are copied out of the container, so the config does
        not keep the source alive and may be sent to another thread.
    */
    pub fn codec_config(&self, index: usize) -> Option<CodecConfig> {
        let stream = self.input.stream(index)?;
        let parameters = stream.parameters().clone();
        let codec = codec_id_from_ffmpeg(parameters.id());
        Some(CodecConfig::new(
            parameters,
            codec,
            rational_from_ffmpeg(stream.time_base()),
        ))
    }

    /**
        Read the next packet from the container.

        Blocks until a whole packet is available. Returns `Ok(None)` at end of
        stream and [`Error::Read`] for any other demuxer failure. Packets of
        all streams come back interleaved in file order.
    */
    pub fn next_packet(&mut self) -> Result<Option<Packet>> {
        let mut packet = ffmpeg_next::Packet::empty();

        match packet.read(&mut self.input) {
            Ok(()) => {}
            Err(ffmpeg_next::Error::Eof) => return Ok(None),
            Err(e) => {
                return Err(Error::read(format!("{}: {}", self.path.display(), e)));
            }
        }

        self.packets_read += 1;
        if self.packets_read % 500 == 0 {
            log::trace!("{} packets read from {}", self.packets_read, self.path.display());
        }

        Ok(Some(Packet {
            stream_index: packet.stream(),
            data: packet.data().map(|d| d.to_vec()).unwrap_or_default(),
            pts: packet.pts().map(Pts),
            dts: packet.dts().map(Pts),
            duration: packet.duration(),
            is_keyframe: packet.is_key(),
        }))
    }
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Source")
            .field("path", &self.path)
            .field("streams", &self.streams)
            .field("packets_read", &self.packets_read)
            .finish_non_exhaustive()
    }
}

fn describe_stream(stream: &Stream) -> StreamDescriptor {
    let parameters = stream.parameters();
    let kind = media_kind_from_ffmpeg(parameters.medium());

    let video = (kind == MediaKind::Video).then(|| {
        // SAFETY: plain field reads from the AVCodecParameters owned by the
        // stream, which outlives this call.
        let (width, height, format) = unsafe {
            let ptr = parameters.as_ptr();
            ((*ptr).width, (*ptr).height, (*ptr).format)
        };

        let rate = stream.avg_frame_rate();
        VideoParams {
            width: width.max(0) as u32,
            height: height.max(0) as u32,
            pixel_format: pixel_format_from_raw(format),
            frame_rate: (rate.numerator() != 0).then(|| rational_from_ffmpeg(rate)),
        }
    });

    StreamDescriptor {
        index: stream.index(),
        kind,
        codec: codec_id_from_ffmpeg(parameters.id()),
        time_base: rational_from_ffmpeg(stream.time_base()),
        video,
    }
}
