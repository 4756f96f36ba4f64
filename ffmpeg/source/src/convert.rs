/*!
    Conversion utilities between ffmpeg-next types and ffmpeg-types.
*/

use ffmpeg_next::{codec::Id, ffi::AVPixelFormat, format::Pixel, media::Type};

use ffmpeg_types::{CodecId, MediaKind, PixelFormat, Rational};

pub(crate) fn rational_from_ffmpeg(r: ffmpeg_next::Rational) -> Rational {
    Rational::new(r.numerator(), r.denominator())
}

pub(crate) fn media_kind_from_ffmpeg(medium: Type) -> MediaKind {
    match medium {
        Type::Video => MediaKind::Video,
        Type::Audio => MediaKind::Audio,
        _ => MediaKind::Other,
    }
}

pub(crate) fn codec_id_from_ffmpeg(id: Id) -> CodecId {
    match id {
        Id::H264 => CodecId::H264,
        Id::HEVC => CodecId::H265,
        Id::VP8 => CodecId::Vp8,
        Id::VP9 => CodecId::Vp9,
        Id::AV1 => CodecId::Av1,
        Id::MPEG4 => CodecId::Mpeg4,
        Id::MPEG2VIDEO => CodecId::Mpeg2Video,
        Id::AAC => CodecId::Aac,
        Id::MP3 => CodecId::Mp3,
        Id::OPUS => CodecId::Opus,
        Id::VORBIS => CodecId::Vorbis,
        Id::FLAC => CodecId::Flac,
        Id::AC3 => CodecId::Ac3,
        Id::PCM_S16LE | Id::PCM_S16BE | Id::PCM_F32LE => CodecId::Pcm,
        other => CodecId::Other(other.name().to_string()),
    }
}

const NAMED_PIXELS: [Pixel; 10] = [
    Pixel::YUV420P,
    Pixel::NV12,
    Pixel::YUV422P,
    Pixel::YUV444P,
    Pixel::YUV420P10LE,
    Pixel::YUV420P10BE,
    Pixel::RGB24,
    Pixel::BGR24,
    Pixel::RGBA,
    Pixel::BGRA,
];

/**
    Map the raw `format` integer stored in codec parameters.

    Compared against the discriminants of the layouts we name, so values
    unknown to the bindings are never turned into an `AVPixelFormat`.
*/
pub(crate) fn pixel_format_from_raw(raw: i32) -> Option<PixelFormat> {
    NAMED_PIXELS
        .into_iter()
        .find(|&pixel| AVPixelFormat::from(pixel) as i32 == raw)
        .and_then(pixel_format_from_ffmpeg)
}

/**
    Convert an ffmpeg-next pixel format to our PixelFormat.

    Returns `None` for layouts we don't name.
*/
pub fn pixel_format_from_ffmpeg(format: Pixel) -> Option<PixelFormat> {
    match format {
        Pixel::YUV420P => Some(PixelFormat::Yuv420p),
        Pixel::NV12 => Some(PixelFormat::Nv12),
        Pixel::YUV422P => Some(PixelFormat::Yuv422p),
        Pixel::YUV444P => Some(PixelFormat::Yuv444p),
        Pixel::YUV420P10LE | Pixel::YUV420P10BE => Some(PixelFormat::Yuv420p10),
        Pixel::RGB24 => Some(PixelFormat::Rgb24),
        Pixel::BGR24 => Some(PixelFormat::Bgr24),
        Pixel::RGBA => Some(PixelFormat::Rgba),
        Pixel::BGRA => Some(PixelFormat::Bgra),
        _ => None,
    }
}

/**
    Convert our PixelFormat to the ffmpeg-next pixel format.
*/
pub fn pixel_format_to_ffmpeg(format: PixelFormat) -> Pixel {
    match format {
        PixelFormat::Yuv420p => Pixel::YUV420P,
        PixelFormat::Nv12 => Pixel::NV12,
        PixelFormat::Yuv422p => Pixel::YUV422P,
        PixelFormat::Yuv444p => Pixel::YUV444P,
        PixelFormat::Yuv420p10 => Pixel::YUV420P10LE,
        PixelFormat::Rgb24 => Pixel::RGB24,
        PixelFormat::Bgr24 => Pixel::BGR24,
        PixelFormat::Rgba => Pixel::RGBA,
        PixelFormat::Bgra => Pixel::BGRA,
    }
}
