/*!
    Container opening, stream probing and demuxing.

    This crate handles the input side of the pipeline. It opens a media file,
    describes its elementary streams and produces compressed packets that the
    decode crate turns into frames.
*/

mod codec_config;
mod convert;
mod source;

pub use codec_config::CodecConfig;
pub use convert::{pixel_format_from_ffmpeg, pixel_format_to_ffmpeg};
pub use source::Source;
