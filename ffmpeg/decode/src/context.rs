use ffmpeg_next::codec::{self, decoder::Opened};

use ffmpeg_source::CodecConfig;
use ffmpeg_types::{CodecId, Error, Rational, Result};

/**
    Check that FFmpeg has a decoder for the stream, without opening it.

    Fails with [`Error::UnsupportedCodec`].
*/
pub fn find_decoder(config: &CodecConfig) -> Result<()> {
    codec::decoder::find(config.raw_id())
        .map(|_| ())
        .ok_or_else(|| Error::UnsupportedCodec {
            codec: config.codec().to_string(),
        })
}

/**
    Find and open a decoder for the given stream parameters.

    A missing decoder is reported separately from one that exists but
    rejects the parameters.
*/
pub(crate) fn open_decoder(config: CodecConfig) -> Result<(Opened, CodecId, Rational)> {
    let codec_id = config.codec().clone();
    let time_base = config.time_base();
    let parameters = config.into_parameters();

    let codec = codec::decoder::find(parameters.id()).ok_or_else(|| Error::UnsupportedCodec {
        codec: codec_id.to_string(),
    })?;

    let init_failed = |e: ffmpeg_next::Error| Error::DecoderInit {
        codec: codec_id.to_string(),
        reason: e.to_string(),
    };

    let context = codec::context::Context::from_parameters(parameters).map_err(init_failed)?;
    let opened = context.decoder().open_as(codec).map_err(init_failed)?;

    Ok((opened, codec_id, time_base))
}
