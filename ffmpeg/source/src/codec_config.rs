/*!
    Opaque codec configuration for passing to decoders.
*/

use ffmpeg_next::codec;

use ffmpeg_types::{CodecId, Rational};

use crate::convert::codec_id_from_ffmpeg;

/**
    Codec parameters of one stream, as found by probing.

    Hides the ffmpeg-next parameter type behind a small API. Pass this to
    `ffmpeg-decode` to open a decoder for the stream.
*/
#[derive(Clone)]
pub struct CodecConfig {
    parameters: codec::Parameters,
    codec: CodecId,
    time_base: Rational,
}

impl CodecConfig {
    pub(crate) fn new(parameters: codec::Parameters, codec: CodecId, time_base: Rational) -> Self {
        Self {
            parameters,
            codec,
            time_base,
        }
    }

    /**
        Wrap parameters that did not come from a probed container.

        Useful for elementary streams whose parameters are known up front.
    */
    pub fn from_parameters(parameters: codec::Parameters, time_base: Rational) -> Self {
        let codec = codec_id_from_ffmpeg(parameters.id());
        Self::new(parameters, codec, time_base)
    }

    pub fn codec(&self) -> &CodecId {
        &self.codec
    }

    pub fn time_base(&self) -> Rational {
        self.time_base
    }

    /**
        FFmpeg's identifier for the codec, for decoder lookup.
    */
    pub fn raw_id(&self) -> codec::Id {
        self.parameters.id()
    }

    /**
        Consume the config, returning the raw parameters for the decoder.
    */
    pub fn into_parameters(self) -> codec::Parameters {
        self.parameters
    }
}

impl std::fmt::Debug for CodecConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecConfig")
            .field("codec", &self.codec)
            .field("time_base", &self.time_base)
            .finish_non_exhaustive()
    }
}
