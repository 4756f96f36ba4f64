/*!
    Audio decoder.
*/

use ffmpeg_next::codec::decoder::Audio as AudioDecoderFFmpeg;

use ffmpeg_source::CodecConfig;
use ffmpeg_types::{CodecId, Error, Rational, Result};

use crate::context::open_decoder;

/**
    An opened audio decoder.

    Holds the codec context for the stream's lifetime. Sample output is not
    consumed by the pipeline yet.
*/
pub struct AudioDecoder {
    decoder: AudioDecoderFFmpeg,
    codec: CodecId,
    time_base: Rational,
}

// SAFETY: the codec context is owned exclusively by this value and is only
// used through `&mut self`.
unsafe impl Send for AudioDecoder {}

impl AudioDecoder {
    pub fn new(codec_config: CodecConfig) -> Result<Self> {
        let (opened, codec, time_base) = open_decoder(codec_config)?;

        let decoder = opened.audio().map_err(|e| Error::DecoderInit {
            codec: codec.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            decoder,
            codec,
            time_base,
        })
    }

    pub fn codec(&self) -> &CodecId {
        &self.codec
    }

    pub fn time_base(&self) -> Rational {
        self.time_base
    }

    pub fn sample_rate(&self) -> u32 {
        self.decoder.rate()
    }

    pub fn channels(&self) -> u16 {
        self.decoder.channels() as u16
    }
}

impl std::fmt::Debug for AudioDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioDecoder")
            .field("codec", &self.codec)
            .field("sample_rate", &self.sample_rate())
            .field("channels", &self.channels())
            .finish_non_exhaustive()
    }
}
