use ffmpeg_transform::ScalingAlgorithm;
use ffmpeg_types::PixelFormat;

const DEFAULT_THREAD_NAME: &str = "vidsession-playback";

/**
    Configuration for loading a session.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Layout of the converted frame buffer. Must be a packed layout.
    pub output_format: PixelFormat,
    /// Resampling quality, only relevant if the source changes size mid-stream.
    pub scaling: ScalingAlgorithm,
    /// Name of the playback thread.
    pub thread_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            output_format: PixelFormat::Rgb24,
            scaling: ScalingAlgorithm::Bicubic,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }
}

impl SessionConfig {
    pub fn with_output_format(mut self, format: PixelFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_scaling(mut self, scaling: ScalingAlgorithm) -> Self {
        self.scaling = scaling;
        self
    }

    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}
