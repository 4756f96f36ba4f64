/*!
    Video frame transformation.
*/

use ffmpeg_next::{
    format::Pixel,
    software::scaling::{context::Context as ScalerContext, flag::Flags as ScalerFlags},
    util::frame::video::Video as VideoFrameFFmpeg,
};

use ffmpeg_source::pixel_format_to_ffmpeg;
use ffmpeg_types::{Error, PixelFormat, Result};

/**
    Scaling algorithm used when the scaler has to resample.

    Only matters when a source frame's size differs from the target size;
    same-size layout conversion is exact regardless.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScalingAlgorithm {
    /// Nearest neighbor - fastest, lowest quality.
    Nearest,
    /// Bilinear interpolation - fast, acceptable quality.
    Bilinear,
    /// Bicubic interpolation - moderate speed, good quality.
    #[default]
    Bicubic,
    /// Lanczos resampling - slowest, highest quality.
    Lanczos,
}

impl ScalingAlgorithm {
    fn to_ffmpeg_flags(self) -> ScalerFlags {
        match self {
            Self::Nearest => ScalerFlags::POINT,
            Self::Bilinear => ScalerFlags::BILINEAR,
            Self::Bicubic => ScalerFlags::BICUBIC,
            Self::Lanczos => ScalerFlags::LANCZOS,
        }
    }
}

/**
    Target of a video transformation.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoTransformConfig {
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
    /// Target pixel layout. Must be a packed layout.
    pub format: PixelFormat,
    /// Scaling algorithm to use.
    pub algorithm: ScalingAlgorithm,
}

impl VideoTransformConfig {
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
            algorithm: ScalingAlgorithm::default(),
        }
    }

    /**
        Configuration for packed RGB24 output.
    */
    pub fn to_rgb24(width: u32, height: u32) -> Self {
        Self::new(width, height, PixelFormat::Rgb24)
    }

    pub fn with_algorithm(mut self, algorithm: ScalingAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /**
        Size in bytes of one converted frame.
    */
    pub fn frame_size(&self) -> Option<usize> {
        self.format.frame_size(self.width, self.height)
    }
}

/**
    Video frame transformer.

    Converts decoded frames into the configured packed layout and size,
    writing tightly packed rows (no stride padding) into a caller-supplied
    buffer of exactly [`frame_size`](VideoTransform::frame_size) bytes.

    The scaler is built up front for the stream's declared source format and
    rebuilt if a frame arrives with a different size or layout. The target
    never changes, so the output size is fixed for the transformer's life.
*/
pub struct VideoTransform {
    config: VideoTransformConfig,
    scaler: ScalerState,
    /// Scaler output, reused across frames.
    output: VideoFrameFFmpeg,
    bytes_per_pixel: usize,
}

struct ScalerState {
    context: ScalerContext,
    src_width: u32,
    src_height: u32,
    src_format: Pixel,
}

// SAFETY: the scaler context and output frame are owned exclusively by this
// value and are only used through `&mut self`.
unsafe impl Send for VideoTransform {}

impl VideoTransform {
    /**
        Create a transformer for frames of the given native size and layout.

        Fails with [`Error::ConverterInit`] if the target is not a packed
        layout, either size is zero, or FFmpeg has no conversion path.
    */
    pub fn new(
        src_width: u32,
        src_height: u32,
        src_format: Pixel,
        config: VideoTransformConfig,
    ) -> Result<Self> {
        let bytes_per_pixel = config.format.bytes_per_pixel().ok_or_else(|| {
            Error::ConverterInit(format!("{:?} is not a packed output layout", config.format))
        })?;

        if config.width == 0 || config.height == 0 {
            return Err(Error::ConverterInit(format!(
                "invalid target dimensions {}x{}",
                config.width, config.height
            )));
        }

        let scaler = ScalerState::new(src_width, src_height, src_format, &config)
            .map_err(Error::ConverterInit)?;

        let output = VideoFrameFFmpeg::new(
            pixel_format_to_ffmpeg(config.format),
            config.width,
            config.height,
        );

        Ok(Self {
            config,
            scaler,
            output,
            bytes_per_pixel,
        })
    }

    /**
        Size in bytes of the buffer [`convert_into`](Self::convert_into) expects.
    */
    pub fn frame_size(&self) -> usize {
        self.config.width as usize * self.config.height as usize * self.bytes_per_pixel
    }

    /**
        Convert `frame` into `output`, overwriting its previous contents.

        Failures are scoped to this frame: the transformer remains usable.
    */
    pub fn convert_into(&mut self, frame: &VideoFrameFFmpeg, output: &mut [u8]) -> Result<()> {
        if output.len() != self.frame_size() {
            return Err(Error::conversion(format!(
                "output buffer is {} bytes, expected {}",
                output.len(),
                self.frame_size()
            )));
        }

        let (width, height, format) = (frame.width(), frame.height(), frame.format());
        if width == 0 || height == 0 {
            return Err(Error::conversion(format!(
                "frame has invalid dimensions {}x{}",
                width, height
            )));
        }
        if format == Pixel::None {
            return Err(Error::conversion("frame has unknown pixel format"));
        }

        if !self.scaler.matches(width, height, format) {
            log::debug!(
                "source changed to {:?} {}x{}, rebuilding scaler",
                format,
                width,
                height
            );
            self.scaler = ScalerState::new(width, height, format, &self.config)
                .map_err(Error::Conversion)?;
        }

        self.scaler
            .context
            .run(frame, &mut self.output)
            .map_err(|e| Error::conversion(format!("scaling failed: {}", e)))?;

        let row_bytes = self.config.width as usize * self.bytes_per_pixel;
        let stride = self.output.stride(0);
        let src = self.output.data(0);

        for (y, dst_row) in output.chunks_exact_mut(row_bytes).enumerate() {
            let start = y * stride;
            dst_row.copy_from_slice(&src[start..start + row_bytes]);
        }

        Ok(())
    }
}

impl ScalerState {
    fn new(
        src_width: u32,
        src_height: u32,
        src_format: Pixel,
        config: &VideoTransformConfig,
    ) -> std::result::Result<Self, String> {
        if src_width == 0 || src_height == 0 {
            return Err(format!(
                "invalid source dimensions {}x{}",
                src_width, src_height
            ));
        }

        let context = ScalerContext::get(
            src_format,
            src_width,
            src_height,
            pixel_format_to_ffmpeg(config.format),
            config.width,
            config.height,
            config.algorithm.to_ffmpeg_flags(),
        )
        .map_err(|e| {
            format!(
                "no conversion from {:?} {}x{} to {:?}: {}",
                src_format, src_width, src_height, config.format, e
            )
        })?;

        Ok(Self {
            context,
            src_width,
            src_height,
            src_format,
        })
    }

    fn matches(&self, width: u32, height: u32, format: Pixel) -> bool {
        self.src_width == width && self.src_height == height && self.src_format == format
    }
}

impl std::fmt::Debug for VideoTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoTransform")
            .field("config", &self.config)
            .field("src_format", &self.scaler.src_format)
            .field("src_width", &self.scaler.src_width)
            .field("src_height", &self.scaler.src_height)
            .finish_non_exhaustive()
    }
}
