/*!
    Pixel layout conversion.

    Converts decoded frames from their native layout into a fixed packed
    layout, writing into a caller-owned buffer that is reused for every frame.
*/

mod video;

pub use video::{ScalingAlgorithm, VideoTransform, VideoTransformConfig};
