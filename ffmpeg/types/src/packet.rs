/*!
    Compressed packets.
*/

use crate::Pts;

/**
    One unit of compressed data read from a container.

    Tagged with the index of the stream it belongs to. Packets are transient:
    they are handed to a decoder or dropped right after being read.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Packet {
    pub stream_index: usize,
    pub data: Vec<u8>,
    pub pts: Option<Pts>,
    pub dts: Option<Pts>,
    /// Duration in stream time base units (0 if unknown).
    pub duration: i64,
    pub is_keyframe: bool,
}

impl Packet {
    pub fn new(stream_index: usize, data: Vec<u8>) -> Self {
        Self {
            stream_index,
            data,
            pts: None,
            dts: None,
            duration: 0,
            is_keyframe: false,
        }
    }

    pub fn with_pts(mut self, pts: i64) -> Self {
        self.pts = Some(Pts(pts));
        self
    }

    pub fn with_keyframe(mut self, is_keyframe: bool) -> Self {
        self.is_keyframe = is_keyframe;
        self
    }
}
