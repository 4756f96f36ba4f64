/*!
    Packet decoding.

    Turns compressed packets into raw frames. One decoder wraps one codec
    context and is reused for every packet of its stream.
*/

mod audio;
mod context;
mod video;

pub use audio::AudioDecoder;
pub use context::find_decoder;
pub use video::VideoDecoder;
