pub mod image_io;
pub mod mrc;
pub mod mrc_writer;
pub mod output;
pub mod source;
pub mod tiff_stack;

pub use output::{save_sequence, OutputFormat};
pub use source::{
    load_sequence, load_sequence_with_progress, FileCodec, FrameDecoder, InputSource,
};
