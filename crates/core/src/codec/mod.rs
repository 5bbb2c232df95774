//! Codec - turns uploads into what the store persists.
//!
//! Pasted images become bounded JPEG data URLs, uploaded ledgers become text.

mod image_codec;
mod text_codec;

pub use image_codec::{
    compress_image, decode_data_url, downscale_factor, estimate_encoded_size, target_dimensions,
    CompressOptions, CompressedImage,
};
pub use text_codec::{decode_utf8_lossy, read_as_text};
