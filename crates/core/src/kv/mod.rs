//! Key-value persistence seam.
//!
//! The journal keeps its whole state in a handful of keyed JSON blobs, the way a
//! browser's local storage would. Storage crates implement [`KeyValueStoreTrait`].

mod kv_traits;

pub use kv_traits::KeyValueStoreTrait;
