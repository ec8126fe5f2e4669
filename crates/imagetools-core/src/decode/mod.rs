//! Image decoding for the editor.
//!
//! This module provides functionality for:
//! - Sniffing the input container (PNG or JPEG only)
//! - Decoding into a straight-alpha RGBA buffer
//! - Applying EXIF orientation so the buffer matches the browser preview
//!
//! # Architecture
//!
//! Decoding happens once, when a file is accepted. The resulting buffer is
//! read-only for the rest of the session and every export renders from it.
//!
//! # Examples
//!
//! ```ignore
//! use imagetools_core::decode::decode_image;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod reader;
mod types;

pub use reader::{decode_image, detect_format};
pub use types::{DecodeError, DecodedImage, Orientation, SourceFormat, BYTES_PER_PIXEL};
