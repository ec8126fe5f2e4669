//! Image Tools Core - crop, rotate, and resize library
//!
//! This crate provides the processing behind the browser image editor:
//! decoding uploads, rendering the framed crop of a rotated image,
//! resizing it to the requested dimensions, and encoding the download.
//! The editing session and its input controls live here too, so the UI
//! layer only forwards events.

pub mod config;
pub mod controls;
pub mod decode;
pub mod encode;
pub mod export;
pub mod session;
pub mod transform;

pub use config::EditorConfig;
pub use decode::{decode_image, DecodeError, DecodedImage};
pub use encode::{encode, EncodeError, EncodedImage, OutputFormat};
pub use export::{export_image, ExportError, ExportRequest, ExportedFile};
pub use session::{EditorEvent, EditorSession};
pub use transform::{
    render_crop, resample, rotated_bounding_box, FilterType, Flip, PixelCrop, SurfaceError,
    SurfaceLimits,
};

/// Crate version, for display in the UI footer.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
