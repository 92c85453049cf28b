//! EXIF date-field reading and writing for JPG photos.
//!
//! Two entry points:
//!
//! - [`read_capture_data`] — snapshot a photo's date and camera fields
//! - [`write_date_fields`] — rewrite date fields in place, preserving
//!   every other JPEG segment

mod reader;
mod writer;

pub use reader::{CaptureData, read_capture_data};
pub use writer::{DateWrite, write_date_fields};
