//! # photokit
//!
//! Photo housekeeping toolkit — edit JPG capture dates, rename photos by
//! capture timestamp, and audit disk usage under a directory tree.
//!
//! ## Quick Start
//!
//! Each tool is a small synchronous engine; the CLI binary is a thin
//! wrapper around these calls:
//!
//! ```rust,no_run
//! use photokit::audit::audit;
//! use photokit::config::Config;
//! use photokit::datetime::CaptureDateTime;
//! use photokit::dates::{DateEditOptions, set_capture_dates};
//! use photokit::rename::{RenameOptions, rename_photos};
//! use std::path::{Path, PathBuf};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load(Some("config.json".as_ref()))?;
//!
//!     // 1. Stamp a capture date onto a photo
//!     let when = CaptureDateTime::parse("2021-06-15 08:30:00")?;
//!     let opts = DateEditOptions {
//!         backup: config.dates.backup_originals,
//!         set_modify_date: config.dates.set_modify_date,
//!         ..Default::default()
//!     };
//!     set_capture_dates(&[PathBuf::from("photo.jpg")], when, &opts)?;
//!
//!     // 2. Rename a directory of photos to their capture timestamps
//!     let opts = RenameOptions {
//!         recursive: config.rename.recursive,
//!         on_collision: config.rename.on_collision,
//!         on_missing_date: config.rename.on_missing_date,
//!         dry_run: false,
//!     };
//!     for outcome in rename_photos(Path::new("./photos"), &opts)? {
//!         println!("{:?}", outcome.action);
//!     }
//!
//!     // 3. Audit disk usage
//!     let report = audit(Path::new("./photos"), 0)?;
//!     print!("{}", report.render());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Lower-Level Usage
//!
//! The EXIF layer can be used directly:
//!
//! ```rust,no_run
//! use photokit::datetime::CaptureDateTime;
//! use photokit::exif::{DateWrite, read_capture_data, write_date_fields};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let path = Path::new("photo.jpg");
//!
//!     // Read the current date fields
//!     let data = read_capture_data(path)?;
//!     println!("Taken: {:?}", data.date_time_original);
//!
//!     // Write a new capture date back
//!     let when = CaptureDateTime::parse("2020-01-01 10:00:00")?;
//!     write_date_fields(
//!         path,
//!         &DateWrite {
//!             date_time_original: Some(when.exif_string()),
//!             create_date: Some(when.exif_string()),
//!             modify_date: None,
//!         },
//!     )?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`audit`] — recursive disk-usage report
//! - [`config`] — configuration types and loading/saving
//! - [`dates`] — capture-date editing (set, space by interval, copy)
//! - [`datetime`] — capture timestamp parsing and formatting
//! - [`error`] — the error taxonomy shared by all operations
//! - [`exif`] — EXIF date-field reading and writing
//! - [`rename`] — timestamp-based photo renaming
//! - [`scan`] — JPG collection walk

pub mod audit;
pub mod config;
pub mod dates;
pub mod datetime;
pub mod error;
pub mod exif;
pub mod rename;
pub mod scan;
