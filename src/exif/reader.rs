use nom_exif::*;
use std::path::Path;

use crate::datetime::CaptureDateTime;
use crate::error::{Error, Result};

/// Date and camera metadata extracted from a photo.
///
/// Raw EXIF strings are kept as read; [`CaptureData::capture_date`]
/// parses the capture timestamp on demand.
#[derive(Debug, Clone, Default)]
pub struct CaptureData {
    /// DateTimeOriginal — when the photo was taken.
    pub date_time_original: Option<String>,
    /// CreateDate (DateTimeDigitized).
    pub create_date: Option<String>,
    /// ModifyDate (the IFD0 DateTime field).
    pub modify_date: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub software: Option<String>,
}

impl CaptureData {
    /// The parsed capture timestamp.
    ///
    /// `MissingCaptureDate` if the field is absent, `InvalidDate` if the
    /// stored string is malformed.
    pub fn capture_date(&self, path: &Path) -> Result<CaptureDateTime> {
        match &self.date_time_original {
            Some(raw) => CaptureDateTime::parse_exif(raw),
            None => Err(Error::MissingCaptureDate(path.to_path_buf())),
        }
    }
}

/// Read date and camera metadata from a photo file.
///
/// A file without an EXIF container yields a default (all-`None`)
/// snapshot rather than an error; callers decide whether a missing
/// capture date is fatal.
pub fn read_capture_data(path: &Path) -> Result<CaptureData> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    let mut parser = MediaParser::new();
    let ms = MediaSource::file_path(path).map_err(|e| Error::NotAJpeg {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let iter: ExifIter = match parser.parse(ms) {
        Ok(iter) => iter,
        Err(_) => {
            log::debug!("No EXIF data found in {}", path.display());
            return Ok(CaptureData::default());
        }
    };

    let exif: Exif = iter.into();

    let mut data = CaptureData::default();

    if let Some(val) = exif.get(ExifTag::DateTimeOriginal) {
        data.date_time_original = entry_to_string(val);
    }
    if let Some(val) = exif.get(ExifTag::CreateDate) {
        data.create_date = entry_to_string(val);
    }
    if let Some(val) = exif.get(ExifTag::ModifyDate) {
        data.modify_date = entry_to_string(val);
    }
    if let Some(val) = exif.get(ExifTag::Make) {
        data.make = entry_to_string(val);
    }
    if let Some(val) = exif.get(ExifTag::Model) {
        data.model = entry_to_string(val);
    }
    if let Some(val) = exif.get(ExifTag::Software) {
        data.software = entry_to_string(val);
    }

    Ok(data)
}

/// Convert an EntryValue to an Option<String>.
fn entry_to_string(val: &EntryValue) -> Option<String> {
    let s = val.to_string();
    let s = s.trim().trim_matches('"').to_string();
    if s.is_empty() { None } else { Some(s) }
}
