use img_parts::Bytes;
use img_parts::ImageEXIF;
use img_parts::jpeg::Jpeg;
use little_exif::exif_tag::ExifTag;
use little_exif::filetype::FileExtension;
use little_exif::metadata::Metadata;
use std::path::Path;

use crate::error::{Error, Result};

// little_exif as_u8_vec(JPEG) returns: [APP1 marker 2B][length 2B][Exif\0\0 6B][TIFF data]
// img-parts set_exif() expects just the TIFF data (after Exif\0\0)
const JPEG_EXIF_OVERHEAD: usize = 10; // 2 + 2 + 6

/// The date fields to write into a photo. `None` fields are left as-is.
///
/// Values are EXIF-form strings (`YYYY:MM:DD HH:MM:SS`), normally produced
/// by [`CaptureDateTime::exif_string`](crate::datetime::CaptureDateTime::exif_string).
#[derive(Debug, Clone, Default)]
pub struct DateWrite {
    /// DateTimeOriginal — the capture date.
    pub date_time_original: Option<String>,
    /// CreateDate (DateTimeDigitized).
    pub create_date: Option<String>,
    /// ModifyDate (the IFD0 DateTime field).
    pub modify_date: Option<String>,
}

impl DateWrite {
    pub fn is_empty(&self) -> bool {
        self.date_time_original.is_none()
            && self.create_date.is_none()
            && self.modify_date.is_none()
    }

    fn tags(&self) -> Vec<ExifTag> {
        let mut tags = Vec::new();
        if let Some(ref v) = self.date_time_original {
            tags.push(ExifTag::DateTimeOriginal(v.clone()));
        }
        if let Some(ref v) = self.create_date {
            tags.push(ExifTag::CreateDate(v.clone()));
        }
        if let Some(ref v) = self.modify_date {
            tags.push(ExifTag::ModifyDate(v.clone()));
        }
        tags
    }
}

/// Load existing EXIF metadata from a file path using little_exif.
/// Returns None if it can't parse (instead of losing data).
fn load_existing_metadata(path: &Path) -> Option<Metadata> {
    let path_owned = path.to_path_buf();
    // Suppress panics from little_exif
    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(|_| {}));
    let result = std::panic::catch_unwind(move || Metadata::new_from_path(&path_owned));
    std::panic::set_hook(prev_hook);

    match result {
        Ok(Ok(m)) => {
            if m.data().is_empty() {
                log::debug!("little_exif loaded empty metadata");
                None
            } else {
                log::debug!("little_exif loaded {} existing EXIF tags", m.data().len());
                Some(m)
            }
        }
        Ok(Err(e)) => {
            log::debug!("little_exif could not parse EXIF: {e}");
            None
        }
        Err(_) => {
            log::debug!("little_exif panicked parsing EXIF");
            None
        }
    }
}

/// Write date fields into a JPEG file, preserving all other data.
///
/// Strategy:
/// 1. Read the entire JPEG with img-parts (preserves all segments)
/// 2. Load existing EXIF with little_exif and merge the date tags
/// 3. Write back via img-parts (only the APP1 EXIF segment changes)
///
/// A file whose EXIF segment exists but cannot be parsed is refused: a
/// merge the library cannot see would drop every tag outside the merge
/// set.
pub fn write_date_fields(path: &Path, write: &DateWrite) -> Result<()> {
    if write.is_empty() {
        return Ok(());
    }

    let file_bytes = std::fs::read(path).map_err(|e| Error::from_io(e, path))?;

    // Parse JPEG structure with img-parts (preserves all segments)
    let mut jpeg = Jpeg::from_bytes(Bytes::from(file_bytes)).map_err(|e| Error::NotAJpeg {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    // Remember where the EXIF segment was originally positioned
    let orig_exif_pos = find_exif_segment_pos(&jpeg);
    let original_exif = jpeg.exif().unwrap_or_default();

    let mut metadata = match load_existing_metadata(path) {
        Some(m) => m,
        None if original_exif.is_empty() => Metadata::new(),
        None => {
            return Err(Error::NotAJpeg {
                path: path.to_path_buf(),
                reason: "existing EXIF segment could not be parsed; refusing to rewrite it"
                    .to_string(),
            });
        }
    };

    for tag in write.tags() {
        metadata.set_tag(tag);
    }

    let exif_bytes = metadata.as_u8_vec(FileExtension::JPEG);
    if exif_bytes.len() <= JPEG_EXIF_OVERHEAD {
        log::debug!("serialized EXIF is empty, nothing to write");
        return Ok(());
    }
    let tiff_data = exif_bytes[JPEG_EXIF_OVERHEAD..].to_vec();

    jpeg.set_exif(Some(Bytes::from(tiff_data)));

    // set_exif() inserts at position 3, which may be after XMP APP1.
    // Move the EXIF segment back to its original position so EXIF comes
    // before XMP (required for many EXIF parsers).
    if let Some(new_pos) = find_exif_segment_pos(&jpeg) {
        let target_pos = orig_exif_pos.unwrap_or(1); // default: right after APP0
        if new_pos != target_pos && target_pos < new_pos {
            let segments = jpeg.segments_mut();
            let seg = segments.remove(new_pos);
            segments.insert(target_pos, seg);
        }
    }

    let output = jpeg.encoder().bytes();
    std::fs::write(path, &output).map_err(|e| Error::from_io(e, path))?;

    Ok(())
}

/// Find the position of the EXIF APP1 segment in a JPEG.
/// EXIF segments have marker 0xE1 (APP1) and contents starting with "Exif\0\0".
fn find_exif_segment_pos(jpeg: &Jpeg) -> Option<usize> {
    const EXIF_PREFIX: &[u8] = b"Exif\0\0";
    jpeg.segments()
        .iter()
        .position(|s| s.marker() == 0xE1 && s.contents().starts_with(EXIF_PREFIX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn full_write() -> DateWrite {
        DateWrite {
            date_time_original: Some("2021:06:15 08:30:00".to_string()),
            create_date: Some("2021:06:15 08:30:00".to_string()),
            modify_date: Some("2021:06:15 08:30:00".to_string()),
        }
    }

    #[test]
    fn empty_write_is_a_no_op() {
        // Never opens the path, so even a missing file is fine.
        write_date_fields(Path::new("/nonexistent.jpg"), &DateWrite::default()).unwrap();
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = write_date_fields(Path::new("/nonexistent/photo.jpg"), &full_write());
        assert!(matches!(err, Err(Error::NotFound(_))));
    }

    #[test]
    fn non_jpeg_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("not-a-photo.jpg");
        fs::write(&path, b"plain text pretending to be a photo").unwrap();

        let err = write_date_fields(&path, &full_write());
        assert!(matches!(err, Err(Error::NotAJpeg { .. })));
        // The file itself must be untouched.
        assert_eq!(
            fs::read(&path).unwrap(),
            b"plain text pretending to be a photo"
        );
    }

    #[test]
    fn date_write_tags_match_fields() {
        let write = DateWrite {
            date_time_original: Some("2020:01:01 10:00:00".to_string()),
            ..Default::default()
        };
        assert_eq!(write.tags().len(), 1);
        assert!(!write.is_empty());
        assert!(DateWrite::default().is_empty());
    }
}
