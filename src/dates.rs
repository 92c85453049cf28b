use std::path::{Path, PathBuf};

use crate::datetime::CaptureDateTime;
use crate::error::{Error, Result};
use crate::exif::{DateWrite, read_capture_data, write_date_fields};

/// Marker dropped next to a photo series whose times were approximated.
const APPROXIMATE_MARKER: &str = "times-approximate.txt";

/// Options for a capture-date edit.
#[derive(Debug, Clone, Default)]
pub struct DateEditOptions {
    /// Seconds between consecutive photos in a multi-file edit. The first
    /// file gets the given timestamp, each subsequent file the previous
    /// one plus the interval.
    pub interval_secs: Option<i64>,
    /// Drop a marker file recording that the series' times are estimates.
    pub approximate: bool,
    /// Create a `.bak` copy before the first write to each photo.
    pub backup: bool,
    /// Also update the ModifyDate field.
    pub set_modify_date: bool,
    /// Plan only; touch nothing.
    pub dry_run: bool,
}

/// A timestamp applied (or planned, under dry run) to one photo.
#[derive(Debug, Clone)]
pub struct AppliedDate {
    pub path: PathBuf,
    pub timestamp: CaptureDateTime,
}

/// Set the capture date of one or more photos.
///
/// This is a single operation, not a batch walk: the first failure —
/// unparseable file, I/O error, or an interval that would carry the
/// series past midnight — aborts immediately. Files already written
/// before the failure keep their new dates.
///
/// Writes DateTimeOriginal and CreateDate, plus ModifyDate when
/// configured, so viewers that read different fields agree.
pub fn set_capture_dates(
    paths: &[PathBuf],
    start: CaptureDateTime,
    opts: &DateEditOptions,
) -> Result<Vec<AppliedDate>> {
    let mut applied = Vec::with_capacity(paths.len());
    let mut timestamp = start;

    for (i, path) in paths.iter().enumerate() {
        if i > 0 {
            if let Some(interval) = opts.interval_secs {
                timestamp = timestamp.advance(interval)?;
            }
        }

        if !path.exists() {
            return Err(Error::NotFound(path.clone()));
        }

        if opts.dry_run {
            log::info!(
                "Would set capture date of {} to {timestamp}",
                path.display()
            );
        } else {
            if opts.backup {
                backup_file(path)?;
            }
            write_date_fields(path, &date_write(&timestamp, opts.set_modify_date))?;
            log::info!("Set capture date of {} to {timestamp}", path.display());
        }

        applied.push(AppliedDate {
            path: path.clone(),
            timestamp,
        });
    }

    if opts.approximate && !opts.dry_run {
        if let Some(first) = paths.first() {
            write_approximate_marker(first, opts.interval_secs)?;
        }
    }

    Ok(applied)
}

/// Copy a photo's capture date (DateTimeOriginal) into its CreateDate and
/// ModifyDate fields.
///
/// A single-file operation: any error aborts it. Returns the date that
/// was propagated.
pub fn copy_capture_date(path: &Path, opts: &DateEditOptions) -> Result<CaptureDateTime> {
    let data = read_capture_data(path)?;
    let date = data.capture_date(path)?;
    let raw = date.exif_string();

    if opts.dry_run {
        log::info!(
            "Would copy capture date {date} of {} to its other date fields",
            path.display()
        );
        return Ok(date);
    }

    if opts.backup {
        backup_file(path)?;
    }

    write_date_fields(
        path,
        &DateWrite {
            date_time_original: None,
            create_date: Some(raw.clone()),
            modify_date: Some(raw),
        },
    )?;
    log::info!(
        "Copied capture date {date} of {} to its other date fields",
        path.display()
    );

    Ok(date)
}

fn date_write(timestamp: &CaptureDateTime, set_modify_date: bool) -> DateWrite {
    let raw = timestamp.exif_string();
    DateWrite {
        date_time_original: Some(raw.clone()),
        create_date: Some(raw.clone()),
        modify_date: set_modify_date.then_some(raw),
    }
}

/// Create a backup of the original file.
fn backup_file(path: &Path) -> Result<PathBuf> {
    let backup_path = path.with_extension(format!(
        "{}.bak",
        path.extension().unwrap_or_default().to_string_lossy()
    ));

    if !backup_path.exists() {
        std::fs::copy(path, &backup_path).map_err(|e| Error::from_io(e, path))?;
        log::debug!("Backup created: {}", backup_path.display());
    }

    Ok(backup_path)
}

/// Record that the series' times were approximated, next to the photos.
fn write_approximate_marker(first_photo: &Path, interval_secs: Option<i64>) -> Result<()> {
    let dir = first_photo.parent().unwrap_or(Path::new("."));
    let marker = dir.join(APPROXIMATE_MARKER);
    let note = match interval_secs {
        Some(secs) => format!(
            "Times for these photos were approximated from a starting time, \
             spaced {secs} seconds apart.\n"
        ),
        None => "Times for these photos are approximate.\n".to_string(),
    };
    std::fs::write(&marker, note).map_err(|e| Error::from_io(e, &marker))?;
    log::info!("Wrote {}", marker.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn dry_run() -> DateEditOptions {
        DateEditOptions {
            dry_run: true,
            ..Default::default()
        }
    }

    fn fake_photos(dir: &TempDir, names: &[&str]) -> Vec<PathBuf> {
        names
            .iter()
            .map(|n| {
                let p = dir.path().join(n);
                fs::write(&p, b"fake").unwrap();
                p
            })
            .collect()
    }

    // ── set_capture_dates ────────────────────────────────────────────

    #[test]
    fn missing_photo_aborts() {
        let start = CaptureDateTime::parse("2021-06-15 08:30:00").unwrap();
        let err = set_capture_dates(&[PathBuf::from("/nonexistent.jpg")], start, &dry_run());
        assert!(matches!(err, Err(Error::NotFound(_))));
    }

    #[test]
    fn interval_spaces_timestamps() {
        let dir = TempDir::new().unwrap();
        let photos = fake_photos(&dir, &["a.jpg", "b.jpg", "c.jpg"]);

        let start = CaptureDateTime::parse("2020-01-01 10:00:00").unwrap();
        let opts = DateEditOptions {
            interval_secs: Some(60),
            ..dry_run()
        };
        let applied = set_capture_dates(&photos, start, &opts).unwrap();

        let stamps: Vec<String> = applied.iter().map(|a| a.timestamp.exif_string()).collect();
        assert_eq!(
            stamps,
            vec![
                "2020:01:01 10:00:00",
                "2020:01:01 10:01:00",
                "2020:01:01 10:02:00",
            ]
        );
    }

    #[test]
    fn interval_past_midnight_aborts() {
        let dir = TempDir::new().unwrap();
        let photos = fake_photos(&dir, &["a.jpg", "b.jpg"]);

        let start = CaptureDateTime::parse("2020-01-01 23:59:40").unwrap();
        let opts = DateEditOptions {
            interval_secs: Some(30),
            ..dry_run()
        };
        assert!(matches!(
            set_capture_dates(&photos, start, &opts),
            Err(Error::InvalidDate(_))
        ));
    }

    #[test]
    fn no_interval_applies_same_timestamp() {
        let dir = TempDir::new().unwrap();
        let photos = fake_photos(&dir, &["a.jpg", "b.jpg"]);

        let start = CaptureDateTime::parse("2021-06-15 08:30:00").unwrap();
        let applied = set_capture_dates(&photos, start, &dry_run()).unwrap();
        assert_eq!(applied.len(), 2);
        assert!(applied.iter().all(|a| a.timestamp == start));
    }

    #[test]
    fn dry_run_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let photos = fake_photos(&dir, &["a.jpg"]);

        let start = CaptureDateTime::parse("2021-06-15 08:30:00").unwrap();
        let opts = DateEditOptions {
            approximate: true,
            backup: true,
            ..dry_run()
        };
        set_capture_dates(&photos, start, &opts).unwrap();

        assert_eq!(fs::read(&photos[0]).unwrap(), b"fake");
        assert!(!dir.path().join("a.jpg.bak").exists());
        assert!(!dir.path().join(APPROXIMATE_MARKER).exists());
    }

    // ── copy_capture_date ────────────────────────────────────────────

    #[test]
    fn copy_from_non_photo_fails() {
        let dir = TempDir::new().unwrap();
        let photos = fake_photos(&dir, &["a.jpg"]);

        let err = copy_capture_date(&photos[0], &dry_run());
        assert!(err.is_err());
    }

    // ── helpers ──────────────────────────────────────────────────────

    #[test]
    fn backup_created_once() {
        let dir = TempDir::new().unwrap();
        let photo = dir.path().join("a.jpg");
        fs::write(&photo, b"original").unwrap();

        let bak = backup_file(&photo).unwrap();
        assert_eq!(bak, dir.path().join("a.jpg.bak"));
        assert_eq!(fs::read(&bak).unwrap(), b"original");

        // A second backup must not clobber the first.
        fs::write(&photo, b"modified").unwrap();
        backup_file(&photo).unwrap();
        assert_eq!(fs::read(&bak).unwrap(), b"original");
    }

    #[test]
    fn approximate_marker_notes_interval() {
        let dir = TempDir::new().unwrap();
        let photo = dir.path().join("a.jpg");
        fs::write(&photo, b"fake").unwrap();

        write_approximate_marker(&photo, Some(15)).unwrap();
        let note = fs::read_to_string(dir.path().join(APPROXIMATE_MARKER)).unwrap();
        assert!(note.contains("15 seconds"));
    }
}
