use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::{CollisionPolicy, MissingDatePolicy};
use crate::error::{Error, Result};
use crate::exif::read_capture_data;
use crate::scan::collect_photos;

/// Suffix ceiling for collision disambiguation. Hitting it means the
/// directory holds thousands of photos with the same capture minute.
const MAX_SUFFIX: u32 = 9999;

/// Options for a rename run.
#[derive(Debug, Clone)]
pub struct RenameOptions {
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Collision handling for derived names.
    pub on_collision: CollisionPolicy,
    /// Handling for photos without a capture date.
    pub on_missing_date: MissingDatePolicy,
    /// Plan only; touch nothing.
    pub dry_run: bool,
}

/// What happened to one photo during a rename run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenameAction {
    /// Renamed (or planned, under dry run).
    Renamed,
    /// Already carries its derived name.
    AlreadyNamed,
    /// Skipped by policy (missing date, or collision under `skip`).
    Skipped,
    /// Could not be processed.
    Failed,
}

/// Per-file record of a rename run.
#[derive(Debug, Clone, Serialize)]
pub struct RenameOutcome {
    pub source: PathBuf,
    pub target: Option<PathBuf>,
    pub action: RenameAction,
    /// Skip or failure reason, for the log and `--json` output.
    pub detail: Option<String>,
}

/// Rename every JPG in `dir` to its capture timestamp
/// (`YYYY-MM-DD HH-MM.jpg`).
///
/// Per-file problems never abort the walk: each file gets an outcome and
/// the run continues. The caller decides what a non-empty failure set
/// means for the exit status. Renames stay within each file's own
/// directory, and a target name is only used after it is verified free —
/// an existing file is never overwritten.
pub fn rename_photos(dir: &Path, opts: &RenameOptions) -> Result<Vec<RenameOutcome>> {
    if !dir.exists() {
        return Err(Error::NotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(Error::NotAJpeg {
            path: dir.to_path_buf(),
            reason: "rename expects a directory".to_string(),
        });
    }

    let photos = collect_photos(&[dir.to_path_buf()], opts.recursive);
    log::info!("Found {} photo(s) in {}", photos.len(), dir.display());

    // Names claimed during this run, so identical timestamps disambiguate
    // even under dry run where nothing lands on disk.
    let mut claimed: HashSet<PathBuf> = HashSet::new();
    let mut outcomes = Vec::with_capacity(photos.len());

    for photo in photos {
        let outcome = rename_one(&photo, opts, &mut claimed);
        log_outcome(&outcome, opts.dry_run);
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

/// Count of failed outcomes, for exit-status decisions.
pub fn failure_count(outcomes: &[RenameOutcome]) -> usize {
    outcomes
        .iter()
        .filter(|o| o.action == RenameAction::Failed)
        .count()
}

fn rename_one(
    photo: &Path,
    opts: &RenameOptions,
    claimed: &mut HashSet<PathBuf>,
) -> RenameOutcome {
    let data = match read_capture_data(photo) {
        Ok(data) => data,
        Err(e) => return failed(photo, e.to_string()),
    };

    let date = match data.capture_date(photo) {
        Ok(date) => date,
        Err(e @ Error::MissingCaptureDate(_)) => {
            return match opts.on_missing_date {
                MissingDatePolicy::Skip => skipped(photo, e.to_string()),
                MissingDatePolicy::Fail => failed(photo, e.to_string()),
            };
        }
        Err(e) => return failed(photo, e.to_string()),
    };

    let parent = photo.parent().unwrap_or(Path::new("."));
    let ext = photo
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_else(|| "jpg".to_string());
    let stem = date.file_stem();

    let base = parent.join(format!("{stem}.{ext}"));
    if base.as_path() == photo {
        claimed.insert(base);
        return RenameOutcome {
            source: photo.to_path_buf(),
            target: None,
            action: RenameAction::AlreadyNamed,
            detail: None,
        };
    }

    let target = match next_free_target(parent, &stem, &ext, opts.on_collision, |p| {
        p.exists() || claimed.contains(p)
    }) {
        Ok(Some(target)) => target,
        Ok(None) => return skipped(photo, format!("target {} already exists", base.display())),
        Err(e) => return failed(photo, e.to_string()),
    };

    if !opts.dry_run {
        if let Err(e) = std::fs::rename(photo, &target) {
            return failed(photo, Error::from_io(e, photo).to_string());
        }
    }
    claimed.insert(target.clone());

    RenameOutcome {
        source: photo.to_path_buf(),
        target: Some(target),
        action: RenameAction::Renamed,
        detail: None,
    }
}

/// Pick the first free name for `stem.ext` under `parent`.
///
/// `Ok(None)` means the base name is taken and policy says leave the file
/// alone. Suffix policy counts `" 2"`, `" 3"`, … after the stem.
fn next_free_target(
    parent: &Path,
    stem: &str,
    ext: &str,
    policy: CollisionPolicy,
    is_taken: impl Fn(&Path) -> bool,
) -> Result<Option<PathBuf>> {
    let base = parent.join(format!("{stem}.{ext}"));
    if !is_taken(&base) {
        return Ok(Some(base));
    }

    match policy {
        CollisionPolicy::Skip => Ok(None),
        CollisionPolicy::Suffix => {
            for n in 2..=MAX_SUFFIX {
                let candidate = parent.join(format!("{stem} {n}.{ext}"));
                if !is_taken(&candidate) {
                    return Ok(Some(candidate));
                }
            }
            Err(Error::RenameConflict(base))
        }
    }
}

fn skipped(photo: &Path, detail: String) -> RenameOutcome {
    RenameOutcome {
        source: photo.to_path_buf(),
        target: None,
        action: RenameAction::Skipped,
        detail: Some(detail),
    }
}

fn failed(photo: &Path, detail: String) -> RenameOutcome {
    RenameOutcome {
        source: photo.to_path_buf(),
        target: None,
        action: RenameAction::Failed,
        detail: Some(detail),
    }
}

fn log_outcome(outcome: &RenameOutcome, dry_run: bool) {
    match outcome.action {
        RenameAction::Renamed => {
            let target = outcome.target.as_deref().unwrap_or(Path::new("?"));
            if dry_run {
                log::info!(
                    "Would rename {} -> {}",
                    outcome.source.display(),
                    target.display()
                );
            } else {
                log::info!(
                    "Renamed {} -> {}",
                    outcome.source.display(),
                    target.display()
                );
            }
        }
        RenameAction::AlreadyNamed => {
            log::debug!("{} already named for its capture date", outcome.source.display());
        }
        RenameAction::Skipped => {
            log::warn!(
                "Skipped {}: {}",
                outcome.source.display(),
                outcome.detail.as_deref().unwrap_or("")
            );
        }
        RenameAction::Failed => {
            log::error!(
                "Failed {}: {}",
                outcome.source.display(),
                outcome.detail.as_deref().unwrap_or("")
            );
        }
    }
}
