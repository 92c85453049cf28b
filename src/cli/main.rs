use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use photokit::datetime::CaptureDateTime;
use photokit::rename::{RenameAction, failure_count};
use photokit::{audit, config, dates, exif, rename, scan};

#[derive(Parser, Debug)]
#[command(
    name = "photokit",
    version,
    about = "Photo housekeeping toolkit — edit JPG capture dates, rename photos by capture timestamp, and audit disk usage"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to config file (default: config.json next to binary)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Set the capture date of one or more photos
    SetDate {
        /// Photo files (or directories of photos) to stamp
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,

        /// The new date/time, e.g. "2021-06-15 08:30:00"
        #[arg(short, long)]
        date: String,

        /// Seconds between consecutive photos (first photo gets --date)
        #[arg(long, value_name = "SECS")]
        interval: Option<i64>,

        /// Record that the times are estimates in a marker file
        #[arg(long)]
        approximate: bool,

        /// Skip the .bak backup copies
        #[arg(long)]
        no_backup: bool,

        /// Preview changes without writing to files
        #[arg(long)]
        dry_run: bool,
    },

    /// Copy each photo's capture date into its other date fields
    CopyDate {
        /// Photo files (or directories of photos)
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,

        /// Skip the .bak backup copies
        #[arg(long)]
        no_backup: bool,

        /// Preview changes without writing to files
        #[arg(long)]
        dry_run: bool,
    },

    /// Rename photos in a directory to their capture timestamps
    Rename {
        /// The directory to rename photos in
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Preview renames without touching files
        #[arg(long)]
        dry_run: bool,
    },

    /// Report disk usage under a directory
    Audit {
        /// The directory to scan
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Hide entries below this many bytes (totals still include them)
        #[arg(short, long, value_name = "BYTES")]
        threshold: Option<u64>,

        /// Also write the report to a file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show date and camera metadata for photos
    Show {
        /// Photo files (or directories of photos)
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,
    },

    /// Write a default config.json and exit
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    if let Command::Init = cli.command {
        let config = config::Config::default();
        let path = cli.config.as_deref();
        config.save(path)?;
        let save_path = match path {
            Some(p) => p.to_path_buf(),
            None => config::Config::config_path()?,
        };
        println!("Default config written to {}", save_path.display());
        return Ok(());
    }

    let config = config::Config::load(cli.config.as_deref())?;

    let failures = match cli.command {
        Command::SetDate {
            paths,
            date,
            interval,
            approximate,
            no_backup,
            dry_run,
        } => run_set_date(
            &config, &paths, &date, interval, approximate, no_backup, dry_run, cli.json,
        )?,
        Command::CopyDate {
            paths,
            no_backup,
            dry_run,
        } => run_copy_date(&config, &paths, no_backup, dry_run, cli.json)?,
        Command::Rename {
            dir,
            recursive,
            dry_run,
        } => run_rename(&config, &dir, recursive, dry_run, cli.json)?,
        Command::Audit {
            dir,
            threshold,
            output,
        } => run_audit(&config, &dir, threshold, output.as_deref(), cli.json)?,
        Command::Show { paths } => run_show(&paths)?,
        Command::Init => unreachable!(),
    };

    if failures > 0 {
        log::error!("{failures} file(s) failed");
        std::process::exit(1);
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_set_date(
    config: &config::Config,
    paths: &[PathBuf],
    date: &str,
    interval: Option<i64>,
    approximate: bool,
    no_backup: bool,
    dry_run: bool,
    json: bool,
) -> Result<usize> {
    let start = CaptureDateTime::parse(date)?;
    let photos = scan::collect_photos(paths, false);
    if photos.is_empty() {
        anyhow::bail!("No JPG files found in the specified paths.");
    }

    let opts = dates::DateEditOptions {
        interval_secs: interval,
        approximate,
        backup: config.dates.backup_originals && !no_backup,
        set_modify_date: config.dates.set_modify_date,
        dry_run: dry_run || config.output.dry_run,
    };
    if opts.dry_run {
        log::info!("DRY RUN — no files will be modified");
    }

    let applied = dates::set_capture_dates(&photos, start, &opts)?;

    if json {
        let json_results: Vec<serde_json::Value> = applied
            .iter()
            .map(|a| {
                serde_json::json!({
                    "path": a.path.display().to_string(),
                    "timestamp": a.timestamp.to_string(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json_results)?);
    }

    log::info!("Done: {} photo(s) dated", applied.len());
    Ok(0)
}

fn run_copy_date(
    config: &config::Config,
    paths: &[PathBuf],
    no_backup: bool,
    dry_run: bool,
    json: bool,
) -> Result<usize> {
    let photos = scan::collect_photos(paths, false);
    if photos.is_empty() {
        anyhow::bail!("No JPG files found in the specified paths.");
    }

    let opts = dates::DateEditOptions {
        backup: config.dates.backup_originals && !no_backup,
        set_modify_date: config.dates.set_modify_date,
        dry_run: dry_run || config.output.dry_run,
        ..Default::default()
    };
    if opts.dry_run {
        log::info!("DRY RUN — no files will be modified");
    }

    let mut results = Vec::new();
    let mut failures = 0;
    for photo in &photos {
        match dates::copy_capture_date(photo, &opts) {
            Ok(date) => results.push(serde_json::json!({
                "path": photo.display().to_string(),
                "capture_date": date.to_string(),
                "error": serde_json::Value::Null,
            })),
            Err(e) => {
                log::error!("{e}");
                failures += 1;
                results.push(serde_json::json!({
                    "path": photo.display().to_string(),
                    "capture_date": serde_json::Value::Null,
                    "error": e.to_string(),
                }));
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }

    log::info!(
        "Done: {} succeeded, {failures} failed out of {} photos",
        photos.len() - failures,
        photos.len()
    );
    Ok(failures)
}

fn run_rename(
    config: &config::Config,
    dir: &std::path::Path,
    recursive: bool,
    dry_run: bool,
    json: bool,
) -> Result<usize> {
    let opts = rename::RenameOptions {
        recursive: recursive || config.rename.recursive,
        on_collision: config.rename.on_collision,
        on_missing_date: config.rename.on_missing_date,
        dry_run: dry_run || config.output.dry_run,
    };
    if opts.dry_run {
        log::info!("DRY RUN — no files will be renamed");
    }

    let outcomes = rename::rename_photos(dir, &opts)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    }

    let renamed = outcomes
        .iter()
        .filter(|o| o.action == RenameAction::Renamed)
        .count();
    let skipped = outcomes
        .iter()
        .filter(|o| {
            o.action == RenameAction::Skipped || o.action == RenameAction::AlreadyNamed
        })
        .count();
    let failures = failure_count(&outcomes);
    log::info!(
        "Done: {renamed} renamed, {skipped} skipped, {failures} failed out of {} photos",
        outcomes.len()
    );
    Ok(failures)
}

fn run_audit(
    config: &config::Config,
    dir: &std::path::Path,
    threshold: Option<u64>,
    output: Option<&std::path::Path>,
    json: bool,
) -> Result<usize> {
    let threshold = threshold.unwrap_or(config.audit.threshold_bytes);
    let report = audit::audit(dir, threshold)?;

    let text = if json {
        serde_json::to_string_pretty(&report)?
    } else {
        report.render()
    };
    println!("{text}");

    if let Some(out_path) = output {
        std::fs::write(out_path, &text)?;
        log::info!("Report written to {}", out_path.display());
    }

    Ok(report.errors.len())
}

fn run_show(paths: &[PathBuf]) -> Result<usize> {
    let photos = scan::collect_photos(paths, false);
    if photos.is_empty() {
        anyhow::bail!("No JPG files found in the specified paths.");
    }

    let mut failures = 0;
    for photo in &photos {
        match exif::read_capture_data(photo) {
            Ok(data) => print_capture_data(photo, &data),
            Err(e) => {
                log::error!("{e}");
                failures += 1;
            }
        }
    }
    Ok(failures)
}

// ANSI color codes
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

/// Print a photo's date and camera metadata, organized by section.
fn print_capture_data(path: &std::path::Path, data: &exif::CaptureData) {
    println!();
    println!("{BOLD}File:{RESET} {}", path.display());
    println!("{DIM}{}{RESET}", "═".repeat(72));

    let date_fields: Vec<(&str, Option<&str>)> = vec![
        ("DateTimeOriginal", data.date_time_original.as_deref()),
        ("CreateDate", data.create_date.as_deref()),
        ("ModifyDate", data.modify_date.as_deref()),
    ];
    if date_fields.iter().any(|(_, v)| v.is_some()) {
        println!("  {BOLD}Dates{RESET}");
        println!("  {DIM}{}{RESET}", "─".repeat(70));
        for (tag, val) in &date_fields {
            if let Some(v) = val {
                print_row(tag, v);
            }
        }
        println!();
    }

    let camera_fields: Vec<(&str, Option<&str>)> = vec![
        ("Make", data.make.as_deref()),
        ("Model", data.model.as_deref()),
        ("Software", data.software.as_deref()),
    ];
    if camera_fields.iter().any(|(_, v)| v.is_some()) {
        println!("  {BOLD}Camera / Device{RESET}");
        println!("  {DIM}{}{RESET}", "─".repeat(70));
        for (tag, val) in &camera_fields {
            if let Some(v) = val {
                print_row(tag, v);
            }
        }
        println!();
    }

    let has_any = date_fields.iter().any(|(_, v)| v.is_some())
        || camera_fields.iter().any(|(_, v)| v.is_some());
    if !has_any {
        println!("  {DIM}(no date metadata found){RESET}");
        println!();
    }
}

/// Print a single row in the metadata display table.
fn print_row(tag: &str, val: &str) {
    let tag_col = format!("{:<22}", tag);
    println!("  {tag_col} : {val}");
}
