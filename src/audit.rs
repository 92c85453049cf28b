use human_bytes::human_bytes;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// One entry in the audit tree.
///
/// `size` and `num_files` aggregate everything beneath the entry;
/// `children` holds only the entries that cleared the report threshold,
/// sorted by size descending.
#[derive(Debug, Clone, Serialize)]
pub struct AuditNode {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub num_files: u64,
    pub is_dir: bool,
    pub children: Vec<AuditNode>,
}

/// An entry the scan could not read. Recorded and skipped; it contributes
/// zero bytes to the totals.
#[derive(Debug, Clone, Serialize)]
pub struct AuditError {
    pub path: PathBuf,
    pub message: String,
}

/// The result of one audit walk.
#[derive(Debug, Serialize)]
pub struct AuditReport {
    pub root: AuditNode,
    pub errors: Vec<AuditError>,
}

/// Recursively audit `root`, aggregating file sizes bottom-up.
///
/// Single-threaded depth-first walk. Each file contributes its logical
/// size (`metadata.len()`); each directory the sum of its children, so
/// the root total equals the sum of all transitively contained regular
/// files. Entries smaller than `threshold` are aggregated but not listed
/// (threshold 0 lists everything). Unreadable entries land in
/// [`AuditReport::errors`] and the walk continues. A fresh call re-walks
/// from scratch.
pub fn audit(root: &Path, threshold: u64) -> Result<AuditReport> {
    if !root.exists() {
        return Err(Error::NotFound(root.to_path_buf()));
    }

    let mut errors = Vec::new();
    let root_node = if root.is_dir() {
        scan_directory(root, threshold, &mut errors)
    } else {
        let size = match std::fs::metadata(root) {
            Ok(md) => md.len(),
            Err(e) => {
                record_error(&mut errors, root, &e);
                0
            }
        };
        AuditNode {
            path: root.to_path_buf(),
            name: entry_name(root),
            size,
            num_files: 1,
            is_dir: false,
            children: Vec::new(),
        }
    };

    Ok(AuditReport {
        root: root_node,
        errors,
    })
}

fn scan_directory(path: &Path, threshold: u64, errors: &mut Vec<AuditError>) -> AuditNode {
    let mut node = AuditNode {
        path: path.to_path_buf(),
        name: entry_name(path),
        size: 0,
        num_files: 0,
        is_dir: true,
        children: Vec::new(),
    };

    let entries = match std::fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            record_error(errors, path, &e);
            return node;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                record_error(errors, path, &e);
                continue;
            }
        };
        let entry_path = entry.path();

        let file_type = match entry.file_type() {
            Ok(ft) => ft,
            Err(e) => {
                record_error(errors, &entry_path, &e);
                continue;
            }
        };

        if file_type.is_dir() {
            let child = scan_directory(&entry_path, threshold, errors);
            node.size += child.size;
            node.num_files += child.num_files;
            if child.size >= threshold {
                node.children.push(child);
            }
            continue;
        }

        // Resolves symlinks; a dangling link becomes an error entry.
        let metadata = match std::fs::metadata(&entry_path) {
            Ok(md) => md,
            Err(e) => {
                record_error(errors, &entry_path, &e);
                continue;
            }
        };
        if !metadata.is_file() {
            // Symlinked directories are not followed; a cycle through one
            // would never terminate.
            continue;
        }

        let size = metadata.len();
        node.size += size;
        node.num_files += 1;
        if size >= threshold {
            node.children.push(AuditNode {
                path: entry_path.clone(),
                name: entry_name(&entry_path),
                size,
                num_files: 1,
                is_dir: false,
                children: Vec::new(),
            });
        }
    }

    node.children.sort_by(|a, b| b.size.cmp(&a.size));
    node
}

fn record_error(errors: &mut Vec<AuditError>, path: &Path, err: &std::io::Error) {
    log::warn!("Cannot read {}: {err}", path.display());
    errors.push(AuditError {
        path: path.to_path_buf(),
        message: err.to_string(),
    });
}

fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

impl AuditReport {
    /// Render the report as an indented tree, largest entries first,
    /// with unreadable entries listed at the end.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} - {} ({})",
            self.root.path.display(),
            human_bytes(self.root.size as f64),
            file_count(self.root.num_files),
        );
        for child in &self.root.children {
            render_node(child, 1, &mut out);
        }

        if !self.errors.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Unreadable entries:");
            for err in &self.errors {
                let _ = writeln!(out, "    {}: {}", err.path.display(), err.message);
            }
        }

        out
    }
}

fn render_node(node: &AuditNode, depth: usize, out: &mut String) {
    let indent = "    ".repeat(depth);
    if node.is_dir {
        let _ = writeln!(
            out,
            "{indent}{} - {} ({})",
            node.name,
            human_bytes(node.size as f64),
            file_count(node.num_files),
        );
    } else {
        let _ = writeln!(
            out,
            "{indent}{} - {}",
            node.name,
            human_bytes(node.size as f64),
        );
    }
    for child in &node.children {
        render_node(child, depth + 1, out);
    }
}

fn file_count(n: u64) -> String {
    if n == 1 {
        "1 file".to_string()
    } else {
        format!("{n} files")
    }
}
