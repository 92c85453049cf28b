use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions the renamer and date manager operate on.
const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Collect JPG files from the given paths.
///
/// Accepts a mix of file paths and directory paths. Directories are
/// enumerated one level deep by default; with `recursive` set they are
/// walked fully (following symlinks). Only `.jpg`/`.jpeg` files are
/// included. Entries that cannot be read are logged and skipped.
///
/// # Example
///
/// ```rust,no_run
/// use photokit::scan::collect_photos;
/// use std::path::PathBuf;
///
/// let photos = collect_photos(
///     &[
///         PathBuf::from("photo.jpg"),   // single file
///         PathBuf::from("./photos/"),   // entire directory
///     ],
///     false,
/// );
/// println!("Found {} photos", photos.len());
/// ```
pub fn collect_photos(paths: &[PathBuf], recursive: bool) -> Vec<PathBuf> {
    let mut photos = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_photo(path) {
                photos.push(path.clone());
            } else {
                log::warn!("Skipping non-JPG file: {}", path.display());
            }
        } else if path.is_dir() {
            let max_depth = if recursive { usize::MAX } else { 1 };
            for entry in WalkDir::new(path)
                .max_depth(max_depth)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let p = entry.path();
                if p.is_file() && is_photo(p) {
                    photos.push(p.to_path_buf());
                }
            }
        } else {
            log::warn!("Path does not exist: {}", path.display());
        }
    }

    photos.sort();
    photos
}

/// Check if a file has a JPG extension.
pub fn is_photo(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| PHOTO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // ── is_photo ─────────────────────────────────────────────────────

    #[test]
    fn photo_extensions_recognized() {
        assert!(is_photo(Path::new("photo.jpg")));
        assert!(is_photo(Path::new("photo.jpeg")));
        assert!(is_photo(Path::new("PHOTO.JPG")));
    }

    #[test]
    fn non_photo_extensions_rejected() {
        assert!(!is_photo(Path::new("doc.pdf")));
        assert!(!is_photo(Path::new("image.png")));
        assert!(!is_photo(Path::new("noext")));
    }

    // ── collect_photos ───────────────────────────────────────────────

    #[test]
    fn collect_single_file() {
        let dir = TempDir::new().unwrap();
        let jpg = dir.path().join("test.jpg");
        fs::write(&jpg, b"fake").unwrap();

        let photos = collect_photos(&[jpg.clone()], false);
        assert_eq!(photos, vec![jpg]);
    }

    #[test]
    fn collect_skips_non_photos() {
        let dir = TempDir::new().unwrap();
        let txt = dir.path().join("readme.txt");
        fs::write(&txt, b"hello").unwrap();

        let photos = collect_photos(&[txt], false);
        assert!(photos.is_empty());
    }

    #[test]
    fn collect_directory_top_level_only() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();

        fs::write(dir.path().join("a.jpg"), b"fake").unwrap();
        fs::write(sub.join("b.jpg"), b"fake").unwrap();

        let photos = collect_photos(&[dir.path().to_path_buf()], false);
        assert_eq!(photos.len(), 1);
        assert!(photos[0].ends_with("a.jpg"));
    }

    #[test]
    fn collect_directory_recursive() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();

        fs::write(dir.path().join("a.jpg"), b"fake").unwrap();
        fs::write(sub.join("b.jpeg"), b"fake").unwrap();
        fs::write(sub.join("c.txt"), b"fake").unwrap();

        let photos = collect_photos(&[dir.path().to_path_buf()], true);
        assert_eq!(photos.len(), 2);
    }

    #[test]
    fn collect_nonexistent_path() {
        let photos = collect_photos(&[PathBuf::from("/nonexistent/path")], false);
        assert!(photos.is_empty());
    }

    #[test]
    fn collect_mixed_files_and_dirs_sorted() {
        let dir = TempDir::new().unwrap();
        let jpg = dir.path().join("z.jpg");
        let sub = dir.path().join("folder");
        fs::create_dir(&sub).unwrap();
        fs::write(&jpg, b"fake").unwrap();
        fs::write(sub.join("a.jpg"), b"fake").unwrap();

        let photos = collect_photos(&[jpg.clone(), sub.clone()], false);
        assert_eq!(photos.len(), 2);
        assert!(photos[0].ends_with("folder/a.jpg"));
        assert!(photos[1].ends_with("z.jpg"));
    }
}
