//! Client filename validation.

use crate::{Result, ShareError};

/// Sequences and characters that indicate a traversal attempt on any OS.
const TRAVERSAL_MARKERS: [&str; 3] = ["..", "/", "\\"];

/// Validate a client-supplied filename and return the on-disk basename.
///
/// The shared directory is flat, so a valid name is always its own final
/// path component. Any directory portion is a traversal marker and the whole
/// name is rejected rather than silently reduced. This is a containment
/// check: an accepted name is returned unchanged.
///
/// # Errors
///
/// Returns [`ShareError::InvalidPath`] if the name contains `..`, `/`, `\`
/// or a NUL byte, or if it is empty or `.`.
pub fn sanitize(raw: &str) -> Result<&str> {
    if TRAVERSAL_MARKERS.iter().any(|marker| raw.contains(marker)) {
        return Err(ShareError::InvalidPath);
    }

    if raw.is_empty() || raw == "." || raw.contains('\0') {
        return Err(ShareError::InvalidPath);
    }

    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names_unchanged() {
        for name in [
            "report.pdf",
            "photo 2024.jpg",
            ".bashrc",
            "archive.tar.gz",
            "日本語ファイル.txt",
            "no-extension",
            "a.b.c",
        ] {
            assert_eq!(sanitize(name).unwrap(), name);
        }
    }

    #[test]
    fn test_rejects_parent_reference() {
        for name in ["..", "../etc/passwd", "foo..bar", "file..", "..hidden"] {
            assert!(
                matches!(sanitize(name), Err(ShareError::InvalidPath)),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_separators() {
        for name in [
            "/",
            "/etc/passwd",
            "dir/file.txt",
            "file.txt/",
            "C:\\Windows\\system.ini",
            "dir\\file.txt",
        ] {
            assert!(
                matches!(sanitize(name), Err(ShareError::InvalidPath)),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_empty_and_dot() {
        assert!(matches!(sanitize(""), Err(ShareError::InvalidPath)));
        assert!(matches!(sanitize("."), Err(ShareError::InvalidPath)));
    }

    #[test]
    fn test_rejects_nul_byte() {
        assert!(matches!(
            sanitize("evil\0.txt"),
            Err(ShareError::InvalidPath)
        ));
    }

    #[test]
    fn test_single_dot_inside_name_allowed() {
        assert_eq!(sanitize("a.b").unwrap(), "a.b");
        assert!(sanitize("...").is_err());
    }
}
