use std::path::{Path, PathBuf};

use crate::foundation::error::{ReelError, ReelResult};

/// Well-known monospace font locations probed when no explicit path is given.
const CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/truetype/liberation2/LiberationMono-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/truetype/ubuntu/UbuntuMono-R.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansMono-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeMono.ttf",
    "/System/Library/Fonts/Menlo.ttc",
    "/System/Library/Fonts/Monaco.ttf",
    "C:\\Windows\\Fonts\\consola.ttf",
];

/// Resolve the monospace font file to use for a run.
///
/// An explicit path must exist; otherwise well-known locations are probed and,
/// failing that, the system font tree is scanned for a monospace face. Font
/// resolution failure is fatal before any frame is produced.
pub fn resolve_font_path(explicit: Option<&Path>) -> ReelResult<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(ReelError::font(format!(
            "font file '{}' does not exist",
            path.display()
        )));
    }

    for candidate in CANDIDATES {
        let path = Path::new(candidate);
        if path.exists() {
            return Ok(path.to_path_buf());
        }
    }

    if let Some(found) = scan_for_monospace(Path::new("/usr/share/fonts")) {
        return Ok(found);
    }

    Err(ReelError::font(
        "no monospace font found; pass an explicit font path",
    ))
}

/// Read the resolved font file into memory.
pub fn load_font_bytes(explicit: Option<&Path>) -> ReelResult<Vec<u8>> {
    let path = resolve_font_path(explicit)?;
    std::fs::read(&path)
        .map_err(|e| ReelError::font(format!("failed to read font '{}': {e}", path.display())))
}

fn scan_for_monospace(dir: &Path) -> Option<PathBuf> {
    let entries = std::fs::read_dir(dir).ok()?;
    let mut subdirs = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
            continue;
        }
        let ext_ok = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("ttf" | "otf" | "ttc")
        );
        let name_mono = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase().contains("mono"))
            .unwrap_or(false);
        if ext_ok && name_mono {
            return Some(path);
        }
    }
    subdirs.sort();
    subdirs.iter().find_map(|d| scan_for_monospace(d))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_missing_path_is_fatal() {
        let err = resolve_font_path(Some(Path::new("/definitely/not/here.ttf"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn explicit_existing_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("face.ttf");
        std::fs::write(&path, b"not really a font").unwrap();
        assert_eq!(resolve_font_path(Some(&path)).unwrap(), path);
    }
}
