use crate::domain::errors::OutputError;
use crate::infrastructure::spreadsheet::writer::ensure_dir;
use std::path::{Path, PathBuf};
use tracing::info;

/// `{stem}_{stamp}{.ext}` for an input file name.
pub fn archive_file_name(input: &Path, stamp: &str) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string());
    match input.extension() {
        Some(ext) => format!("{}_{}.{}", stem, stamp, ext.to_string_lossy()),
        None => format!("{}_{}", stem, stamp),
    }
}

/// Copy `input` byte-for-byte into `archive_dir` under a timestamped name.
///
/// Returns the archive path. Nothing is copied when `input` already is that
/// path.
pub fn archive_input(input: &Path, archive_dir: &Path, stamp: &str) -> Result<PathBuf, OutputError> {
    ensure_dir(archive_dir)?;
    let destination = archive_dir.join(archive_file_name(input, stamp));

    if same_file(input, &destination) {
        info!("Archive: {} already archived", input.display());
        return Ok(destination);
    }

    std::fs::copy(input, &destination).map_err(|source| OutputError::Archive {
        path: destination.clone(),
        source,
    })?;
    info!("Archive: copied input to {}", destination.display());
    Ok(destination)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_file_name_keeps_extension() {
        assert_eq!(
            archive_file_name(Path::new("/data/NIFTY_parameter_Input.xlsx"), "20260110_093000"),
            "NIFTY_parameter_Input_20260110_093000.xlsx"
        );
        assert_eq!(archive_file_name(Path::new("trades"), "20260110_093000"), "trades_20260110_093000");
    }

    #[test]
    fn test_archive_copy_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("trades.csv");
        std::fs::write(&input, b"SL_N0,SYMBOL\n1,NIFTY\n").unwrap();

        let archived = archive_input(&input, &dir.path().join("INPUT"), "20260110_093000").unwrap();

        assert_eq!(archived, dir.path().join("INPUT").join("trades_20260110_093000.csv"));
        assert_eq!(std::fs::read(&archived).unwrap(), std::fs::read(&input).unwrap());
    }

    #[test]
    fn test_same_file_resolves_relative_segments() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("trades.csv");
        std::fs::write(&file, b"x").unwrap();
        let roundabout = dir.path().join(".").join("trades.csv");

        assert!(same_file(&file, &roundabout));
        assert!(!same_file(&file, &dir.path().join("absent.csv")));
    }
}
