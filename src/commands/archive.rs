//! ZIP service: writes a one-file archive into the temp directory.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const ARCHIVE_NAME: &str = "archivio.zip";
pub const README_NAME: &str = "README.txt";
pub const README_TEXT: &str = "Questo archivio è stato creato da ArcadiaAI - SAC: ZIP Service\n\
                               https://github.com/mirko-yuri-donato/ArcadiaAI";

/// Create (or overwrite) `<temp_dir>/archivio.zip` containing a deflated README.
pub fn create_archive(temp_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(temp_dir)
        .with_context(|| format!("failed to create temp dir {}", temp_dir.display()))?;

    let path = temp_dir.join(ARCHIVE_NAME);
    let file = std::fs::File::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(README_NAME, options)?;
    zip.write_all(README_TEXT.as_bytes())?;
    zip.finish()?;

    tracing::info!(path = %path.display(), "archive created");
    Ok(path)
}
