//! Packaging of a generated file set: the zip archive, an optional plain
//! directory copy, and the names shown to the user afterwards.

use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::{Result, TmaError};
use crate::generate::ArtifactSet;
use crate::model::AssignmentConfig;

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(20[0-9]{2})\b").expect("valid year pattern"));

/// `MATH101` + `04` → `MATH101-TMA04-LaTeX-Files.zip`.
pub fn archive_name(config: &AssignmentConfig) -> String {
    format!(
        "{}-TMA{}-LaTeX-Files.zip",
        config.course.trim(),
        config.tma_ref.trim()
    )
}

/// Suggested Overleaf project name, e.g. `MATH101 TMA 04 (2026)`.
///
/// The year comes from the cut-off date when it mentions one, otherwise the
/// current year is used.
pub fn overleaf_project_name(config: &AssignmentConfig) -> String {
    overleaf_project_name_in(config, chrono::Local::now().year())
}

pub fn overleaf_project_name_in(config: &AssignmentConfig, current_year: i32) -> String {
    let course = config.course.to_uppercase();
    let tma_ref = format!("{:0>2}", config.tma_ref);
    let year = YEAR_PATTERN
        .captures(&config.cod)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| current_year.to_string());

    format!("{course} TMA {tma_ref} ({year})")
}

/// Builds the zip archive in memory, one entry per file in set order.
///
/// Entry timestamps are fixed so the same file set always gives the same bytes.
pub fn zip_artifacts(files: &ArtifactSet) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for (name, content) in files.iter() {
        zip.start_file(name, entry_options())?;
        zip.write_all(content.as_bytes())?;
    }

    Ok(zip.finish()?.into_inner())
}

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
}

/// Writes the zip archive for `files` to `path`, creating parent directories.
pub async fn write_archive(files: &ArtifactSet, path: &Path) -> Result<u64> {
    let bytes = zip_artifacts(files)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, &bytes).await?;

    debug!(path = %path.display(), bytes = bytes.len(), "wrote archive");
    Ok(bytes.len() as u64)
}

/// Writes every file of the set into `dir` (created if missing).
pub async fn extract_to_dir(files: &ArtifactSet, dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir).await?;

    for (name, content) in files.iter() {
        // Part labels end up in filenames; keep everything inside `dir`.
        if Path::new(name).file_name().and_then(|n| n.to_str()) != Some(name) {
            return Err(TmaError::Custom(format!(
                "Refusing to write '{name}' outside {}",
                dir.display()
            )));
        }
        tokio::fs::write(dir.join(name), content).await?;
    }

    debug!(dir = %dir.display(), files = files.len(), "extracted file set");
    Ok(())
}
