use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::archive;
use crate::error::{Result, TmaError};
use crate::generate::{self, StyleProvider};
use crate::session::Session;
use crate::store::KeyValueStore;
use crate::validate::{self, ConfigReport, OutlineReport};

#[derive(Clone, Debug, Default)]
pub struct GenerateOptions {
    /// Archive path, or a directory to place the default-named archive in.
    pub output: Option<PathBuf>,
    /// Also write the plain files into this directory.
    pub extract_to: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOutcome {
    pub archive_path: PathBuf,
    pub archive_bytes: u64,
    pub files: Vec<String>,
    pub warnings: Vec<String>,
    pub total_marks: i64,
    pub project_name: String,
    pub extracted_to: Option<PathBuf>,
}

/// Runs both validators over the session.
pub fn check(session: &Session) -> (ConfigReport, OutlineReport) {
    (
        validate::validate_config(&session.config),
        validate::validate_questions(session.outline.questions()),
    )
}

/// Validates, generates and packages the session's assignment.
///
/// Returns `Ok(None)` without doing anything if another run on the same
/// session is still in progress.
pub async fn generate_package<S, P>(
    session: &Session,
    store: &S,
    styles: &P,
    options: &GenerateOptions,
) -> Result<Option<GenerateOutcome>>
where
    S: KeyValueStore + ?Sized,
    P: StyleProvider,
{
    let Some(_guard) = session.begin_generation() else {
        warn!("generation already in progress, ignoring request");
        return Ok(None);
    };

    let (config_report, outline_report) = check(session);
    if !config_report.is_valid() || !outline_report.is_valid() {
        let mut errors = config_report.errors;
        errors.extend(outline_report.errors);
        return Err(TmaError::Validation(errors));
    }
    for warning in &outline_report.warnings {
        warn!("{warning}");
    }

    let files = generate::generate_files(&session.config, session.outline.questions(), styles).await?;

    let archive_path = resolve_output(
        options.output.as_deref(),
        &archive::archive_name(&session.config),
    );
    let archive_bytes = archive::write_archive(&files, &archive_path).await?;
    info!(path = %archive_path.display(), bytes = archive_bytes, "archive ready");

    if let Some(dir) = &options.extract_to {
        archive::extract_to_dir(&files, dir).await?;
        info!(dir = %dir.display(), "files extracted");
    }

    // The package is already on disk; a failed save only costs the edits.
    let _ = session.save(store);

    Ok(Some(GenerateOutcome {
        archive_path,
        archive_bytes,
        files: files.names().map(str::to_string).collect(),
        warnings: outline_report.warnings,
        total_marks: outline_report.total_marks,
        project_name: archive::overleaf_project_name(&session.config),
        extracted_to: options.extract_to.clone(),
    }))
}

fn resolve_output(output: Option<&Path>, default_name: &str) -> PathBuf {
    match output {
        Some(path) if path.is_dir() => path.join(default_name),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(default_name),
    }
}
