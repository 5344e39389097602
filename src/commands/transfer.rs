use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::session::Session;
use crate::store::{export_file_name, KeyValueStore, SettingsDocument};

/// Writes the saved configuration and questions to a settings file.
///
/// Without a path, the file goes in the current directory under the
/// date-stamped default name. A directory gets the default name inside it.
pub async fn export_settings<S: KeyValueStore + ?Sized>(
    store: &S,
    path: Option<PathBuf>,
) -> Result<PathBuf> {
    let session = Session::load(store);
    let json = session.export().to_json()?;

    let default_name = export_file_name(chrono::Local::now().date_naive());
    let path = match path {
        Some(p) if p.is_dir() => p.join(default_name),
        Some(p) => p,
        None => PathBuf::from(default_name),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, json).await?;

    info!(path = %path.display(), questions = session.outline.len(), "exported settings");
    Ok(path)
}

/// Replaces the saved state with the contents of a settings file.
///
/// The file is fully read and checked before anything is changed.
pub async fn import_settings<S: KeyValueStore + ?Sized>(store: &S, path: &Path) -> Result<Session> {
    let text = tokio::fs::read_to_string(path).await?;
    let document = SettingsDocument::from_json(&text)?;

    let mut session = Session::load(store);
    session.apply_import(document);
    session.save(store)?;

    info!(path = %path.display(), "import complete");
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TmaError;
    use crate::store::{self, MemoryStore};

    fn temp_dir(prefix: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{prefix}-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_export_then_import() {
        let dir = temp_dir("tmagen-transfer");
        std::fs::create_dir_all(&dir).unwrap();

        let source = MemoryStore::default();
        let mut session = Session::load(&source);
        session.config.course = "M337".into();
        session.outline.add_question().unwrap();
        session.save(&source).unwrap();

        let path = export_settings(&source, Some(dir.clone())).await.unwrap();
        assert_eq!(path.parent(), Some(dir.as_path()));
        assert!(path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("tma-generator-settings-")));

        let target = MemoryStore::default();
        let imported = import_settings(&target, &path).await.unwrap();
        assert_eq!(imported.config.course, "M337");
        assert_eq!(imported.outline, session.outline);
        assert_eq!(store::load_config(&target).unwrap().course, "M337");

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_bad_import_changes_nothing() {
        let dir = temp_dir("tmagen-import");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.json");
        std::fs::write(&path, r#"{"settings": {"course": "X"}}"#).unwrap();

        let store = MemoryStore::default();
        crate::commands::config::set_field(&store, crate::model::ConfigField::Course, "KEEP")
            .unwrap();

        let err = import_settings(&store, &path).await.unwrap_err();
        assert!(matches!(err, TmaError::InvalidImport(_)));
        assert_eq!(store::load_config(&store).unwrap().course, "KEEP");

        assert!(import_settings(&store, &dir.join("missing.json")).await.is_err());

        let _ = std::fs::remove_dir_all(dir);
    }
}
