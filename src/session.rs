use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::error::Result;
use crate::model::{AssignmentConfig, Outline};
use crate::store::{self, KeyValueStore, SettingsDocument};

/// The working state: the configuration record, the question list, and
/// whether a generate run is in progress.
#[derive(Debug, Default)]
pub struct Session {
    pub config: AssignmentConfig,
    pub outline: Outline,
    generating: AtomicBool,
}

impl Session {
    pub fn new(config: AssignmentConfig, outline: Outline) -> Self {
        Self {
            config,
            outline,
            generating: AtomicBool::new(false),
        }
    }

    /// Restores the saved state. Anything missing or unreadable starts from
    /// defaults, and an empty question list becomes one default question.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let config = store::load_config(store).unwrap_or_default();
        let questions = store::load_questions(store);
        info!(
            course = %config.course,
            saved_questions = questions.len(),
            "loaded session"
        );
        Self::new(config, Outline::from_questions(questions))
    }

    /// Writes both slots. A failed write is logged and returned; the
    /// in-memory state is left as it was.
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<()> {
        let result = store::save_config(store, &self.config)
            .and_then(|()| store::save_questions(store, self.outline.questions()));
        if let Err(e) = &result {
            warn!(error = %e, "could not save settings");
        }
        result
    }

    /// Replaces the whole state with an imported settings file.
    pub fn apply_import(&mut self, document: SettingsDocument) {
        self.config = document.settings;
        self.outline = Outline::from_questions(document.questions);
        info!(questions = self.outline.len(), "imported settings");
    }

    pub fn export(&self) -> SettingsDocument {
        SettingsDocument::export(&self.config, self.outline.questions())
    }

    /// Marks a generate run as started. Returns `None` if one is already
    /// running; the flag clears when the returned guard drops.
    pub fn begin_generation(&self) -> Option<GenerationGuard<'_>> {
        self.generating
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| GenerationGuard {
                flag: &self.generating,
            })
    }

    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::SeqCst)
    }
}

/// Held for the duration of a generate run.
#[derive(Debug)]
pub struct GenerationGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for GenerationGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;
    use crate::error::TmaError;
    use crate::store::MemoryStore;

    /// Reads nothing and rejects every write.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set(&self, key: &str, _value: &str) -> Result<()> {
            Err(TmaError::Custom(format!("{key} is read-only")))
        }
    }

    #[test]
    fn test_failed_save_is_returned_and_state_kept() {
        let mut session = Session::load(&ReadOnlyStore);
        session.config.course = "M208".into();

        let err = session.save(&ReadOnlyStore).unwrap_err();
        assert!(err.to_string().contains("read-only"));
        assert_eq!(session.config.course, "M208");
        assert_eq!(session.outline.len(), 1);
    }

    #[test]
    fn test_load_from_empty_store_uses_defaults() {
        let session = Session::load(&MemoryStore::default());
        assert_eq!(session.config, AssignmentConfig::default());
        assert_eq!(session.outline.len(), 1);
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::default();
        let mut session = Session::load(&store);
        session.config.course = "M208".into();
        session.outline.add_question().unwrap();
        session.save(&store).unwrap();

        let restored = Session::load(&store);
        assert_eq!(restored.config.course, "M208");
        assert_eq!(restored.outline, session.outline);
    }

    #[test]
    fn test_import_with_no_questions_keeps_one() {
        let mut session = Session::default();
        session.apply_import(SettingsDocument {
            settings: AssignmentConfig {
                course: "S217".into(),
                ..AssignmentConfig::default()
            },
            questions: Vec::<Question>::new(),
            exported: None,
            version: None,
        });
        assert_eq!(session.config.course, "S217");
        assert_eq!(session.outline.len(), 1);
    }

    #[test]
    fn test_generation_guard_blocks_reentry() {
        let session = Session::default();
        let guard = session.begin_generation().unwrap();
        assert!(session.is_generating());
        assert!(session.begin_generation().is_none());
        drop(guard);
        assert!(!session.is_generating());
        assert!(session.begin_generation().is_some());
    }
}
