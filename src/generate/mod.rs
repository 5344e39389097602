//! File-set generation: turns a validated outline into named LaTeX files.
//!
//! Naming is fixed and cross-referencing: the driver includes `q<k>`, each
//! question file inputs its `q<k><p>` part files, and each part file with
//! subparts inputs its `q<k><p>_<i>` subpart files. Output depends only on the
//! configuration and questions passed in.

pub mod styles;

use futures_util::future;
use tracing::{debug, info, warn};

use crate::error::{Result, TmaError};
use crate::model::{AssignmentConfig, Question};
use crate::subparts::parse_subparts;
use crate::templates::{self, style_files};

pub use styles::{DirStyles, EmbeddedStyles, HttpStyles, StyleProvider, StyleSource};

/// Generated files in generation order, filename → content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArtifactSet {
    entries: Vec<(String, String)>,
}

impl ArtifactSet {
    /// Adds a file, replacing (in place) any earlier file with the same name.
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        let name = name.into();
        let content = content.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = content,
            None => self.entries.push((name, content)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, content)| content.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, content)| (name.as_str(), content.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Renders the driver, question, part and subpart files.
///
/// Expects input that passed validation. A subparts spec that still fails to
/// parse is reported instead of being dropped.
pub fn render_documents(config: &AssignmentConfig, questions: &[Question]) -> Result<ArtifactSet> {
    let mut files = ArtifactSet::default();

    files.insert(
        templates::tex_file(templates::driver_stem(config)),
        templates::driver_tex(config, questions.len()),
    );

    for (index, question) in questions.iter().enumerate() {
        let number = index + 1;
        let parts = question.part_list();
        let subparts =
            parse_subparts(&question.subparts, &parts).map_err(|errors| TmaError::InvalidSubparts {
                question: number,
                errors: errors.iter().map(ToString::to_string).collect(),
            })?;

        for group in subparts.groups().filter(|g| g.written_as != g.part) {
            debug!(
                question = number,
                part = %group.part,
                written_as = %group.written_as,
                "subparts matched declared part ignoring case"
            );
        }

        files.insert(
            templates::tex_file(&templates::question_stem(number)),
            templates::question_tex(config, number, &parts),
        );

        for part in &parts {
            let mut content = templates::part_tex(config, number, part);
            let subs = subparts.get(part).unwrap_or_default();
            if !subs.is_empty() {
                content.push_str(&templates::subpart_block(number, part, subs.len()));
            }
            files.insert(templates::tex_file(&templates::part_stem(number, part)), content);

            for sub_index in 0..subs.len() {
                files.insert(
                    templates::tex_file(&templates::subpart_stem(number, part, sub_index)),
                    templates::subpart_tex(config, number, part, sub_index),
                );
            }
        }

        debug!(
            question = number,
            parts = parts.len(),
            subpart_groups = subparts.len(),
            "rendered question files"
        );
    }

    Ok(files)
}

/// Renders every document and adds the two style files from `styles`.
///
/// Style resources are fetched concurrently and used only as a pair: if
/// either fetch fails, both are replaced by the embedded copies, so this
/// never fails because of them.
pub async fn generate_files<P: StyleProvider>(
    config: &AssignmentConfig,
    questions: &[Question],
    styles: &P,
) -> Result<ArtifactSet> {
    let mut files = render_documents(config, questions)?;

    let (primary, extras) = resolve_styles(styles).await;
    files.insert(style_files::TMA_STY, primary);
    files.insert(style_files::TMA_EXTRAS_STY, extras);

    info!(files = files.len(), questions = questions.len(), "generated file set");
    Ok(files)
}

async fn resolve_styles<P: StyleProvider>(styles: &P) -> (String, String) {
    let fetched = future::join(
        styles.fetch(style_files::TMA_STY),
        styles.fetch(style_files::TMA_EXTRAS_STY),
    )
    .await;

    match fetched {
        (Ok(primary), Ok(extras)) => {
            debug!(
                primary_bytes = primary.len(),
                extras_bytes = extras.len(),
                "fetched style resources"
            );
            (primary, extras)
        }
        (Err(e), _) | (Ok(_), Err(e)) => {
            warn!(error = %e, "style resources unavailable, using embedded copies");
            (
                style_files::tma_sty().to_string(),
                style_files::tma_extras_sty().to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unreachable;

    impl StyleProvider for Unreachable {
        async fn fetch(&self, name: &str) -> Result<String> {
            Err(TmaError::Custom(format!("cannot reach {name}")))
        }
    }

    struct Custom;

    impl StyleProvider for Custom {
        async fn fetch(&self, name: &str) -> Result<String> {
            Ok(format!("% served {name}"))
        }
    }

    fn question(marks: &str, parts: &str, subparts: &str) -> Question {
        Question {
            id: crate::model::new_question_id(),
            marks: marks.into(),
            parts: parts.into(),
            subparts: subparts.into(),
        }
    }

    fn sample_config() -> AssignmentConfig {
        AssignmentConfig {
            course: "MATH101".into(),
            tma_ref: "04".into(),
            name: "Alex Taylor".into(),
            pin: "S1234567".into(),
            ..AssignmentConfig::default()
        }
    }

    #[tokio::test]
    async fn test_single_question_file_set() {
        let files = generate_files(
            &sample_config(),
            &[question("100", "a,b", "")],
            &EmbeddedStyles,
        )
        .await
        .unwrap();

        let names: Vec<&str> = files.names().collect();
        assert_eq!(
            names,
            vec!["TMA.tex", "q1.tex", "q1a.tex", "q1b.tex", "tma.sty", "tma-extras.sty"]
        );
        assert!(!names.iter().any(|n| n.contains('_')));
    }

    #[tokio::test]
    async fn test_generation_is_deterministic() {
        let config = sample_config();
        let questions = vec![
            question("40", "a,b,c", "a:i,ii;c:x"),
            question("60", "a,b", "b:1,2,3"),
        ];
        let first = generate_files(&config, &questions, &EmbeddedStyles).await.unwrap();
        let second = generate_files(&config, &questions, &EmbeddedStyles).await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_subpart_naming() {
        let files = render_documents(
            &sample_config(),
            &[question("50", "a", ""), question("50", "a,b", "b:i,ii")],
        )
        .unwrap();
        assert!(files.contains("q2b_0.tex"));
        assert!(files.contains("q2b_1.tex"));
        assert!(!files.contains("q2b_2.tex"));
        assert!(files
            .get("q2b_1.tex")
            .unwrap()
            .contains("% File: q2b_1.tex"));
    }

    #[test]
    fn test_subpart_inputs_only_in_owning_part() {
        let files =
            render_documents(&sample_config(), &[question("100", "a,c", "a:i,ii")]).unwrap();

        let part_a = files.get("q1a.tex").unwrap();
        assert_eq!(part_a.matches("\\input{q1a_").count(), 2);
        assert!(part_a.contains("\\qsubpart\n\\input{q1a_0}\n\\qsubpart\n\\input{q1a_1}"));
        assert!(part_a.starts_with(&templates::part_tex(&sample_config(), 1, "a")));

        let part_c = files.get("q1c.tex").unwrap();
        assert_eq!(part_c.matches("\\input{").count(), 0);
        assert_eq!(files.names().filter(|n| n.starts_with("q1c_")).count(), 0);
    }

    #[test]
    fn test_driver_lists_every_question_and_nothing_else() {
        let questions = vec![
            question("30", "a", ""),
            question("30", "a", ""),
            question("40", "a", ""),
        ];
        let files = render_documents(&sample_config(), &questions).unwrap();
        let driver = files.get("TMA.tex").unwrap();
        assert!(driver.contains("\\includeonly{q1,q2,q3}"));
        let includes: Vec<&str> = driver
            .lines()
            .filter(|l| l.starts_with("\\include{"))
            .collect();
        assert_eq!(includes, vec!["\\include{q1}", "\\include{q2}", "\\include{q3}"]);
        assert!(!driver.contains("\\input{"));
    }

    #[test]
    fn test_question_file_follows_declared_part_order() {
        let files = render_documents(&sample_config(), &[question("100", "c,a,B", "")]).unwrap();
        let q1 = files.get("q1.tex").unwrap();
        let inputs: Vec<&str> = q1.lines().filter(|l| l.starts_with("\\input{")).collect();
        assert_eq!(inputs, vec!["\\input{q1c}", "\\input{q1a}", "\\input{q1B}"]);
        assert!(files.contains("q1B.tex"));
    }

    #[test]
    fn test_subparts_match_declared_part_case_insensitively() {
        let files = render_documents(&sample_config(), &[question("100", "a,b", "A:i,ii")]).unwrap();
        assert!(files.contains("q1a_0.tex"));
        assert!(files.contains("q1a_1.tex"));
        assert!(!files.contains("q1A_0.tex"));
        assert!(files.get("q1a.tex").unwrap().contains("\\input{q1a_1}"));
    }

    #[test]
    fn test_duplicate_parts_do_not_break_generation() {
        let files = render_documents(&sample_config(), &[question("100", "a,b,a", "")]).unwrap();
        let names: Vec<&str> = files.names().collect();
        assert_eq!(names, vec!["TMA.tex", "q1.tex", "q1a.tex", "q1b.tex"]);
    }

    #[test]
    fn test_invalid_subparts_are_reported() {
        let err = render_documents(&sample_config(), &[question("100", "a", "z:i")]).unwrap_err();
        assert!(matches!(err, TmaError::InvalidSubparts { question: 1, .. }));
    }

    #[test]
    fn test_driver_uses_basename_and_style() {
        let config = AssignmentConfig {
            basename: "Answers".into(),
            style: "mystyle".into(),
            ..sample_config()
        };
        let files = render_documents(&config, &[question("100", "a", "")]).unwrap();
        assert!(files.get("Answers.tex").unwrap().contains("\\usepackage{mystyle}"));
        assert!(files
            .get("q1a.tex")
            .unwrap()
            .starts_with("% !TeX root = ./Answers.tex"));
    }

    #[tokio::test]
    async fn test_style_fetch_failure_uses_embedded_copies() {
        let files = generate_files(&sample_config(), &[question("100", "a", "")], &Unreachable)
            .await
            .unwrap();
        assert_eq!(files.get("tma.sty").unwrap(), style_files::tma_sty());
        assert_eq!(
            files.get("tma-extras.sty").unwrap(),
            "% TMA Extras style file\n\\endinput"
        );
    }

    #[tokio::test]
    async fn test_fetched_styles_are_used_verbatim() {
        let files = generate_files(&sample_config(), &[question("100", "a", "")], &Custom)
            .await
            .unwrap();
        assert_eq!(files.get("tma.sty").unwrap(), "% served tma.sty");
        assert_eq!(files.get("tma-extras.sty").unwrap(), "% served tma-extras.sty");
    }

    /// Serves the primary style file but not the extras.
    struct PartlyReachable;

    impl StyleProvider for PartlyReachable {
        async fn fetch(&self, name: &str) -> Result<String> {
            if name == style_files::TMA_STY {
                Ok("% remote tma.sty".to_string())
            } else {
                Err(TmaError::Custom(format!("cannot reach {name}")))
            }
        }
    }

    #[tokio::test]
    async fn test_one_failed_style_fetch_replaces_both() {
        let files = generate_files(
            &sample_config(),
            &[question("100", "a", "")],
            &PartlyReachable,
        )
        .await
        .unwrap();
        assert_eq!(files.get("tma.sty").unwrap(), style_files::tma_sty());
        assert_eq!(
            files.get("tma-extras.sty").unwrap(),
            style_files::tma_extras_sty()
        );
    }

    #[test]
    fn test_artifact_insert_replaces_in_place() {
        let mut files = ArtifactSet::default();
        files.insert("a", "1");
        files.insert("b", "2");
        files.insert("a", "3");
        assert_eq!(files.iter().collect::<Vec<_>>(), vec![("a", "3"), ("b", "2")]);
    }
}
