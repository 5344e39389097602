use std::io::{Cursor, Read};
use std::path::PathBuf;

use tmagen_lib::commands::{self, generate::GenerateOptions};
use tmagen_lib::generate::EmbeddedStyles;
use tmagen_lib::model::{ConfigField, QuestionEdit};
use tmagen_lib::session::Session;
use tmagen_lib::store::FileStore;

fn temp_dir(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{prefix}-{}", uuid::Uuid::new_v4()))
}

fn edit(marks: u32, parts: &str, subparts: &str) -> QuestionEdit {
    QuestionEdit {
        marks: Some(marks),
        parts: Some(parts.to_string()),
        subparts: Some(subparts.to_string()),
    }
}

#[tokio::test]
async fn test_edit_generate_and_transfer() {
    let root = temp_dir("tmagen-flow");
    let store = FileStore::new(root.join("state"));

    commands::config::set_field(&store, ConfigField::Course, "M208").unwrap();
    commands::config::set_field(&store, ConfigField::TmaRef, "02").unwrap();
    commands::question::edit(&store, 1, edit(60, "a,b", "b:i,ii")).unwrap();
    commands::question::add(&store, edit(40, "a", "")).unwrap();

    // A fresh load sees every edit.
    let session = Session::load(&store);
    let (config_report, outline_report) = commands::generate::check(&session);
    assert!(config_report.is_valid());
    assert!(outline_report.is_valid());
    assert!(outline_report.warnings.is_empty());

    let outcome = commands::generate::generate_package(
        &session,
        &store,
        &EmbeddedStyles,
        &GenerateOptions {
            output: Some(root.clone()),
            extract_to: None,
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(outcome.archive_path, root.join("M208-TMA02-LaTeX-Files.zip"));
    let bytes = std::fs::read(&outcome.archive_path).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();

    let mut names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "TMA.tex",
            "q1.tex",
            "q1a.tex",
            "q1b.tex",
            "q1b_0.tex",
            "q1b_1.tex",
            "q2.tex",
            "q2a.tex",
            "tma-extras.sty",
            "tma.sty",
        ]
    );

    let mut part = String::new();
    archive
        .by_name("q1b.tex")
        .unwrap()
        .read_to_string(&mut part)
        .unwrap();
    assert!(part.contains("\\input{q1b_1}"));
    assert!(part.contains("\\input{q1b_0}"));

    // Export, wipe, import.
    let exported = commands::transfer::export_settings(&store, Some(root.join("settings.json")))
        .await
        .unwrap();
    commands::question::clear(&store).unwrap();
    commands::config::reset(&store).unwrap();

    let restored = commands::transfer::import_settings(&store, &exported)
        .await
        .unwrap();
    assert_eq!(restored.config.course, "M208");
    assert_eq!(restored.outline.len(), 2);
    assert_eq!(Session::load(&store).outline, restored.outline);

    let _ = std::fs::remove_dir_all(root);
}

#[tokio::test]
async fn test_generate_refuses_invalid_outline() {
    let root = temp_dir("tmagen-invalid");
    let store = FileStore::new(root.join("state"));
    commands::question::edit(&store, 1, edit(25, "a,b", "c:i")).unwrap();

    let session = Session::load(&store);
    let err = commands::generate::generate_package(
        &session,
        &store,
        &EmbeddedStyles,
        &GenerateOptions {
            output: Some(root.join("out.zip")),
            extract_to: None,
        },
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("Question 1:"));
    assert!(!root.join("out.zip").exists());

    let _ = std::fs::remove_dir_all(root);
}
