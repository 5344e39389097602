//! Outline validation: blocking errors and non-blocking warnings.
//!
//! Every check runs and every problem is collected, so the user sees the
//! whole list in one go.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::model::{AssignmentConfig, ConfigField, Question, MAX_MARKS, MIN_MARKS};
use crate::subparts::parse_subparts;

static TMA_REF_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{1,2}$").expect("valid TMA reference pattern"));

/// The total every assignment is expected to add up to.
pub const EXPECTED_TOTAL: i64 = 100;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConfigReport {
    pub errors: Vec<String>,
}

impl ConfigReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Sum of the marks of every question whose marks are in range.
    pub total_marks: i64,
}

impl OutlineReport {
    /// Warnings never affect validity.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn validate_config(config: &AssignmentConfig) -> ConfigReport {
    let mut errors = Vec::new();

    for field in ConfigField::REQUIRED {
        if config.get(field).trim().is_empty() {
            errors.push(format!("{} is required", field.label()));
        }
    }

    let tma_ref = config.tma_ref.trim();
    if !tma_ref.is_empty() && !TMA_REF_PATTERN.is_match(tma_ref) {
        errors.push("TMA Reference should be a number (e.g., 01, 02, 03, 04)".to_string());
    }

    ConfigReport { errors }
}

pub fn validate_questions(questions: &[Question]) -> OutlineReport {
    let mut report = OutlineReport::default();

    if questions.is_empty() {
        report
            .errors
            .push("At least one question is required".to_string());
        return report;
    }

    for (index, question) in questions.iter().enumerate() {
        let number = index + 1;

        // Out-of-range marks are reported and left out of the total.
        let marks = question.marks_value();
        if (MIN_MARKS..=MAX_MARKS).contains(&marks) {
            report.total_marks += marks;
        } else {
            report.errors.push(format!(
                "Question {number}: Marks must be between {MIN_MARKS} and {MAX_MARKS}"
            ));
        }

        let parts = question.part_list();
        if parts.is_empty() {
            report.errors.push(format!(
                "Question {number}: At least one part is required (e.g., 'a,b,c,d')"
            ));
        }

        let unique: HashSet<String> = parts.iter().map(|p| p.to_lowercase()).collect();
        if unique.len() != parts.len() {
            report
                .errors
                .push(format!("Question {number}: Duplicate parts found"));
        }

        if !question.subparts.trim().is_empty() {
            if let Err(errors) = parse_subparts(&question.subparts, &parts) {
                report.errors.extend(
                    errors
                        .into_iter()
                        .map(|e| format!("Question {number}: {e}")),
                );
            }
        }
    }

    if report.total_marks != EXPECTED_TOTAL {
        report.warnings.push(format!(
            "Total marks should equal {EXPECTED_TOTAL} (currently: {})",
            report.total_marks
        ));
    }

    report
}
