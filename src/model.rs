use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, TmaError};
use crate::util::{parse_leading_int, split_list};

pub const MAX_QUESTIONS: usize = 10;
pub const MIN_MARKS: i64 = 1;
pub const MAX_MARKS: i64 = 100;

/// Course and student details that parameterise the generated driver file.
///
/// Field names match the settings records written by the browser edition,
/// and any field missing from a stored record falls back to its default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentConfig {
    pub course: String,
    pub tma_ref: String,
    /// Cut-off (due) date, free text.
    pub cod: String,
    pub name: String,
    pub pin: String,
    pub style: String,
    pub basename: String,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            course: "MATH101".into(),
            tma_ref: "04".into(),
            cod: "21 January 2026".into(),
            name: "Alex Taylor".into(),
            pin: "S1234567".into(),
            style: "tma".into(),
            basename: "TMA".into(),
        }
    }
}

/// One field of [`AssignmentConfig`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigField {
    Course,
    TmaRef,
    Cod,
    Name,
    Pin,
    Style,
    Basename,
}

impl ConfigField {
    pub const ALL: [ConfigField; 7] = [
        Self::Course,
        Self::TmaRef,
        Self::Cod,
        Self::Name,
        Self::Pin,
        Self::Style,
        Self::Basename,
    ];

    /// Fields that must be non-blank before files can be generated.
    pub const REQUIRED: [ConfigField; 4] = [Self::Course, Self::TmaRef, Self::Name, Self::Pin];

    /// Record key, as stored and exported.
    pub fn key(self) -> &'static str {
        match self {
            Self::Course => "course",
            Self::TmaRef => "tma_ref",
            Self::Cod => "cod",
            Self::Name => "name",
            Self::Pin => "pin",
            Self::Style => "style",
            Self::Basename => "basename",
        }
    }

    /// Human-readable name used in validation messages (`tma_ref` → `TMA REF`).
    pub fn label(self) -> String {
        self.key().to_uppercase().replace('_', " ")
    }
}

impl AssignmentConfig {
    pub fn get(&self, field: ConfigField) -> &str {
        match field {
            ConfigField::Course => &self.course,
            ConfigField::TmaRef => &self.tma_ref,
            ConfigField::Cod => &self.cod,
            ConfigField::Name => &self.name,
            ConfigField::Pin => &self.pin,
            ConfigField::Style => &self.style,
            ConfigField::Basename => &self.basename,
        }
    }

    pub fn set(&mut self, field: ConfigField, value: impl Into<String>) {
        let slot = match field {
            ConfigField::Course => &mut self.course,
            ConfigField::TmaRef => &mut self.tma_ref,
            ConfigField::Cod => &mut self.cod,
            ConfigField::Name => &mut self.name,
            ConfigField::Pin => &mut self.pin,
            ConfigField::Style => &mut self.style,
            ConfigField::Basename => &mut self.basename,
        };
        *slot = value.into();
    }
}

/// A top-level graded question.
///
/// `marks`, `parts` and `subparts` hold the raw field text; interpretation
/// happens in the validator and generator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Question {
    pub id: String,
    #[serde(deserialize_with = "marks_text")]
    pub marks: String,
    pub parts: String,
    pub subparts: String,
}

impl Default for Question {
    fn default() -> Self {
        Self {
            id: new_question_id(),
            marks: "25".into(),
            parts: "a,b,c,d".into(),
            subparts: String::new(),
        }
    }
}

impl Question {
    /// Marks read as an integer; non-numeric text reads as 0.
    pub fn marks_value(&self) -> i64 {
        parse_leading_int(&self.marks)
    }

    /// Declared parts in order, trimmed, blanks dropped.
    pub fn part_list(&self) -> Vec<String> {
        split_list(&self.parts, ',')
    }
}

pub fn new_question_id() -> String {
    format!("q_{}", uuid::Uuid::new_v4().simple())
}

// Browser exports store marks as text, older ones as numbers.
fn marks_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawMarks {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<RawMarks>::deserialize(deserializer)? {
        Some(RawMarks::Text(text)) => text,
        Some(RawMarks::Int(n)) => n.to_string(),
        Some(RawMarks::Float(n)) => n.to_string(),
        None => String::new(),
    })
}

/// Changes to apply to one question; `None` leaves a field as it is.
#[derive(Clone, Debug, Default)]
pub struct QuestionEdit {
    pub marks: Option<u32>,
    pub parts: Option<String>,
    pub subparts: Option<String>,
}

impl QuestionEdit {
    pub fn is_empty(&self) -> bool {
        self.marks.is_none() && self.parts.is_none() && self.subparts.is_none()
    }
}

/// The ordered question list. Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outline {
    questions: Vec<Question>,
}

impl Default for Outline {
    fn default() -> Self {
        Self {
            questions: vec![Question::default()],
        }
    }
}

impl Outline {
    /// Wraps a stored or imported list; an empty list becomes one default question.
    pub fn from_questions(questions: Vec<Question>) -> Self {
        if questions.is_empty() {
            Self::default()
        } else {
            Self { questions }
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Sum of every question's marks, in range or not, for display.
    pub fn total_marks(&self) -> i64 {
        self.questions.iter().map(Question::marks_value).sum()
    }

    /// 1-based display number of the question with `id`.
    pub fn number_of(&self, id: &str) -> Option<usize> {
        self.questions.iter().position(|q| q.id == id).map(|i| i + 1)
    }

    /// Id of the question shown as number `number` (1-based).
    pub fn id_at(&self, number: usize) -> Result<&str> {
        number
            .checked_sub(1)
            .and_then(|index| self.questions.get(index))
            .map(|q| q.id.as_str())
            .ok_or_else(|| TmaError::UnknownQuestion(number.to_string()))
    }

    /// Appends a question with default marks and parts.
    pub fn add_question(&mut self) -> Result<&Question> {
        if self.questions.len() >= MAX_QUESTIONS {
            return Err(TmaError::TooManyQuestions(MAX_QUESTIONS));
        }
        self.questions.push(Question::default());
        Ok(&self.questions[self.questions.len() - 1])
    }

    /// Removes the question with `id`. The last remaining question cannot be removed.
    pub fn remove_question(&mut self, id: &str) -> Result<Question> {
        if self.questions.len() == 1 {
            return Err(TmaError::LastQuestion);
        }
        let index = self
            .questions
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| TmaError::UnknownQuestion(id.to_string()))?;
        Ok(self.questions.remove(index))
    }

    /// Drops every question and starts again from one default question.
    pub fn clear(&mut self) {
        self.questions = vec![Question::default()];
    }

    pub fn edit_question(&mut self, id: &str, edit: QuestionEdit) -> Result<&Question> {
        let question = self
            .questions
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| TmaError::UnknownQuestion(id.to_string()))?;
        if let Some(marks) = edit.marks {
            question.marks = marks.to_string();
        }
        if let Some(parts) = edit.parts {
            question.parts = parts;
        }
        if let Some(subparts) = edit.subparts {
            question.subparts = subparts;
        }
        Ok(question)
    }
}
