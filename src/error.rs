/// All errors that can occur while editing, validating or packaging an assignment.
#[derive(Debug, thiserror::Error)]
pub enum TmaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Zip creation error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation failed; every collected error is carried, in report order.
    #[error("Validation failed:\n  • {}", .0.join("\n  • "))]
    Validation(Vec<String>),

    #[error("Maximum of {0} questions allowed")]
    TooManyQuestions(usize),

    #[error("At least one question is required")]
    LastQuestion,

    #[error("No question {0}")]
    UnknownQuestion(String),

    #[error("Question {question}: invalid subparts ({})", .errors.join("; "))]
    InvalidSubparts { question: usize, errors: Vec<String> },

    #[error("Invalid settings file format: {0}")]
    InvalidImport(String),

    #[error("{0}")]
    Custom(String),
}

pub type Result<T> = std::result::Result<T, TmaError>;
