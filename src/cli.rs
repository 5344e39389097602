//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::model::{ConfigField, QuestionEdit};

#[derive(Parser)]
#[command(
    name = "tmagen",
    version,
    about = "Generate LaTeX file sets for tutor-marked assignments",
    long_about = "Keep an assignment's details and question outline, check them, and \
                  generate a zip of LaTeX files: a driver document plus one file per \
                  question, part and subpart, ready to upload to Overleaf."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding the saved configuration and questions.
    #[arg(long = "state-dir", value_name = "DIR", env = "TMAGEN_HOME", global = true)]
    pub state_dir: Option<String>,

    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Explicit log level (overrides -v).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show or change the assignment details.
    #[command(subcommand)]
    Config(ConfigCommand),

    /// List or change the questions.
    #[command(subcommand)]
    Question(QuestionCommand),

    /// Check the assignment without generating anything.
    Validate,

    /// Validate, then write the zip of LaTeX files.
    Generate(GenerateArgs),

    /// Save the configuration and questions to a settings file.
    Export {
        /// File or directory (default: a date-stamped file in the current directory).
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
    },

    /// Replace the configuration and questions with a settings file.
    Import {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    Show,
    Set {
        #[arg(value_enum)]
        field: FieldArg,
        value: String,
    },
    /// Restore every field to its default. Questions are kept.
    Reset,
}

#[derive(Subcommand)]
pub enum QuestionCommand {
    List,
    Add(QuestionFields),
    Edit {
        /// Question number as listed (1-based).
        number: usize,
        #[command(flatten)]
        fields: QuestionFields,
    },
    Remove {
        number: usize,
    },
    /// Remove every question and start again from one default question.
    Clear,
}

#[derive(Args, Clone, Debug, Default)]
pub struct QuestionFields {
    #[arg(long)]
    pub marks: Option<u32>,

    /// Comma-separated part labels, e.g. "a,b,c".
    #[arg(long)]
    pub parts: Option<String>,

    /// Subparts per part, e.g. "a:i,ii;c:i,ii,iii".
    #[arg(long)]
    pub subparts: Option<String>,
}

impl From<QuestionFields> for QuestionEdit {
    fn from(fields: QuestionFields) -> Self {
        Self {
            marks: fields.marks,
            parts: fields.parts,
            subparts: fields.subparts,
        }
    }
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Archive path, or a directory for the default-named archive.
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Also write the files, unzipped, into this directory.
    #[arg(long = "extract-to", value_name = "DIR")]
    pub extract_to: Option<PathBuf>,

    /// Where to get tma.sty and tma-extras.sty: a base URL or a directory.
    /// Embedded copies are used when unset or unavailable.
    #[arg(long, value_name = "URL|DIR", env = "TMAGEN_STYLES")]
    pub styles: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FieldArg {
    Course,
    #[value(alias = "tma_ref")]
    TmaRef,
    Cod,
    Name,
    Pin,
    Style,
    Basename,
}

impl From<FieldArg> for ConfigField {
    fn from(field: FieldArg) -> Self {
        match field {
            FieldArg::Course => ConfigField::Course,
            FieldArg::TmaRef => ConfigField::TmaRef,
            FieldArg::Cod => ConfigField::Cod,
            FieldArg::Name => ConfigField::Name,
            FieldArg::Pin => ConfigField::Pin,
            FieldArg::Style => ConfigField::Style,
            FieldArg::Basename => ConfigField::Basename,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
