use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Top-level command tree. Every session command resumes the session from
/// the store first, so commands can be run from separate processes.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Start a new assessment session.
    Start(StartArgs),
    /// Load a session and show where it stands.
    Resume(SessionArgs),
    /// Submit questionnaire answers for the current step.
    Answer(AnswerArgs),
    /// Submit emotion classifier samples and end mood sampling.
    Sample(SampleArgs),
    /// Skip the current instrument step.
    Skip(SessionArgs),
    /// Advance to the next step, or complete the assessment from results.
    Advance(SessionArgs),
    /// Abandon the session.
    Abandon(SessionArgs),
    /// Write the completed analysis as a text report.
    Report(ReportArgs),
    /// Print the JSON Schema of an input or output payload.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct StartArgs {
    /// Session id to use (generated when omitted).
    #[arg(long)]
    pub session_id: Option<String>,

    /// User id (defaults to `general.default_user_id`).
    #[arg(long)]
    pub user: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct SessionArgs {
    pub session_id: String,
}

#[derive(Clone, Debug, Args)]
pub struct AnswerArgs {
    pub session_id: String,

    /// JSON file: one answer sheet, or an array of sheets for the wellness survey.
    #[arg(long)]
    pub file: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct SampleArgs {
    pub session_id: String,

    /// JSONL file with one emotion sample per line.
    #[arg(long)]
    pub file: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct ReportArgs {
    pub session_id: String,

    /// Destination file (defaults to `mental-health-analysis-<date>.txt`).
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Payload type.
    pub kind: SchemaKind,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaKind {
    AnswerSheet,
    WellnessSurvey,
    EmotionSample,
    StepResult,
    Session,
    Analysis,
}

impl SchemaKind {
    /// Name in the schema registry.
    #[must_use]
    pub const fn registry_name(self) -> &'static str {
        match self {
            Self::AnswerSheet => "answer_sheet",
            Self::WellnessSurvey => "wellness_survey",
            Self::EmotionSample => "emotion_sample",
            Self::StepResult => "step_result",
            Self::Session => "session",
            Self::Analysis => "analysis",
        }
    }
}
