use anyhow::Context;
use calm_schema::SchemaRegistry;
use calm_scoring::AnswerSheet;
use serde_json::Value;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AnswerArgs;
use crate::context::AppContext;
use crate::output::output;

use super::shared::{session_response, sync_quietly};

/// A parsed answers file.
#[derive(Debug)]
pub enum Submission {
    Sheet(AnswerSheet),
    Survey(Vec<AnswerSheet>),
}

/// Validate against the published schema, then deserialize. An array is the
/// wellness survey; an object is a single questionnaire.
pub fn parse_submission(registry: &SchemaRegistry, value: Value) -> anyhow::Result<Submission> {
    if value.is_array() {
        registry
            .validate("wellness_survey", &value)
            .context("invalid wellness survey")?;
        Ok(Submission::Survey(serde_json::from_value(value)?))
    } else {
        registry
            .validate("answer_sheet", &value)
            .context("invalid answer sheet")?;
        Ok(Submission::Sheet(serde_json::from_value(value)?))
    }
}

pub async fn run(args: &AnswerArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", args.file.display()))?;
    let submission = parse_submission(&SchemaRegistry::new(), value)?;

    let (mut engine, _) = ctx.open(&args.session_id).await?;
    let outcome = match &submission {
        Submission::Sheet(sheet) => engine.submit_answers(sheet).await?,
        Submission::Survey(sheets) => engine.submit_wellness(sheets).await?,
    };
    sync_quietly(&mut engine).await;
    output(&session_response(&engine, None, Some(&outcome)), flags.format)
}
