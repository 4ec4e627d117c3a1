use anyhow::Context;
use calm_schema::SchemaRegistry;
use calm_scoring::EmotionSample;
use serde_json::Value;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SampleArgs;
use crate::context::AppContext;
use crate::output::output;

use super::shared::{session_response, sync_quietly};
use super::types::SampleResponse;

/// Read one validated sample per JSONL line. Errors name the line.
pub fn read_samples(path: &std::path::Path) -> anyhow::Result<Vec<EmotionSample>> {
    let registry = SchemaRegistry::new();
    let lines = serde_jsonlines::json_lines::<Value, _>(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut samples = Vec::new();
    for (index, line) in lines.enumerate() {
        let line_no = index + 1;
        let value = line.with_context(|| format!("{}:{line_no}: not valid JSON", path.display()))?;
        registry
            .validate("emotion_sample", &value)
            .with_context(|| format!("{}:{line_no}: invalid emotion sample", path.display()))?;
        samples.push(serde_json::from_value(value)?);
    }
    Ok(samples)
}

pub async fn run(args: &SampleArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let samples = read_samples(&args.file)?;
    let samples_read = samples.len();

    let (mut engine, _) = ctx.open(&args.session_id).await?;
    for sample in samples {
        engine.push_sample(sample)?;
    }
    let outcome = engine.finish_sampling().await?;
    sync_quietly(&mut engine).await;
    output(
        &SampleResponse {
            samples_read,
            session: session_response(&engine, None, Some(&outcome)),
        },
        flags.format,
    )
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use calm_core::enums::EmotionLabel;
    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    use super::read_samples;

    #[test]
    fn reads_one_sample_per_line() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"timestamp":"2026-01-01T00:00:00Z","probabilities":{{"sad":0.6,"neutral":0.2}}}}"#
        )
        .unwrap();
        writeln!(
            file,
            r#"{{"timestamp":"2026-01-01T00:00:02Z","probabilities":{{"happy":0.8}}}}"#
        )
        .unwrap();

        let samples = read_samples(file.path()).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].top(), Some((EmotionLabel::Sad, 0.6)));
    }

    #[test]
    fn bad_line_is_reported_by_number() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"timestamp":"2026-01-01T00:00:00Z","probabilities":{{"sad":0.6}}}}"#
        )
        .unwrap();
        writeln!(
            file,
            r#"{{"timestamp":"2026-01-01T00:00:02Z","probabilities":{{"sad":"high"}}}}"#
        )
        .unwrap();

        let err = read_samples(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains(":2: invalid emotion sample"));
    }
}
