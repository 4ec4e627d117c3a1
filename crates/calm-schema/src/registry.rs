//! Schema registry built from the boundary types.

use std::collections::HashMap;

use calm_core::analysis::CompositeAnalysis;
use calm_core::results::StepResult;
use calm_core::session::AssessmentSession;
use calm_scoring::{AnswerSheet, EmotionSample};
use schemars::schema_for;

use crate::error::SchemaError;

pub struct SchemaRegistry {
    schemas: HashMap<&'static str, serde_json::Value>,
}

/// Insert a schema, converting the `schemars` output to a `serde_json::Value`.
macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        $map.insert(
            $name,
            serde_json::to_value(schema_for!($ty)).expect("generated schema serializes"),
        );
    };
}

impl SchemaRegistry {
    /// Build the registry.
    ///
    /// # Panics
    ///
    /// Panics if a `schemars`-generated schema fails to serialize, which
    /// does not happen for derived schemas.
    #[must_use]
    pub fn new() -> Self {
        let mut schemas = HashMap::new();

        // Inputs
        register!(schemas, "answer_sheet", AnswerSheet);
        register!(schemas, "wellness_survey", Vec<AnswerSheet>);
        register!(schemas, "emotion_sample", EmotionSample);

        // Outputs
        register!(schemas, "step_result", StepResult);
        register!(schemas, "session", AssessmentSession);
        register!(schemas, "analysis", CompositeAnalysis);

        Self { schemas }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.schemas.get(name)
    }

    /// Validate a JSON value against a named schema, collecting every error.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` for an unknown name, or
    /// `SchemaError::ValidationFailed` listing each violation.
    pub fn validate(&self, name: &str, instance: &serde_json::Value) -> Result<(), SchemaError> {
        let schema = self
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;

        let validator =
            jsonschema::validator_for(schema).map_err(|e| SchemaError::Compile(e.to_string()))?;

        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|e| format!("{}: {e}", e.instance_path))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed { errors })
        }
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
