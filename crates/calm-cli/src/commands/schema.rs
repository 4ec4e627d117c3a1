use anyhow::Context;
use calm_schema::SchemaRegistry;

use crate::cli::root_commands::SchemaArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::output;

/// Handle `calm schema`. Schemas are always printed as JSON.
pub fn handle(args: &SchemaArgs, _flags: &GlobalFlags) -> anyhow::Result<()> {
    let registry = SchemaRegistry::new();
    let name = args.kind.registry_name();
    let schema = registry
        .get(name)
        .with_context(|| format!("no schema registered for {name}"))?;
    output(schema, OutputFormat::Json)
}
