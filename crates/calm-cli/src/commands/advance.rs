use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

use super::shared::{session_response, sync_quietly};

pub async fn run(session_id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let (mut engine, _) = ctx.open(session_id).await?;
    let outcome = engine.advance().await?;
    sync_quietly(&mut engine).await;
    output(&session_response(&engine, None, Some(&outcome)), flags.format)
}
