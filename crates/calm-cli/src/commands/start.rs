use calm_session::AssessmentEngine;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::StartArgs;
use crate::context::AppContext;
use crate::output::output;

use super::shared::session_response;

pub async fn run(args: &StartArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let user = args.user.as_deref().unwrap_or_else(|| ctx.default_user());
    let (engine, outcome) =
        AssessmentEngine::start(ctx.store(), args.session_id.clone(), user).await?;
    output(&session_response(&engine, None, Some(&outcome)), flags.format)
}
