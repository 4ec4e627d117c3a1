use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Start(args) => commands::start::run(&args, ctx, flags).await,
        Commands::Resume(args) => commands::resume::run(&args.session_id, ctx, flags).await,
        Commands::Answer(args) => commands::answer::run(&args, ctx, flags).await,
        Commands::Sample(args) => commands::sample::run(&args, ctx, flags).await,
        Commands::Skip(args) => commands::skip::run(&args.session_id, ctx, flags).await,
        Commands::Advance(args) => commands::advance::run(&args.session_id, ctx, flags).await,
        Commands::Abandon(args) => commands::abandon::run(&args.session_id, ctx, flags).await,
        Commands::Report(args) => commands::report::run(&args, ctx, flags).await,
        Commands::Schema(args) => commands::schema::handle(&args, flags),
    }
}
