use std::process::ExitCode;

use scirius_cli::{builtin_registry, load_settings, CommandContext};
use scirius_core::logging::setup_logging;
use scirius_core::SciriusResult;

async fn run() -> SciriusResult<()> {
    let registry = builtin_registry();
    let matches = registry.build_cli().get_matches();

    let settings = load_settings(&matches)?;
    setup_logging(&settings);
    let ctx = CommandContext::open(settings)?;
    registry.execute(&matches, &ctx).await
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
