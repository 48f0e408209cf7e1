use clap::Parser;
use sentinel_build::{api_server, env, logging, ApiServerArgs, ApiServerConfig, Tools};
use std::process::ExitCode;
use tracing::debug;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let args = ApiServerArgs::parse();
    logging::init(&args.log, "build-api-server")?;

    let cwd = std::env::current_dir()?;
    let cfg_dir = args.work_dir.as_deref().map(|p| cwd.join(p)).unwrap_or_else(|| cwd.clone());
    for f in env::load_env(&cfg_dir) {
        debug!("Loaded {f}");
    }

    let cfg = ApiServerConfig::from_args(&args, &cwd, Tools::from_env());
    debug!("{cfg:?}");

    Ok(match api_server::build(&cfg).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::from(1),
    })
}
