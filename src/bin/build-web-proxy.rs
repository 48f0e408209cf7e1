use clap::Parser;
use sentinel_build::{env, logging, web_proxy, Tools, WebProxyArgs, WebProxyConfig};
use std::process::ExitCode;
use tracing::debug;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let args = WebProxyArgs::parse();
    logging::init(&args.log, "build-web-proxy")?;

    let cwd = std::env::current_dir()?;
    for f in env::load_env(&cwd) {
        debug!("Loaded {f}");
    }

    let cfg = WebProxyConfig::from_args(&args, &cwd, Tools::from_env());
    debug!("{cfg:?}");

    Ok(match web_proxy::build(&cfg).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::from(1),
    })
}
