use crate::config::{ApiServerConfig, API_SERVER_IMAGE};
use crate::docker::{BuiltImage, Docker};
use crate::error::{BuildError, Result};
use crate::launcher::{fix_launch_script, LAUNCH_SCRIPT};
use crate::process::run_streamed;
use std::fs;
use tracing::{error, info};

/// Staged output directory, relative to the project root; also the image build context.
pub const STAGE_DIR: &str = "target/docker";

/// Stage the server with sbt, patch its launcher and build the API server image.
pub async fn build(cfg: &ApiServerConfig) -> Result<BuiltImage> {
    let workdir = &cfg.work_dir;
    if !workdir.is_dir() {
        error!(
            "Folder {} does not exist; --work-dir must point to the root of the Sentinel project",
            workdir.display()
        );
        return Err(BuildError::missing("Project root", workdir));
    }

    info!(
        "Building Sentinel API Server Docker container (project root dir: {})",
        workdir.display()
    );

    info!("Building the Server JARs (via SBT)");
    let staged = async {
        run_streamed(&cfg.tools.sbt, &["docker:stage"], workdir).await?;
        info!("Fixing shell script CLASSPATH");
        fix_launch_script(&workdir.join(LAUNCH_SCRIPT))
    }
    .await;
    if let Err(e) = staged {
        error!("{e}");
        error!("Build failure - please see log output and fix the build");
        return Err(e);
    }

    let dockerfile = &cfg.dockerfile;
    info!("Creating Dockerfile from template {}", dockerfile.display());
    if !dockerfile.is_file() {
        error!("Template {} does not exist, aborting.", dockerfile.display());
        return Err(BuildError::missing("Template", dockerfile));
    }
    let target = workdir.join(STAGE_DIR).join("Dockerfile");
    if let Err(e) = fs::copy(dockerfile, &target) {
        error!(
            "Cannot copy {} to {}: {e}",
            dockerfile.display(),
            target.display()
        );
        return Err(e.into());
    }

    let image = match Docker::new(&cfg.tools.docker)
        .build_image(API_SERVER_IMAGE, STAGE_DIR, workdir)
        .await
    {
        Ok(image) => image,
        Err(e) => {
            error!("{e}");
            error!("Failed to generate the Docker image");
            return Err(e);
        }
    };

    match &image.id {
        Some(id) => info!(
            "Successfully built Docker image `{}` ({id}) for API Server",
            image.tag
        ),
        None => info!("Successfully built Docker image `{}` for API Server", image.tag),
    }
    info!(
        "You can now start the container using\n`docker run --link mongo-dev -p 9000:9000 --name sentinel-api -d {}`",
        image.tag
    );
    info!("Docker image build complete.");
    Ok(image)
}
