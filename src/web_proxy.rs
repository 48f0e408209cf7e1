use crate::config::{WebProxyConfig, WEB_PROXY_IMAGE};
use crate::docker::{BuiltImage, Docker};
use crate::error::{BuildError, Result};
use crate::process::run_streamed;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

pub const TARBALL: &str = "sentinel-webui.tar.gz";

/// Directories holding a file with this name are left out of the tarball.
pub const EXCLUDE_TAG: &str = "NO_EXPORT";

#[derive(Debug)]
pub struct WebProxyBuild {
    pub image: BuiltImage,
    /// Build context; left on disk after the run.
    pub staging_dir: PathBuf,
}

/// Package the static files with the nginx config and build the proxy image.
pub async fn build(cfg: &WebProxyConfig) -> Result<WebProxyBuild> {
    info!("Building Sentinel Web UI Docker proxy");

    let pub_dir = &cfg.public_dir;
    info!(
        "Copying all static file to Nginx container from `{}` folder",
        pub_dir.display()
    );
    if !pub_dir.is_dir() {
        error!(
            "Static files directory {} does not exist, aborting.",
            pub_dir.display()
        );
        return Err(BuildError::missing("Static files directory", pub_dir));
    }

    let dockerfile = &cfg.dockerfile;
    info!("Creating Dockerfile from template {}", dockerfile.display());
    if !dockerfile.is_file() {
        error!("Template {} does not exist, aborting.", dockerfile.display());
        return Err(BuildError::missing("Template", dockerfile));
    }

    let workdir = match tempfile::Builder::new().prefix("sentinel-webui-").tempdir() {
        Ok(dir) => dir.keep(),
        Err(e) => {
            error!("Cannot create temporary directory: {e}");
            return Err(e.into());
        }
    };
    info!("Created temporary directory {}", workdir.display());

    let tarball = workdir.join(TARBALL);
    if let Err(e) = archive_static_files(&cfg.tools.tar, pub_dir, &tarball).await {
        error!("{e}");
        error!("Failed to archive the static files");
        return Err(e);
    }
    info!("Compressed all public static files to {}", tarball.display());

    stage_nginx_files(&cfg.nginx_files, &workdir)?;

    let target = workdir.join("Dockerfile");
    if let Err(e) = fs::copy(dockerfile, &target) {
        error!(
            "Cannot copy {} to {}: {e}",
            dockerfile.display(),
            target.display()
        );
        return Err(e.into());
    }

    let context = workdir.to_string_lossy();
    let image = match Docker::new(&cfg.tools.docker)
        .build_image(WEB_PROXY_IMAGE, &context, &workdir)
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
            "Successfully built Docker image `{}` ({id}) for Sentinel Web UI",
            image.tag
        ),
        None => info!(
            "Successfully built Docker image `{}` for Sentinel Web UI",
            image.tag
        ),
    }
    info!(
        "You can now start the container using `docker run --name sentinel-web -d -p 8080:80 {}`",
        image.tag
    );
    info!("Docker image build complete.");

    Ok(WebProxyBuild {
        image,
        staging_dir: workdir,
    })
}

async fn archive_static_files(tar: &str, pub_dir: &Path, tarball: &Path) -> Result<()> {
    let tarball = tarball.to_string_lossy();
    let pub_dir_arg = pub_dir.to_string_lossy();
    let exclude = format!("--exclude-tag-all={EXCLUDE_TAG}");
    run_streamed(
        tar,
        &["caf", &tarball, "-C", &pub_dir_arg, &exclude, "."],
        pub_dir,
    )
    .await?;
    Ok(())
}

/// Copy whichever of `files` exist into `dest`, keeping their file names.
pub fn stage_nginx_files(files: &[PathBuf], dest: &Path) -> Result<Vec<PathBuf>> {
    let mut copied = Vec::new();
    for nf in files {
        let Some(name) = nf.file_name() else {
            continue;
        };
        if !nf.is_file() {
            debug!("Skipping {}, not found", nf.display());
            continue;
        }
        let target = dest.join(name);
        if let Err(e) = fs::copy(nf, &target) {
            error!("Cannot copy {} to {}: {e}", nf.display(), target.display());
            return Err(e.into());
        }
        info!(
            "Copied nginx configuration file {} to {}",
            nf.display(),
            target.display()
        );
        copied.push(target);
    }
    Ok(copied)
}
