use clap::{Args, Parser};
use std::path::{Path, PathBuf};

pub const API_SERVER_IMAGE: &str = "massenz/sentinel-apiserver";
pub const WEB_PROXY_IMAGE: &str = "massenz/sentinel-nginx";

/// Flags shared by both builders.
#[derive(Args, Debug, Clone, Default)]
pub struct LogArgs {
    /// The directory to use for the log files; if not given, uses stdout.
    #[arg(long)]
    pub logdir: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// Builds the Sentinel API server as a Docker container.
#[derive(Parser, Debug)]
#[command(name = "build-api-server", version)]
pub struct ApiServerArgs {
    /// The location of the Dockerfile; if not an absolute path, it is taken to be
    /// relative to --work-dir.
    #[arg(long, default_value = "build/sentinel.Dockerfile")]
    pub dockerfile: PathBuf,

    /// The root directory of the project; staging needs a set of very specific
    /// sub-folders rooted in this one. Defaults to the current directory.
    #[arg(long)]
    pub work_dir: Option<PathBuf>,

    #[command(flatten)]
    pub log: LogArgs,
}

/// Builds the Sentinel Web UI into an nginx proxy Docker container.
#[derive(Parser, Debug)]
#[command(name = "build-web-proxy", version)]
pub struct WebProxyArgs {
    /// The location of the Dockerfile template.
    #[arg(long, default_value = "build/web-ui.Dockerfile")]
    pub dockerfile: PathBuf,

    /// The location of the static files (HTML, CSS, JS, etc.).
    #[arg(long, short = 'p', default_value = "public")]
    pub public: PathBuf,

    /// The nginx configuration file.
    #[arg(long, short = 'c', default_value = "build/nginx.conf")]
    pub config: PathBuf,

    /// TLS certificate copied next to the nginx configuration, if present.
    #[arg(long, default_value = "build/nginx.crt")]
    pub cert: PathBuf,

    /// TLS key copied next to the nginx configuration, if present.
    #[arg(long, default_value = "build/nginx.key")]
    pub key: PathBuf,

    #[command(flatten)]
    pub log: LogArgs,
}

/// Program names of the external tools the builders shell out to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tools {
    pub docker: String,
    pub sbt: String,
    pub tar: String,
}

impl Default for Tools {
    fn default() -> Self {
        Tools {
            docker: "docker".to_string(),
            sbt: "sbt".to_string(),
            tar: "tar".to_string(),
        }
    }
}

impl Tools {
    pub fn from_env() -> Self {
        Tools {
            docker: resolve_binary("DOCKER_BIN", "docker"),
            sbt: resolve_binary("SBT_BIN", "sbt"),
            tar: resolve_binary("TAR_BIN", "tar"),
        }
    }
}

pub fn resolve_binary(var: &str, default: &str) -> String {
    std::env::var(var)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    pub work_dir: PathBuf,
    pub dockerfile: PathBuf,
    pub tools: Tools,
}

impl ApiServerConfig {
    pub fn from_args(args: &ApiServerArgs, cwd: &Path, tools: Tools) -> Self {
        let work_dir = match &args.work_dir {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => cwd.join(p),
            None => cwd.to_path_buf(),
        };
        ApiServerConfig {
            // an absolute --dockerfile replaces work_dir entirely
            dockerfile: work_dir.join(&args.dockerfile),
            work_dir,
            tools,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebProxyConfig {
    pub public_dir: PathBuf,
    pub dockerfile: PathBuf,
    /// nginx config, certificate and key, in that order.
    pub nginx_files: Vec<PathBuf>,
    pub tools: Tools,
}

impl WebProxyConfig {
    pub fn from_args(args: &WebProxyArgs, cwd: &Path, tools: Tools) -> Self {
        WebProxyConfig {
            public_dir: cwd.join(&args.public),
            dockerfile: cwd.join(&args.dockerfile),
            nginx_files: [&args.config, &args.cert, &args.key]
                .into_iter()
                .map(|p| cwd.join(p))
                .collect(),
            tools,
        }
    }
}

/// `<logdir>/<name>.log`, with a leading `~` expanded.
pub fn log_file_path(logdir: &Path, name: &str) -> PathBuf {
    expand_home(logdir).join(format!("{name}.log"))
}

pub fn expand_home(p: &Path) -> PathBuf {
    if let Ok(rest) = p.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    p.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_server_defaults() {
        let args = ApiServerArgs::parse_from(["build-api-server"]);
        assert_eq!(args.dockerfile, PathBuf::from("build/sentinel.Dockerfile"));
        assert!(args.work_dir.is_none());
        assert!(args.log.logdir.is_none());
        assert!(!args.log.debug);

        let cfg = ApiServerConfig::from_args(&args, Path::new("/src/sentinel"), Tools::default());
        assert_eq!(cfg.work_dir, PathBuf::from("/src/sentinel"));
        assert_eq!(
            cfg.dockerfile,
            PathBuf::from("/src/sentinel/build/sentinel.Dockerfile")
        );
    }

    #[test]
    fn api_server_dockerfile_relative_to_work_dir() {
        let args = ApiServerArgs::parse_from([
            "build-api-server",
            "--work-dir",
            "/opt/sentinel",
            "--dockerfile",
            "docker/api.Dockerfile",
            "--debug",
        ]);
        assert!(args.log.debug);
        let cfg = ApiServerConfig::from_args(&args, Path::new("/elsewhere"), Tools::default());
        assert_eq!(cfg.work_dir, PathBuf::from("/opt/sentinel"));
        assert_eq!(cfg.dockerfile, PathBuf::from("/opt/sentinel/docker/api.Dockerfile"));
    }

    #[test]
    fn api_server_absolute_dockerfile() {
        let args = ApiServerArgs::parse_from([
            "build-api-server",
            "--work-dir",
            "proj",
            "--dockerfile",
            "/tmp/api.Dockerfile",
        ]);
        let cfg = ApiServerConfig::from_args(&args, Path::new("/home/me"), Tools::default());
        assert_eq!(cfg.work_dir, PathBuf::from("/home/me/proj"));
        assert_eq!(cfg.dockerfile, PathBuf::from("/tmp/api.Dockerfile"));
    }

    #[test]
    fn web_proxy_defaults() {
        let args = WebProxyArgs::parse_from(["build-web-proxy"]);
        let cfg = WebProxyConfig::from_args(&args, Path::new("/src/sentinel"), Tools::default());
        assert_eq!(cfg.public_dir, PathBuf::from("/src/sentinel/public"));
        assert_eq!(
            cfg.dockerfile,
            PathBuf::from("/src/sentinel/build/web-ui.Dockerfile")
        );
        assert_eq!(
            cfg.nginx_files,
            vec![
                PathBuf::from("/src/sentinel/build/nginx.conf"),
                PathBuf::from("/src/sentinel/build/nginx.crt"),
                PathBuf::from("/src/sentinel/build/nginx.key"),
            ]
        );
    }

    #[test]
    fn web_proxy_short_flags() {
        let args = WebProxyArgs::parse_from([
            "build-web-proxy",
            "-p",
            "dist",
            "-c",
            "conf/site.conf",
            "--logdir",
            "/var/log/sentinel",
        ]);
        assert_eq!(args.public, PathBuf::from("dist"));
        assert_eq!(args.config, PathBuf::from("conf/site.conf"));
        assert_eq!(args.log.logdir, Some(PathBuf::from("/var/log/sentinel")));
    }

    #[test]
    fn log_file_name_per_tool() {
        assert_eq!(
            log_file_path(Path::new("/var/log"), "build-web-proxy"),
            PathBuf::from("/var/log/build-web-proxy.log")
        );
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/logs")), home.join("logs"));
        }
        assert_eq!(expand_home(Path::new("/abs")), PathBuf::from("/abs"));
    }

    #[test]
    fn default_tools() {
        let t = Tools::default();
        assert_eq!(t.docker, "docker");
        assert_eq!(t.sbt, "sbt");
        assert_eq!(t.tar, "tar");
    }

    #[test]
    fn unset_binary_falls_back() {
        assert_eq!(
            resolve_binary("SENTINEL_BUILD_TEST_UNSET_BIN", "docker"),
            "docker"
        );
    }
}
