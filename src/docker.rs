use crate::error::Result;
use crate::process::run_streamed;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::info;

/// Outcome of a successful `docker build`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltImage {
    pub tag: String,
    /// Image id as reported by the engine, when it printed one.
    pub id: Option<String>,
}

pub struct Docker<'a> {
    bin: &'a str,
}

impl<'a> Docker<'a> {
    pub fn new(bin: &'a str) -> Self {
        Docker { bin }
    }

    /// `docker build -t <tag> <context>`, run from `cwd`.
    pub async fn build_image(&self, tag: &str, context: &str, cwd: &Path) -> Result<BuiltImage> {
        info!("Building docker image...");
        let out = run_streamed(self.bin, &["build", "-t", tag, context], cwd).await?;
        Ok(BuiltImage {
            tag: tag.to_string(),
            id: image_id(&out),
        })
    }
}

fn image_id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // classic builder: "Successfully built 0123abcd"
        // buildkit: "#8 writing image sha256:0123... done"
        Regex::new(r"(?:Successfully built ([0-9a-f]{12,64})\b|writing image sha256:([0-9a-f]{12,64}))")
            .expect("image id regex")
    })
}

/// Pick the image id out of `docker build` output. Last match wins.
pub fn image_id(lines: &[String]) -> Option<String> {
    let re = image_id_pattern();
    lines.iter().rev().find_map(|line| {
        let caps = re.captures(line)?;
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    })
}
