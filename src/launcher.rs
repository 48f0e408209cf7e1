//! Patch for the launch script generated by `sbt docker:stage`.
//!
//! The generated script lists every jar on the classpath. The patch collapses
//! that declaration to a `$lib_dir/*` wildcard for the JVM to expand.

use crate::error::{BuildError, Result};
use regex::{NoExpand, Regex};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Launch script location, relative to the project root.
pub const LAUNCH_SCRIPT: &str = "target/docker/files/opt/docker/bin/sentinel";

const WILDCARD_CLASSPATH: &str = r#"declare -r app_classpath="$lib_dir/*""#;

fn classpath_decl() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^[ \t]*declare -r app_classpath=".*"[ \t]*$"#).expect("classpath regex")
    })
}

/// Rewrite the classpath declaration in `script`. Returns `None` when the
/// script has no such declaration.
pub fn patch_classpath(script: &str) -> Option<String> {
    let re = classpath_decl();
    if !re.is_match(script) {
        return None;
    }
    Some(re.replace_all(script, NoExpand(WILDCARD_CLASSPATH)).into_owned())
}

/// Patch the launch script at `path` in place. Returns whether it changed.
pub fn fix_launch_script(path: &Path) -> Result<bool> {
    if !path.is_file() {
        return Err(BuildError::missing("Launch script", path));
    }
    let script = fs::read_to_string(path)?;
    match patch_classpath(&script) {
        Some(patched) if patched != script => {
            // fs::write keeps the existing file, and with it the exec bit
            fs::write(path, patched)?;
            debug!("Rewrote app_classpath in {}", path.display());
            Ok(true)
        }
        Some(_) => Ok(false),
        None => {
            warn!("No app_classpath declaration in {}, left as is", path.display());
            Ok(false)
        }
    }
}
