use std::path::Path;

/// Load `<dir>/.env` into the process environment, if there is one.
/// Variables already set win over the file. Returns the file names loaded.
pub fn load_env(dir: &Path) -> Vec<String> {
    let mut loaded = Vec::new();

    let base = dir.join(".env");
    if base.is_file() && dotenvy::from_path(&base).is_ok() {
        loaded.push(".env".to_string());
    }

    loaded
}
