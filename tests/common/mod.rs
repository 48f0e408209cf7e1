//! Stand-in `sbt`, `tar` and `docker` scripts shared by the integration tests.
#![allow(dead_code)]

use sentinel_build::launcher::LAUNCH_SCRIPT;
use sentinel_build::Tools;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A directory of stand-in tools; each one appends its argv to `<name>.calls`.
pub struct FakeTools {
    pub dir: TempDir,
}

impl FakeTools {
    pub fn new() -> Self {
        FakeTools {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn script(&self, name: &str, body: &str) -> String {
        let path = self.dir.path().join(name);
        let calls = self.calls_path(name);
        let text = format!(
            "#!/bin/sh\nprintf '%s\\n' \"$*\" >> '{}'\n{body}\n",
            calls.display()
        );
        fs::write(&path, text).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    pub fn calls_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(format!("{name}.calls"))
    }

    pub fn calls(&self, name: &str) -> Vec<String> {
        fs::read_to_string(self.calls_path(name))
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// docker that lists its build context into `docker.context` and succeeds.
    pub fn docker_ok(&self) -> String {
        let listing = self.dir.path().join("docker.context");
        self.script(
            "docker",
            &format!(
                "ls \"$4\" > '{}'\necho 'Step 1/1 : FROM nginx'\necho 'Successfully built 0123456789ab'",
                listing.display()
            ),
        )
    }

    pub fn docker_failing(&self) -> String {
        self.script("docker", "echo 'no space left on device' >&2\nexit 1")
    }

    /// sbt that stages a launch script the way `docker:stage` does.
    pub fn sbt_ok(&self) -> String {
        let script_dir = Path::new(LAUNCH_SCRIPT).parent().unwrap();
        self.script(
            "sbt",
            &format!(
                "mkdir -p '{dir}'\ncat > '{script}' <<'EOF'\n#!/bin/sh\ndeclare -r app_classpath=\"$lib_dir/a.jar:$lib_dir/b.jar\"\nEOF\necho '[success] Total time: 3 s'",
                dir = script_dir.display(),
                script = LAUNCH_SCRIPT,
            ),
        )
    }

    pub fn sbt_failing(&self) -> String {
        self.script("sbt", "echo '[error] Compilation failed'\nexit 1")
    }

    /// tar that just creates the archive file it was asked for.
    pub fn tar_ok(&self) -> String {
        self.script("tar", ": > \"$2\"")
    }

    pub fn tools(&self, docker: String, sbt: String, tar: String) -> Tools {
        Tools { docker, sbt, tar }
    }

    pub fn context_listing(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("docker.context"))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// sbt that stages the launch script but leaves a directory where the
    /// Dockerfile has to be copied.
    pub fn sbt_blocking_dockerfile(&self) -> String {
        let script_dir = Path::new(LAUNCH_SCRIPT).parent().unwrap();
        self.script(
            "sbt",
            &format!(
                "mkdir -p '{dir}' target/docker/Dockerfile\necho 'declare -r app_classpath=\"x.jar\"' > '{script}'",
                dir = script_dir.display(),
                script = LAUNCH_SCRIPT,
            ),
        )
    }
}
