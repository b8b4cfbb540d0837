use std::path::Path;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

pub struct TestHub {
    dir: TempDir,
}

impl TestHub {
    /// Fresh initialized hub in a temp directory.
    pub fn init() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let hub = Self { dir };
        hub.cmd().arg("init").assert().success();
        hub
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// A hearth command rooted at this hub, isolated from the caller's
    /// environment.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("hearth").expect("hearth binary");
        cmd.current_dir(self.dir.path());
        cmd.env_remove("HEARTH_USER");
        cmd.env_remove("HEARTH_EVENTS");
        cmd.env("HEARTH_HUB", self.dir.path());
        cmd
    }

    /// Command acting as the given member via `HEARTH_USER`.
    pub fn cmd_as(&self, user: &str) -> Command {
        let mut cmd = self.cmd();
        cmd.env("HEARTH_USER", user);
        cmd
    }
}

/// Parse a `--json` envelope and return its `data` payload.
#[allow(dead_code)]
pub fn json_data(stdout: &[u8]) -> Value {
    let envelope: Value = serde_json::from_slice(stdout).expect("json envelope");
    assert_eq!(envelope["schema_version"], "hearth.v1");
    assert_eq!(envelope["status"], "success");
    envelope["data"].clone()
}
