//! Isolated store directories for CLI tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A temporary store that is removed on drop.
pub struct TestEnv {
    temp_dir: TempDir,
    store_dir: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store_dir = temp_dir.path().join("store");
        Self {
            temp_dir,
            store_dir,
        }
    }

    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    /// scratch directory holding the store, usable as a fake home
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// `leaf` pointed at this store, with no logging or editor from the
    /// surrounding environment
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("leaf").expect("leaf binary should build");
        cmd.env("LEAF_DIR", &self.store_dir)
            .env_remove("RUST_LOG")
            .env_remove("VISUAL")
            .env_remove("EDITOR");
        cmd
    }

    /// `leaf` with no explicit store, resolving `~/.leaf` under `home`
    pub fn cmd_with_home(&self, home: &Path) -> Command {
        let mut cmd = self.cmd();
        cmd.env_remove("LEAF_DIR").env("HOME", home);
        cmd
    }

    /// an executable shell script standing in for an editor
    #[cfg(unix)]
    pub fn editor_script(&self, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("Failed to write script");
        let mut perms = std::fs::metadata(&path).expect("script should exist").permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).expect("Failed to make script executable");
        path
    }

    /// raw value stored under `key`
    pub fn stored(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.store_dir.join(key)).ok()
    }

    pub fn write_stored(&self, key: &str, value: &str) {
        std::fs::create_dir_all(&self.store_dir).expect("Failed to create store");
        std::fs::write(self.store_dir.join(key), value).expect("Failed to write store key");
    }

    /// create a note through the CLI and return its id
    pub fn new_note(&self, args: &[&str]) -> String {
        let output = self.cmd().arg("new").args(args).output().expect("leaf new should run");
        assert!(output.status.success(), "leaf new failed: {:?}", output);
        let stdout = String::from_utf8(output.stdout).expect("stdout should be UTF-8");
        stdout.trim()
            .strip_prefix("created note ")
            .expect("leaf new should report the id")
            .to_string()
    }
}
