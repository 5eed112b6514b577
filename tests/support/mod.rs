#![allow(dead_code)]

use anyhow::{Context, Result};
use appdeck::{ScanConfig, Taxonomy};
use std::ffi::OsString;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;

// Throwaway machine layout: descriptor directories plus search-path
// directories, all under one temp root that is removed on drop.
pub struct Fixture {
    pub root: TempDir,
}

impl Fixture {
    pub fn new() -> Result<Self> {
        Ok(Self {
            root: TempDir::new().context("failed to allocate fixture root")?,
        })
    }

    pub fn dir(&self, name: &str) -> Result<PathBuf> {
        let path = self.root.path().join(name);
        fs::create_dir_all(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        Ok(path)
    }

    pub fn descriptor(&self, dir: &str, file: &str, contents: &str) -> Result<PathBuf> {
        let path = self.dir(dir)?.join(file);
        fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }

    pub fn app(&self, dir: &str, file: &str, name: &str, exec: &str, comment: &str) -> Result<()> {
        let contents = format!(
            "[Desktop Entry]\nType=Application\nName={name}\nExec={exec}\nComment={comment}\n"
        );
        self.descriptor(dir, file, &contents)?;
        Ok(())
    }

    pub fn executable(&self, dir: &str, name: &str) -> Result<PathBuf> {
        self.script(dir, name, "#!/bin/sh\nexit 0\n")
    }

    pub fn script(&self, dir: &str, name: &str, body: &str) -> Result<PathBuf> {
        let path = self.dir(dir)?.join(name);
        fs::write(&path, body).with_context(|| format!("failed to write {}", path.display()))?;
        make_executable(&path)?;
        Ok(path)
    }

    pub fn search_path(&self, dirs: &[&str]) -> OsString {
        let joined: Vec<PathBuf> = dirs.iter().map(|d| self.root.path().join(d)).collect();
        std::env::join_paths(joined).expect("fixture paths contain no separators")
    }

    pub fn config(&self, manifest_dirs: &[&str], path_dirs: &[&str]) -> ScanConfig {
        ScanConfig {
            manifest_dirs: manifest_dirs
                .iter()
                .map(|d| self.root.path().join(d))
                .collect(),
            search_path: Some(self.search_path(path_dirs)),
            path_cap: appdeck::sources::path_scan::DEFAULT_PATH_CAP,
            taxonomy: Taxonomy::builtin(),
        }
    }
}

pub fn make_executable(path: &Path) -> Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)?;
    Ok(())
}

pub fn wait_for_file(path: &Path, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if path.is_file() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(25));
    }
    path.is_file()
}
