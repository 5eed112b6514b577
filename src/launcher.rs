//! Detached process launch.
//!
//! The launcher resolves an entry's command to an executable file, starts it
//! in its own process group with stdio discarded, and returns as soon as the
//! process exists. The child's exit status is never reported; a background
//! thread only reaps it so it does not linger as a zombie.

use crate::entry::AppEntry;
use crate::sources::path_scan::executable_by_current_user;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LaunchError {
    #[error("cannot launch {name}: command '{command}' not found")]
    NotFound { name: String, command: String },
    #[error("cannot launch {name}: {} is not executable", .path.display())]
    NotExecutable { name: String, path: PathBuf },
    #[error("cannot launch {name}: {cause}")]
    Spawn { name: String, cause: String },
}

impl LaunchError {
    /// Name of the entry that failed to start.
    pub fn entry_name(&self) -> &str {
        match self {
            LaunchError::NotFound { name, .. }
            | LaunchError::NotExecutable { name, .. }
            | LaunchError::Spawn { name, .. } => name,
        }
    }
}

/// Acknowledgment that the process was started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launched {
    pub name: String,
    pub program: PathBuf,
    pub pid: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Launcher {
    search_path: Option<OsString>,
}

impl Launcher {
    pub fn new(search_path: Option<OsString>) -> Self {
        Self { search_path }
    }

    pub fn from_env() -> Self {
        Self::new(env::var_os("PATH"))
    }

    pub fn launch(&self, entry: &AppEntry) -> Result<Launched, LaunchError> {
        let program = self.resolve(entry)?;

        let mut command = Command::new(&program);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let child = command.spawn().map_err(|err| LaunchError::Spawn {
            name: entry.name.clone(),
            cause: err.to_string(),
        })?;
        let pid = child.id();
        reap_in_background(child);

        tracing::info!("launched {} ({}) as pid {pid}", entry.name, program.display());
        Ok(Launched {
            name: entry.name.clone(),
            program,
            pid,
        })
    }

    /// Map the entry's command to the file that would be executed.
    pub fn resolve(&self, entry: &AppEntry) -> Result<PathBuf, LaunchError> {
        let token = entry.command.split_whitespace().next().unwrap_or_default();
        let not_found = || LaunchError::NotFound {
            name: entry.name.clone(),
            command: token.to_string(),
        };
        if token.is_empty() {
            return Err(not_found());
        }

        if token.contains('/') {
            let path = PathBuf::from(token);
            if !path.is_file() {
                return Err(not_found());
            }
            if !executable_by_current_user(&path) {
                return Err(LaunchError::NotExecutable {
                    name: entry.name.clone(),
                    path,
                });
            }
            return Ok(path);
        }

        self.find_on_path(token).ok_or_else(not_found)
    }

    fn find_on_path(&self, program: &str) -> Option<PathBuf> {
        let paths = self.search_path.as_ref()?;
        env::split_paths(paths)
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(|dir| dir.join(program))
            .find(|candidate| is_executable_file(candidate))
    }
}

/// Launch with the process's own `PATH`.
pub fn launch(entry: &AppEntry) -> Result<Launched, LaunchError> {
    Launcher::from_env().launch(entry)
}

fn is_executable_file(path: &Path) -> bool {
    path.is_file() && executable_by_current_user(path)
}

fn reap_in_background(mut child: Child) {
    let spawned = thread::Builder::new()
        .name("appdeck-reaper".to_string())
        .spawn(move || {
            let _ = child.wait();
        });
    if let Err(err) = spawned {
        tracing::debug!("could not start reaper thread: {err}");
    }
}
