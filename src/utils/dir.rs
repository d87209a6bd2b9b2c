use std::{env, io, path::PathBuf};

use anyhow::{Context, Result};

/// Resolves the per-user application data directory and makes sure it exists.
/// The data file and the logs both live here.
pub fn create_application_default_path() -> Result<PathBuf> {
    let path = {
        #[cfg(windows)]
        {
            let mut path = PathBuf::from(
                env::var("APPDATA").context("APPDATA should be present on Windows")?,
            );
            path.push("timeflow");
            path
        }
        #[cfg(target_os = "macos")]
        {
            let mut path = PathBuf::from(env::var("HOME").context("Couldn't find HOME")?);
            path.push("Library/Application Support/timeflow");
            path
        }
        #[cfg(target_os = "linux")]
        {
            let mut path = env::var("XDG_DATA_HOME")
                .map(PathBuf::from)
                .or_else(|_| {
                    env::var("HOME").map(|home| {
                        let mut path = PathBuf::from(home);
                        path.push(".local/share");
                        path
                    })
                })
                .context("Couldn't find neither XDG_DATA_HOME nor HOME")?;
            path.push("timeflow");
            path
        }
    };

    match std::fs::create_dir_all(&path) {
        Ok(_) => Ok(path),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(path),
        Err(v) => Err(v.into()),
    }
}
