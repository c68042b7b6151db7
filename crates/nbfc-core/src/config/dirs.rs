use directories::ProjectDirs;
use std::path::PathBuf;

use crate::{Error, Result};

const APP_NAME: &str = "nbfc-panel";

/// Panel directories following XDG spec
#[derive(Debug, Clone)]
pub struct Directories {
    /// Config directory (~/.config/nbfc-panel)
    pub config: PathBuf,

    /// Config file path (~/.config/nbfc-panel/config.json)
    pub config_file: PathBuf,
}

impl Directories {
    /// Resolve the standard XDG paths for the current user.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if no home directory can be determined.
    pub fn resolve() -> Result<Self> {
        let project = ProjectDirs::from("", "", APP_NAME)
            .ok_or_else(|| Error::Config("cannot determine home directory".to_string()))?;
        Ok(Self::with_base(project.config_dir().to_path_buf()))
    }

    #[must_use]
    pub fn with_base(base: PathBuf) -> Self {
        Self {
            config_file: base.join("config.json"),
            config: base,
        }
    }
}
