use directories::ProjectDirs;
use std::path::PathBuf;

/// Application directories under the XDG base directories
#[derive(Debug, Clone)]
pub struct Directories {
    /// Config directory (~/.config/dropsearch)
    pub config: PathBuf,

    /// Config file path
    pub config_file: PathBuf,

    /// Default dataset for the local backend
    pub dataset_file: PathBuf,
}

impl Directories {
    /// Create a new `Directories` instance with standard XDG paths.
    ///
    /// # Panics
    ///
    /// Panics if the system's project directories cannot be determined.
    #[must_use]
    pub fn new() -> Self {
        let project = ProjectDirs::from("", "", "dropsearch")
            .expect("Failed to determine project directories");

        let config = project.config_dir().to_path_buf();
        Self::with_base(config)
    }

    #[must_use]
    pub fn with_base(base: PathBuf) -> Self {
        Self {
            config_file: base.join("config.json"),
            dataset_file: base.join("dataset.json"),
            config: base,
        }
    }

    /// Create the config directory if it is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn ensure_exists(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config)
    }
}

impl Default for Directories {
    fn default() -> Self {
        Self::new()
    }
}
