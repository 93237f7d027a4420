use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use derive_builder::Builder;

/// Lesson index location, relative to the project root.
pub const DEFAULT_LESSONS_INDEX: &str = "lessons/index.json";

/// Audio directory, relative to the project root.
pub const DEFAULT_AUDIO_DIR: &str = "audio";

/// Staging subdirectory for exports that still need mapping.
pub const DEFAULT_RAW_DIR: &str = "raw";

/// Report filename inside the audio directory.
pub const DEFAULT_REPORT_FILE: &str = "audio_map_report.json";

/// Audio formats the trainer can play, in lookup order.
pub const DEFAULT_EXTENSIONS: &[&str] = &["wav", "mp3", "m4a", "ogg"];

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

/// Parameters for a mapping run.
///
/// Only `root` is required; every other path is relative to it.
///
/// ```rust
/// use vocab_audio_map::mapper::MapperConfigBuilder;
///
/// let config = MapperConfigBuilder::default().root("/srv/app").build()?;
/// assert!(config.audio_dir().ends_with("audio"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct MapperConfig {
    /// Project root containing the lessons and audio directories.
    root: PathBuf,
    #[builder(default = "PathBuf::from(DEFAULT_LESSONS_INDEX)")]
    lessons_index: PathBuf,
    #[builder(default = "PathBuf::from(DEFAULT_AUDIO_DIR)")]
    audio_dir: PathBuf,
    /// Name of the staging directory under `audio_dir`.
    #[builder(default = "PathBuf::from(DEFAULT_RAW_DIR)")]
    raw_dir: PathBuf,
    #[builder(default = "PathBuf::from(DEFAULT_REPORT_FILE)")]
    report_file: PathBuf,
    /// Accepted audio extensions without the leading dot. Compared case-insensitively.
    #[builder(default = "default_extensions()")]
    extensions: Vec<String>,
}

impl MapperConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(extensions) = &self.extensions {
            if extensions.is_empty() {
                return Err("at least one audio extension is required".to_string());
            }
            if extensions.iter().any(|e| e.trim_start_matches('.').is_empty()) {
                return Err("audio extensions must not be empty".to_string());
            }
        }
        if let Some(raw_dir) = &self.raw_dir {
            if raw_dir.as_os_str().is_empty() {
                return Err("raw staging directory name must not be empty".to_string());
            }
        }
        Ok(())
    }
}

impl MapperConfig {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn lessons_index_path(&self) -> PathBuf {
        self.root.join(&self.lessons_index)
    }

    pub fn audio_dir(&self) -> PathBuf {
        self.root.join(&self.audio_dir)
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.audio_dir().join(&self.raw_dir)
    }

    pub fn report_path(&self) -> PathBuf {
        self.audio_dir().join(&self.report_file)
    }

    /// Extensions in lookup order, lowercased and without a leading dot.
    pub fn extensions(&self) -> impl Iterator<Item = String> + '_ {
        self.extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
    }

    /// True if `path` carries one of the accepted audio extensions.
    pub fn is_audio_file(&self, path: &Path) -> bool {
        match path.extension().and_then(OsStr::to_str) {
            Some(ext) => self
                .extensions()
                .any(|accepted| accepted.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }

    /// Render `path` relative to the root with `/` separators, as the report stores it.
    pub fn display_relative(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Find the project root for a run started in `start`.
///
/// Walks up from `start` to the first directory that holds
/// `lessons/index.json`, falling back to `start` itself.
pub fn discover_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join(DEFAULT_LESSONS_INDEX).is_file())
        .unwrap_or(start)
        .to_path_buf()
}
