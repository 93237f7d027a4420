use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::config::MapperConfig;
use super::pipeline::MapperError;

/// Result of sorting the audio directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Files already named `<id>.<ext>`, left in place.
    pub identifier_named: Vec<PathBuf>,
    /// Files moved into the staging directory.
    pub moved: Vec<PathBuf>,
    /// Files that could not be moved because the staging directory already had that name.
    pub skipped: Vec<PathBuf>,
}

/// List the supported audio files directly inside `dir`, sorted by filename.
pub fn list_audio_files(dir: &Path, config: &MapperConfig) -> Result<Vec<PathBuf>, MapperError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        // Follows symlinks, so linked clips count as audio files.
        if !path.is_file() {
            continue;
        }
        if config.is_audio_file(&path) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// True if the file stem is a known identifier.
pub fn is_identifier_named(path: &Path, identifiers: &BTreeSet<String>) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| identifiers.contains(stem))
}

/// Move every audio file that is not `<id>.<ext>` into the staging directory.
///
/// The staging directory is created when missing. A file whose name is already
/// taken in staging stays where it is.
pub fn stage_raw_files(
    config: &MapperConfig,
    identifiers: &BTreeSet<String>,
) -> Result<Classification, MapperError> {
    let audio_dir = config.audio_dir();
    let raw_dir = config.raw_dir();
    std::fs::create_dir_all(&raw_dir)?;

    let mut classification = Classification::default();
    for path in list_audio_files(&audio_dir, config)? {
        if is_identifier_named(&path, identifiers) {
            classification.identifier_named.push(path);
            continue;
        }

        let Some(file_name) = path.file_name() else {
            continue;
        };
        let target = raw_dir.join(file_name);
        if target.exists() {
            log::warn!(
                "{} already staged, leaving {} in place",
                target.display(),
                path.display()
            );
            classification.skipped.push(path);
            continue;
        }

        log::debug!("Staging {}", path.display());
        std::fs::rename(&path, &target)?;
        classification.moved.push(target);
    }

    log::info!(
        "Audio directory: {} mapped, {} staged, {} left in place",
        classification.identifier_named.len(),
        classification.moved.len(),
        classification.skipped.len()
    );
    Ok(classification)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::config::MapperConfigBuilder;

    fn setup() -> (tempfile::TempDir, MapperConfig) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("audio")).unwrap();
        let config = MapperConfigBuilder::default()
            .root(dir.path())
            .build()
            .unwrap();
        (dir, config)
    }

    fn ids(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn moves_only_unmapped_audio() {
        let (_dir, config) = setup();
        let audio = config.audio_dir();
        for name in ["a1.wav", "voice_001_あ.wav", "notes.txt", "b1.MP3"] {
            std::fs::write(audio.join(name), name).unwrap();
        }

        let result = stage_raw_files(&config, &ids(&["a1", "b1"])).unwrap();

        assert_eq!(result.moved, vec![config.raw_dir().join("voice_001_あ.wav")]);
        assert_eq!(result.identifier_named.len(), 2);
        assert!(!audio.join("voice_001_あ.wav").exists());
        assert!(config.raw_dir().join("voice_001_あ.wav").exists());
        assert!(audio.join("a1.wav").exists());
        assert!(audio.join("notes.txt").exists());
    }

    #[test]
    fn never_overwrites_staged_file() {
        let (_dir, config) = setup();
        std::fs::create_dir_all(config.raw_dir()).unwrap();
        std::fs::write(config.raw_dir().join("x_す.wav"), b"old").unwrap();
        std::fs::write(config.audio_dir().join("x_す.wav"), b"new").unwrap();

        let result = stage_raw_files(&config, &BTreeSet::new()).unwrap();

        assert_eq!(result.skipped, vec![config.audio_dir().join("x_す.wav")]);
        assert_eq!(std::fs::read(config.raw_dir().join("x_す.wav")).unwrap(), b"old");
        assert!(config.audio_dir().join("x_す.wav").exists());
    }

    #[test]
    fn lists_in_filename_order_and_skips_directories() {
        let (_dir, config) = setup();
        let audio = config.audio_dir();
        std::fs::create_dir_all(audio.join("nested.wav")).unwrap();
        for name in ["c.wav", "a.ogg", "b.m4a"] {
            std::fs::write(audio.join(name), b"").unwrap();
        }

        let names: Vec<_> = list_audio_files(&audio, &config)
            .unwrap()
            .into_iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.ogg", "b.m4a", "c.wav"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_clips_are_audio_files() {
        let (dir, config) = setup();
        let outside = dir.path().join("export.wav");
        std::fs::write(&outside, b"RIFF").unwrap();
        std::os::unix::fs::symlink(&outside, config.audio_dir().join("001_x_あ.wav")).unwrap();

        let result = stage_raw_files(&config, &BTreeSet::new()).unwrap();

        assert_eq!(result.moved, vec![config.raw_dir().join("001_x_あ.wav")]);
        assert!(config.raw_dir().join("001_x_あ.wav").is_file());
    }
}
