use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use super::audio::probe_wav;
use super::classify::{list_audio_files, stage_raw_files};
use super::config::{MapperConfig, MapperConfigBuilderError};
use super::normalize::{normalize, token_from_filename};
use super::policy::FieldPreference;
use super::report::{AmbiguousEntry, DuplicateEntry, RenamedEntry, Report, UnmatchedEntry};
use super::vocab::{TokenIndex, Vocabulary};
use crate::{Candidate, MatchPolicy, Resolution};

#[derive(thiserror::Error, Debug)]
pub enum MapperError {
    #[error("Missing {0}. Run from the project root (where lessons/index.json exists).")]
    IndexNotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid lesson index: {0}")]
    Config(String),
    #[error("Invalid mapper configuration: {0}")]
    Builder(#[from] MapperConfigBuilderError),
}

/// Token lookup for one staged file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMatch {
    /// Token as it appears in the filename.
    pub token: String,
    pub resolution: Resolution,
}

/// Extract, normalize and resolve the token of a staged filename.
pub fn match_file_name<P: MatchPolicy>(file_name: &str, index: &TokenIndex, policy: &P) -> FileMatch {
    let token = token_from_filename(file_name);
    let candidates = index.lookup(&normalize(token));
    FileMatch {
        token: token.to_string(),
        resolution: policy.resolve(candidates),
    }
}

/// Runs the load, stage, match and commit pipeline over one project root.
///
/// ```rust,no_run
/// use vocab_audio_map::mapper::{AudioMapper, MapperConfigBuilder};
///
/// let config = MapperConfigBuilder::default().root(".").build()?;
/// let report = AudioMapper::new(config).run()?;
/// assert_eq!(
///     report.staged_total(),
///     report.renamed.len() + report.unmatched_files.len()
///         + report.ambiguous.len() + report.duplicates.len()
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct AudioMapper<P = FieldPreference> {
    config: MapperConfig,
    policy: P,
}

impl AudioMapper<FieldPreference> {
    /// Create a mapper with the kana-then-kanji preference.
    pub fn new(config: MapperConfig) -> Self {
        Self::with_policy(config, FieldPreference::default())
    }
}

impl<P: MatchPolicy> AudioMapper<P> {
    pub fn with_policy(config: MapperConfig, policy: P) -> Self {
        Self { config, policy }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Map every staged clip and write the report.
    ///
    /// Fails only when the lesson index is missing or the audio directory or
    /// report cannot be accessed; per-file problems end up in the report.
    pub fn run(&self) -> Result<Report, MapperError> {
        let vocab = Vocabulary::load(&self.config)?;

        std::fs::create_dir_all(self.config.audio_dir())?;
        stage_raw_files(&self.config, vocab.identifiers())?;

        let mut present = self.present_audio()?;
        let mut report = Report::default();
        for path in list_audio_files(&self.config.raw_dir(), &self.config)? {
            self.process_file(&path, &vocab, &mut present, &mut report);
        }

        report.missing_audio_for_item_ids = vocab
            .identifiers()
            .iter()
            .filter(|id| !present.contains_key(id.as_str()))
            .cloned()
            .collect();

        let report_path = self.config.report_path();
        report.write(&report_path)?;
        log::info!("Report written to {}", report_path.display());

        Ok(report)
    }

    /// Audio files in the audio directory keyed by stem.
    ///
    /// Extensions are matched case-insensitively, so `a1.WAV` is the audio
    /// for `a1` just like `a1.wav`.
    fn present_audio(&self) -> Result<HashMap<String, PathBuf>, MapperError> {
        let files = list_audio_files(&self.config.audio_dir(), &self.config)?;
        Ok(files
            .into_iter()
            .filter_map(|path| {
                let stem = path.file_stem()?.to_str()?.to_string();
                Some((stem, path))
            })
            .collect())
    }

    fn process_file(
        &self,
        path: &Path,
        vocab: &Vocabulary,
        present: &mut HashMap<String, PathBuf>,
        report: &mut Report,
    ) {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let FileMatch { token, resolution } =
            match_file_name(&file_name, vocab.index(), &self.policy);

        match resolution {
            Resolution::Unmatched => {
                log::debug!("{file_name}: no item for token {token:?}");
                report.unmatched_files.push(UnmatchedEntry {
                    file: file_name,
                    token,
                });
            }
            Resolution::Ambiguous(candidate_item_ids) => {
                log::debug!("{file_name}: {token:?} matches {candidate_item_ids:?}");
                report.ambiguous.push(AmbiguousEntry {
                    file: file_name,
                    token,
                    candidate_item_ids,
                });
            }
            Resolution::Resolved(candidate) => {
                self.commit(path, file_name, token, candidate, present, report);
            }
        }
    }

    /// Copy a resolved clip to `<id>.<ext>` unless audio for the id already exists.
    ///
    /// A clip that cannot be copied is reported as unmatched and stays staged.
    fn commit(
        &self,
        source: &Path,
        file_name: String,
        token: String,
        candidate: Candidate,
        present: &mut HashMap<String, PathBuf>,
        report: &mut Report,
    ) {
        if let Some(existing) = present.get(&candidate.item_id) {
            log::debug!(
                "{file_name}: {} already has {}",
                candidate.item_id,
                existing.display()
            );
            report.duplicates.push(DuplicateEntry {
                file: file_name,
                token,
                item_id: candidate.item_id,
            });
            return;
        }

        let extension = source
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        let destination = self
            .config
            .audio_dir()
            .join(format!("{}.{extension}", candidate.item_id));
        if let Err(e) = copy_with_metadata(source, &destination) {
            log::warn!(
                "{file_name}: cannot copy to {} ({e}), leaving it staged",
                destination.display()
            );
            report.unmatched_files.push(UnmatchedEntry {
                file: file_name,
                token,
            });
            return;
        }

        match probe_wav(&destination) {
            Some(info) => log::debug!(
                "{file_name} -> {} by {} ({:.2}s, {} Hz, {} ch)",
                destination.display(),
                candidate.field.as_str(),
                info.duration_secs,
                info.sample_rate,
                info.channels
            ),
            None => log::debug!(
                "{file_name} -> {} by {}",
                destination.display(),
                candidate.field.as_str()
            ),
        }

        report.renamed.push(RenamedEntry {
            from: self.config.display_relative(source),
            to: self.config.display_relative(&destination),
            item_id: candidate.item_id.clone(),
            token,
            matched_by: candidate.field,
        });
        present.insert(candidate.item_id, destination);
    }
}

/// Copy `source` to `destination`, carrying over the modification time.
///
/// `std::fs::copy` already carries permission bits. A partially written
/// destination is removed when the copy fails.
fn copy_with_metadata(source: &Path, destination: &Path) -> Result<(), MapperError> {
    if let Err(e) = std::fs::copy(source, destination) {
        if destination.is_file() {
            if let Err(cleanup) = std::fs::remove_file(destination) {
                log::warn!("Cannot remove partial copy {}: {cleanup}", destination.display());
            }
        }
        return Err(e.into());
    }
    let modified = std::fs::metadata(source).and_then(|m| m.modified());
    let result = modified.and_then(|time| {
        File::options()
            .write(true)
            .open(destination)
            .and_then(|f| f.set_modified(time))
    });
    if let Err(e) = result {
        log::warn!(
            "Copied {} but could not preserve its timestamp: {e}",
            source.display()
        );
    }
    Ok(())
}
