use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::pipeline::MapperError;
use crate::FieldKind;

/// A staged clip copied to its identifier name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamedEntry {
    pub from: String,
    pub to: String,
    #[serde(rename = "itemId")]
    pub item_id: String,
    pub token: String,
    #[serde(rename = "matchedBy")]
    pub matched_by: FieldKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedEntry {
    pub file: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbiguousEntry {
    pub file: String,
    pub token: String,
    #[serde(rename = "candidateItemIds")]
    pub candidate_item_ids: Vec<String>,
}

/// A clip that resolved to an identifier whose audio already exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateEntry {
    pub file: String,
    pub token: String,
    #[serde(rename = "itemId")]
    pub item_id: String,
}

/// Outcome of a mapping run, serialized as `audio_map_report.json`.
///
/// Every staged file lands in exactly one of the four outcome lists. All keys
/// are always written, even when a list is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub renamed: Vec<RenamedEntry>,
    pub unmatched_files: Vec<UnmatchedEntry>,
    pub ambiguous: Vec<AmbiguousEntry>,
    pub duplicates: Vec<DuplicateEntry>,
    /// Sorted identifiers with no `<id>.<ext>` file after the run.
    #[serde(rename = "missing_audio_for_itemIds")]
    pub missing_audio_for_item_ids: Vec<String>,
}

impl Report {
    /// Number of staged files accounted for.
    pub fn staged_total(&self) -> usize {
        self.renamed.len() + self.unmatched_files.len() + self.ambiguous.len() + self.duplicates.len()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            renamed: self.renamed.len(),
            unmatched: self.unmatched_files.len(),
            ambiguous: self.ambiguous.len(),
            duplicates: self.duplicates.len(),
            missing: self.missing_audio_for_item_ids.len(),
        }
    }

    /// Write the report as pretty-printed UTF-8 JSON.
    pub fn write(&self, path: &Path) -> Result<(), MapperError> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self, MapperError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Per-category counts for the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub renamed: usize,
    pub unmatched: usize,
    pub ambiguous: usize,
    pub duplicates: usize,
    pub missing: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- Renamed/copied: {}", self.renamed)?;
        writeln!(f, "- Unmatched:      {}", self.unmatched)?;
        writeln!(f, "- Ambiguous:      {}", self.ambiguous)?;
        writeln!(f, "- Duplicates:     {}", self.duplicates)?;
        write!(f, "- Missing IDs:    {}", self.missing)
    }
}
