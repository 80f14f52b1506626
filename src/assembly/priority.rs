/// Where a section sits in the payload. Lower bands come first: general
/// background early, the task's focal content last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    ProjectContext,
    Planning,
    PriorArtifacts,
    Reviews,
    Focal,
}

impl Section {
    pub fn band(self) -> u16 {
        match self {
            Section::ProjectContext => 10,
            Section::Planning => 20,
            Section::PriorArtifacts => 30,
            Section::Reviews => 40,
            Section::Focal => 50,
        }
    }

    /// Artifact name used in diagnostics.
    pub fn artifact(self) -> &'static str {
        match self {
            Section::ProjectContext => "project_context",
            Section::Planning => "planning_document",
            Section::PriorArtifacts => "prior_artifact",
            Section::Reviews => "review_report",
            Section::Focal => "focal_document",
        }
    }
}

/// A recorded unit awaiting final ordering.
///
/// Entries from one addition share an `anchor` (the key of its first entry)
/// and carry their position in it as `ordinal`. Sorting by
/// `(band, anchor, ordinal, key)` keeps a multi-file addition contiguous and
/// in resolved order, while single-file additions in a band order by path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityEntry {
    pub band: u16,
    pub anchor: String,
    pub ordinal: usize,
    pub key: String,
    pub content: String,
}

impl PriorityEntry {
    pub(crate) fn sort_key(&self) -> (u16, &str, usize, &str) {
        (self.band, self.anchor.as_str(), self.ordinal, self.key.as_str())
    }
}
