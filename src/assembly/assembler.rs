//! Single-pass payload builder.
//!
//! Sections are added in any order; `build` sorts everything by band, then
//! by addition group, then by position and key (see [`PriorityEntry`]). The
//! first addition of a key wins, later ones are ignored. One assembler serves
//! one pass and is consumed by `build`.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::assembly::priority::{PriorityEntry, Section};
use crate::discovery::{load_pattern, PatternLibrary};
use crate::document::{load_document, load_documents, DocumentReference};
use crate::ordering::DocumentType;
use crate::security::ProjectBoundary;
use crate::selection::{ApproxTokenCounter, BudgetCandidate, BudgetCollector, BudgetResult, TokenCounter};
use crate::sharding::{resolve_epics, resolve_sharded};
use crate::types::{path_key, ContextError, ContextPayload, PayloadEntry};

pub struct ContextAssembler<T = ApproxTokenCounter> {
    boundary: ProjectBoundary,
    collector: BudgetCollector<T>,
    entries: Vec<PriorityEntry>,
    seen: BTreeSet<String>,
}

impl ContextAssembler<ApproxTokenCounter> {
    pub fn new(project_root: impl AsRef<Path>) -> Result<Self, ContextError> {
        Self::with_tokenizer(project_root, ApproxTokenCounter)
    }
}

impl<T> ContextAssembler<T>
where
    T: TokenCounter,
{
    pub fn with_tokenizer(project_root: impl AsRef<Path>, tokenizer: T) -> Result<Self, ContextError> {
        Ok(Self {
            boundary: ProjectBoundary::new(project_root)?,
            collector: BudgetCollector::new(tokenizer),
            entries: Vec::new(),
            seen: BTreeSet::new(),
        })
    }

    pub fn boundary(&self) -> &ProjectBoundary {
        &self.boundary
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// General project background. Returns the number of entries recorded.
    pub fn add_project_context(
        &mut self,
        path: impl AsRef<Path>,
        required: bool,
    ) -> Result<usize, ContextError> {
        self.add_document(Section::ProjectContext, path.as_ref(), required)
    }

    /// Planning documents found through a named pattern of `library`.
    pub fn add_planning_documents(
        &mut self,
        library: &PatternLibrary,
        name: &str,
        topic: Option<&str>,
    ) -> Result<usize, ContextError> {
        let config = library.get(name).ok_or_else(|| {
            ContextError::configuration(
                format!("unknown pattern '{name}'"),
                "add the pattern to the pattern library or fix its name",
            )
        })?;

        let docs = load_pattern(name, config, &self.boundary, topic)?;
        if docs.is_empty() {
            tracing::warn!(pattern = name, "Optional planning pattern produced no documents");
        }
        Ok(self.record_documents(Section::Planning, docs))
    }

    /// A sharded directory placed in `section`, in resolved order.
    pub fn add_sharded_document(
        &mut self,
        directory: impl AsRef<Path>,
        doc_type: DocumentType,
        section: Section,
        required: bool,
    ) -> Result<usize, ContextError> {
        let directory = directory.as_ref();
        if !self.exists(directory) {
            self.missing(section, directory, required)?;
            return Ok(0);
        }

        let paths = resolve_sharded(directory, doc_type, &self.boundary)?;
        let docs = load_documents(&self.boundary, &paths)?;
        if docs.is_empty() {
            self.missing(section, directory, required)?;
            return Ok(0);
        }
        Ok(self.record_documents(section, docs))
    }

    /// Sharded epics; fails if two shards declare the same epic number.
    pub fn add_sharded_epics(
        &mut self,
        directory: impl AsRef<Path>,
        required: bool,
    ) -> Result<usize, ContextError> {
        let directory = directory.as_ref();
        if !self.exists(directory) {
            self.missing(Section::Planning, directory, required)?;
            return Ok(0);
        }

        let shards = resolve_epics(directory, &self.boundary)?;
        if shards.is_empty() {
            self.missing(Section::Planning, directory, required)?;
            return Ok(0);
        }
        Ok(self.record_documents(Section::Planning, shards.into_iter().map(|s| s.document)))
    }

    /// Artifacts of previous iterations. Each is optional.
    pub fn add_prior_artifacts<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<usize, ContextError> {
        self.add_optional_files(Section::PriorArtifacts, paths)
    }

    /// Validation and review reports. Each is optional.
    pub fn add_review_reports<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<usize, ContextError> {
        self.add_optional_files(Section::Reviews, paths)
    }

    /// The document the task is about; lands last.
    pub fn add_focal_document(
        &mut self,
        path: impl AsRef<Path>,
        required: bool,
    ) -> Result<usize, ContextError> {
        self.add_document(Section::Focal, path.as_ref(), required)
    }

    /// Content that has no file behind it. Returns `false` if the key was
    /// already recorded.
    pub fn add_virtual(
        &mut self,
        key: impl Into<String>,
        content: impl Into<String>,
        section: Section,
    ) -> bool {
        self.record(section, [(key.into(), content.into())]) == 1
    }

    /// Files in caller priority order, cut to `budget` estimated tokens.
    ///
    /// Keys already in the payload are skipped before budgeting so they do not
    /// consume any of it.
    pub fn add_budgeted_files<P: AsRef<Path>>(
        &mut self,
        paths: &[P],
        budget: usize,
        section: Section,
    ) -> Result<BudgetResult, ContextError> {
        let mut candidates = Vec::with_capacity(paths.len());
        let mut queued = BTreeSet::new();
        for path in paths {
            let path = path.as_ref();
            if !self.exists(path) {
                self.missing(section, path, false)?;
                continue;
            }
            let Some(doc) = load_document(&self.boundary, path)? else {
                continue;
            };
            let key = path_key(&doc.path);
            if self.seen.contains(&key) {
                tracing::debug!(key = %key, "Already in payload, not budgeted again");
                continue;
            }
            // Repeats and symlink aliases share a canonical key.
            if !queued.insert(key.clone()) {
                tracing::debug!(key = %key, "Listed twice, budgeted once");
                continue;
            }
            candidates.push(BudgetCandidate::new(key, doc.content));
        }

        let result = self.collector.collect(candidates, budget);
        self.record(
            section,
            result
                .included
                .iter()
                .map(|e| (e.key.clone(), e.content.clone())),
        );
        Ok(result)
    }

    /// Final ordering. Consumes the assembler.
    ///
    /// Entries sort by band first. Within a band, each addition stays
    /// contiguous and keeps the order it was resolved in (a sharded epic
    /// directory stays `epic-1, epic-2, epic-10`); additions are ordered by
    /// the key of their first entry. Single-file additions in one band
    /// therefore order by path, but entries of a multi-file addition do not
    /// interleave by path with other additions.
    pub fn build(self) -> ContextPayload {
        let mut entries = self.entries;
        entries.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        tracing::debug!(entries = entries.len(), "Context payload assembled");

        ContextPayload::from_entries(
            entries
                .into_iter()
                .map(|e| PayloadEntry::new(e.key, e.content))
                .collect(),
        )
    }

    fn add_document(
        &mut self,
        section: Section,
        path: &Path,
        required: bool,
    ) -> Result<usize, ContextError> {
        if !self.exists(path) {
            self.missing(section, path, required)?;
            return Ok(0);
        }

        if self.boundary.join(path).is_dir() {
            return self.add_sharded_document(path, DocumentType::Generic, section, required);
        }

        match load_document(&self.boundary, path)? {
            Some(doc) => Ok(self.record_documents(section, [doc])),
            None => {
                self.missing(section, path, required)?;
                Ok(0)
            }
        }
    }

    fn add_optional_files<P: AsRef<Path>>(
        &mut self,
        section: Section,
        paths: &[P],
    ) -> Result<usize, ContextError> {
        let mut added = 0;
        for path in paths {
            added += self.add_document(section, path.as_ref(), false)?;
        }
        Ok(added)
    }

    /// `symlink_metadata` so a dangling link counts as present and then fails
    /// boundary validation instead of passing as "missing".
    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(self.boundary.join(path)).is_ok()
    }

    fn missing(&self, section: Section, path: &Path, required: bool) -> Result<(), ContextError> {
        let artifact = section.artifact();
        if required {
            return Err(ContextError::configuration(
                format!("required artifact '{artifact}' not found at {}", path.display()),
                format!("create {} or mark '{artifact}' as optional (required=false)", path.display()),
            ));
        }
        tracing::warn!(artifact, path = %path.display(), "Optional content missing, skipping");
        Ok(())
    }

    fn record_documents<I>(&mut self, section: Section, docs: I) -> usize
    where
        I: IntoIterator<Item = DocumentReference>,
    {
        self.record(
            section,
            docs.into_iter().map(|doc| (path_key(&doc.path), doc.content)),
        )
    }

    fn record<I>(&mut self, section: Section, items: I) -> usize
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let band = section.band();
        let mut group_anchor: Option<String> = None;
        let mut recorded = 0;
        for (key, content) in items {
            if !self.seen.insert(key.clone()) {
                tracing::debug!(key = %key, "Duplicate key ignored, first addition wins");
                continue;
            }
            let anchor = group_anchor.get_or_insert_with(|| key.clone()).clone();
            self.entries.push(PriorityEntry {
                band,
                anchor,
                ordinal: recorded,
                key,
                content,
            });
            recorded += 1;
        }
        recorded
    }
}
