//! Sync orchestration.
//!
//! Runs one batch: fetch ready notes, then per note enrich → write →
//! push → archive, strictly in that order. A note is never marked
//! exported in the source before its content is durably stored and
//! pushed. One bad note never aborts the batch; fatal errors
//! (authentication, source query, configuration) do.

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use keepmark_core::{
    assemble_document, attachment_stem, extract, resolve_unique, sanitize_title, AttachmentFetcher,
    AttachmentLink, Config, Error, GeneratedFields, LabelTransition, NoteEnricher, NoteRecord,
    NoteSource, Result, VcsSink, NOTE_FIELD_SCHEMA,
};

use crate::attachments::extension_for_content_type;
use crate::store::NoteStore;

/// Pipeline stage a note is in, used for failure reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    /// LLM enrichment and field extraction.
    Enriching,
    /// Attachment download and document write.
    Writing,
    /// VCS commit and push.
    Syncing,
    /// Source label transition and archive.
    Archiving,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncStage::Enriching => "enriching",
            SyncStage::Writing => "writing",
            SyncStage::Syncing => "syncing",
            SyncStage::Archiving => "archiving",
        };
        f.write_str(name)
    }
}

/// One note that failed, with the stage it failed in.
#[derive(Debug)]
pub struct NoteFailure {
    pub note_id: String,
    pub stage: SyncStage,
    pub reason: String,
}

/// Outcome of one batch run.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Notes that reached the terminal Done state.
    pub processed: usize,
    /// Per-note recoverable failures, in processing order.
    pub failures: Vec<NoteFailure>,
}

struct StageFailure {
    stage: SyncStage,
    error: Error,
}

trait StageResult<T> {
    fn at(self, stage: SyncStage) -> std::result::Result<T, StageFailure>;
}

impl<T> StageResult<T> for Result<T> {
    fn at(self, stage: SyncStage) -> std::result::Result<T, StageFailure> {
        self.map_err(|error| StageFailure { stage, error })
    }
}

/// Orchestrates one sync batch across the external collaborators.
pub struct SyncEngine {
    config: Arc<Config>,
    source: Arc<dyn NoteSource>,
    enricher: Arc<dyn NoteEnricher>,
    fetcher: Arc<dyn AttachmentFetcher>,
    vcs: Arc<dyn VcsSink>,
    store: NoteStore,
}

impl SyncEngine {
    pub fn new(
        config: Arc<Config>,
        source: Arc<dyn NoteSource>,
        enricher: Arc<dyn NoteEnricher>,
        fetcher: Arc<dyn AttachmentFetcher>,
        vcs: Arc<dyn VcsSink>,
    ) -> Self {
        let store = NoteStore::new(&config);
        Self {
            config,
            source,
            enricher,
            fetcher,
            vcs,
            store,
        }
    }

    /// Run one batch. Notes are processed sequentially; the report counts
    /// notes that completed every stage.
    pub async fn run(&self) -> Result<SyncReport> {
        self.vcs.ensure_local_copy().await?;

        let notes = self.source.fetch_ready(&self.config.ready_label).await?;
        if notes.is_empty() {
            info!("No notes ready for export");
            return Ok(SyncReport::default());
        }
        info!(note_count = notes.len(), "Starting sync batch");

        let mut report = SyncReport::default();
        for note in &notes {
            match self.process_note(note).await {
                Ok(artifact) => {
                    info!(note_id = %note.id, artifact, "Exported note");
                    report.processed += 1;
                }
                Err(failure) if failure.error.is_fatal() => {
                    return Err(failure.error);
                }
                Err(failure) => {
                    warn!(
                        note_id = %note.id,
                        stage = %failure.stage,
                        "Skipping note: {}",
                        failure.error
                    );
                    report.failures.push(NoteFailure {
                        note_id: note.id.clone(),
                        stage: failure.stage,
                        reason: failure.error.to_string(),
                    });
                }
            }
        }

        info!(
            processed = report.processed,
            failed = report.failures.len(),
            "Sync batch finished"
        );
        Ok(report)
    }

    /// Run one note through the full pipeline, returning its artifact name.
    async fn process_note(&self, note: &NoteRecord) -> std::result::Result<String, StageFailure> {
        // Enriching
        let raw = self
            .enricher
            .enrich(&note.title, &note.body)
            .await
            .at(SyncStage::Enriching)?;
        let fields = GeneratedFields::from_extracted(extract(&raw, NOTE_FIELD_SCHEMA))
            .at(SyncStage::Enriching)?;

        // Writing
        let title = if note.title.is_empty() {
            fields.note_title.as_str()
        } else {
            note.title.as_str()
        };
        let existing = self.store.existing_stems().at(SyncStage::Writing)?;
        let artifact = resolve_unique(&sanitize_title(title), &existing);

        let mut links = Vec::with_capacity(note.attachments.len());
        for (index, attachment) in note.attachments.iter().enumerate() {
            let (bytes, content_type) = self
                .fetcher
                .fetch(&attachment.media_url)
                .await
                .at(SyncStage::Writing)?;
            let stem = attachment_stem(&artifact, index);
            let file_name = format!("{stem}{}", extension_for_content_type(&content_type));
            self.store
                .write_attachment(&file_name, &bytes)
                .at(SyncStage::Writing)?;
            links.push(AttachmentLink {
                name: stem,
                relative_path: self.store.attachment_link(&file_name),
            });
        }

        let document = assemble_document(&note.body, &fields, &links);
        self.store
            .write_note(&artifact, &document)
            .at(SyncStage::Writing)?;

        // Syncing
        self.vcs
            .commit_and_push(&format!("Add note {artifact}"))
            .await
            .at(SyncStage::Syncing)?;

        // Archiving: only after durable storage, so a note is never marked
        // exported without its content pushed.
        let transition = LabelTransition {
            remove_label: self.config.ready_label.clone(),
            add_label: self.config.exported_label.clone(),
            archive: true,
        };
        self.source
            .transition(&note.id, &transition)
            .await
            .at(SyncStage::Archiving)?;

        Ok(artifact)
    }
}
