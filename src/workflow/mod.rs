//! Upload → analyze → report state for one user session.
//!
//! All state lives in [`Workflow`] and only changes through
//! [`Workflow::apply`]. Async work ([`run_analysis`]) never touches the
//! state directly; it returns the event to apply, tagged with the generation
//! it was started under so results that arrive after a reset are dropped.

use crate::analysis::{AnalysisRequest, AnalysisResult, normalize_response};
use crate::error::Result;
use crate::ingest::{FileSelection, SelectedFile, UploadedFile, ingest_all};
use crate::llm::Provider;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Selecting,
    Analyzing,
    Report,
    /// Analysis failed; carries the user-facing reason.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    FilesSelected(Vec<PathBuf>),
    FileRemoved(String),
    AnalysisStarted,
    AnalysisSucceeded {
        generation: u64,
        files: Vec<UploadedFile>,
        result: AnalysisResult,
    },
    AnalysisFailed {
        generation: u64,
        message: String,
    },
    ChatOpened,
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workflow {
    phase: Phase,
    selection: FileSelection,
    files: Vec<UploadedFile>,
    result: Option<AnalysisResult>,
    /// Whether a seeded chat session exists for the current result.
    chat: bool,
    generation: u64,
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new()
    }
}

impl Workflow {
    pub fn new() -> Self {
        Self {
            phase: Phase::Selecting,
            selection: FileSelection::default(),
            files: Vec::new(),
            result: None,
            chat: false,
            generation: 0,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn selection(&self) -> &FileSelection {
        &self.selection
    }

    /// Files ingested by the analysis that produced the current result.
    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn chat_open(&self) -> bool {
        self.chat
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn apply(mut self, event: WorkflowEvent) -> Self {
        match event {
            WorkflowEvent::FilesSelected(paths) => {
                if self.phase != Phase::Analyzing {
                    self.selection.add(paths);
                    if matches!(self.phase, Phase::Failed(_)) {
                        self.phase = Phase::Selecting;
                    }
                }
            }
            WorkflowEvent::FileRemoved(name) => {
                if self.phase != Phase::Analyzing {
                    self.selection.remove(&name);
                }
            }
            WorkflowEvent::AnalysisStarted => {
                if self.phase != Phase::Analyzing && !self.selection.is_empty() {
                    self.generation += 1;
                    self.phase = Phase::Analyzing;
                    self.files.clear();
                    self.result = None;
                    self.chat = false;
                }
            }
            WorkflowEvent::AnalysisSucceeded {
                generation,
                files,
                result,
            } => {
                if self.accepts(generation) {
                    self.files = files;
                    self.result = Some(result);
                    self.phase = Phase::Report;
                } else {
                    tracing::debug!(
                        generation,
                        current = self.generation,
                        "dropping stale analysis result"
                    );
                }
            }
            WorkflowEvent::AnalysisFailed {
                generation,
                message,
            } => {
                if self.accepts(generation) {
                    self.phase = Phase::Failed(message);
                } else {
                    tracing::debug!(
                        generation,
                        current = self.generation,
                        "dropping stale analysis failure"
                    );
                }
            }
            WorkflowEvent::ChatOpened => {
                if self.phase == Phase::Report {
                    self.chat = true;
                }
            }
            WorkflowEvent::Reset => {
                self.generation += 1;
                self.phase = Phase::Selecting;
                self.selection.clear();
                self.files.clear();
                self.result = None;
                self.chat = false;
            }
        }
        self
    }

    fn accepts(&self, generation: u64) -> bool {
        self.phase == Phase::Analyzing && generation == self.generation
    }
}

/// Ingest the selection, call the model and normalize its answer.
///
/// Never fails: every error becomes an `AnalysisFailed` event with a
/// user-facing message.
pub async fn run_analysis(provider: &dyn Provider, workflow: &Workflow) -> WorkflowEvent {
    let generation = workflow.generation();
    match analyze(provider, workflow.selection().files()).await {
        Ok((files, result)) => WorkflowEvent::AnalysisSucceeded {
            generation,
            files,
            result,
        },
        Err(err) => {
            tracing::warn!(error = %err, "analysis failed");
            WorkflowEvent::AnalysisFailed {
                generation,
                message: err.to_string(),
            }
        }
    }
}

async fn analyze(
    provider: &dyn Provider,
    selected: &[SelectedFile],
) -> Result<(Vec<UploadedFile>, AnalysisResult)> {
    let files = ingest_all(selected).await?;
    let request = AnalysisRequest::new(&files);
    tracing::debug!(
        provider = provider.name(),
        files = files.len(),
        content_chars = request.content.len(),
        "sending analysis request"
    );
    let raw = provider.analyze(&request).await?;
    let result = normalize_response(&raw)?;
    Ok((files, result))
}
