use std::path::Path;

use log::warn;
use thiserror::Error;

use crate::model::AnalysisResult;

/// Errors raised when a file selection is rejected
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Please upload a valid PDF file.")]
    UnsupportedType,

    #[error("An analysis is already in progress.")]
    Busy,
}

/// The single-screen workflow: exactly one of these holds at any time
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowState {
    Idle,
    Analyzing { file_name: String },
    Result(AnalysisResult),
    Failed { message: String },
}

/// State machine coordinating file intake, analysis, and result display.
///
/// The workflow is the sole owner and writer of [`WorkflowState`]. Only one
/// analysis may be outstanding at a time; selections arriving while
/// `Analyzing` are rejected here rather than relying on the interface
/// hiding the upload control. `Failed` and `Result` end the attempt but not
/// the session: any new valid selection restarts the cycle.
#[derive(Debug, Default)]
pub struct Workflow {
    state: WorkflowState,
}

impl Default for WorkflowState {
    fn default() -> Self {
        WorkflowState::Idle
    }
}

impl Workflow {
    pub fn new() -> Self {
        Self {
            state: WorkflowState::Idle,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self.state, WorkflowState::Analyzing { .. })
    }

    /// Name of the file in flight, if an analysis is outstanding
    pub fn current_file(&self) -> Option<&str> {
        match &self.state {
            WorkflowState::Analyzing { file_name } => Some(file_name),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.state {
            WorkflowState::Result(result) => Some(result),
            _ => None,
        }
    }

    /// Handle a file selection.
    ///
    /// On success the workflow moves to `Analyzing` and the caller must
    /// start exactly one analysis call for the selected file. A rejected
    /// selection leaves the current state untouched.
    pub fn select_file(&mut self, path: &Path) -> Result<(), SelectionError> {
        if self.is_analyzing() {
            warn!("Ignoring file selection while an analysis is in flight");
            return Err(SelectionError::Busy);
        }

        if !is_pdf(path) {
            return Err(SelectionError::UnsupportedType);
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.state = WorkflowState::Analyzing { file_name };
        Ok(())
    }

    /// Record the outcome of the outstanding analysis call.
    ///
    /// Outcomes arriving outside `Analyzing` are dropped; the single
    /// outstanding call rule makes them stale by definition.
    pub fn finish_analysis(&mut self, outcome: Result<AnalysisResult, String>) {
        if !self.is_analyzing() {
            warn!("Dropping analysis outcome received outside the Analyzing state");
            return;
        }

        self.state = match outcome {
            Ok(result) => WorkflowState::Result(result),
            Err(message) => WorkflowState::Failed { message },
        };
    }

    /// Discard the current result or failure and return to `Idle`
    pub fn clear(&mut self) {
        self.state = WorkflowState::Idle;
    }
}

/// Checks whether a path names a PDF file (the one accepted upload type)
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}
