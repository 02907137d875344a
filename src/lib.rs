//! TermScan — extracts key terms and definitions from PDF study material.
//!
//! The document is sent to the Gemini generative API, which returns a
//! schema-constrained result (title, summary, term/definition pairs). The
//! result can be exported as a styled PDF study guide. All intelligence is
//! delegated to the remote service; this crate is the workflow state
//! machine, two thin service wrappers, and the UI around them.

pub mod analysis;
pub mod export;
pub mod model;
pub mod prefs;
pub mod workflow;

#[cfg(feature = "gui")]
pub mod gui;
