//! The capability set a front end exposes to the [`ViewController`](crate::ViewController).
//!
//! Terminal UIs, one-shot CLIs, and test doubles all implement [`ViewPorts`];
//! the controller never touches a rendering environment directly.

use std::fmt;

use reqfinder_render::ViewMode;
use reqfinder_shared::Result;

use crate::export::ExportArtifact;

/// Severity of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message the user must see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// State of the submit trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitState {
    pub enabled: bool,
    pub label: String,
}

/// Output surface driven by the controller.
pub trait ViewPorts {
    /// Replace the results region content with an HTML fragment.
    fn set_results(&mut self, html: &str);

    /// Replace the data-sources panel content with an HTML fragment.
    fn set_sources(&mut self, html: &str);

    /// Reveal the results region.
    fn show_results(&mut self);

    /// Bring the results region into view.
    fn scroll_to_results(&mut self);

    /// Update the submit trigger's enabled state and label.
    fn set_submit(&mut self, state: &SubmitState);

    /// Mark `view` as the active toggle; every other toggle becomes inactive.
    fn set_active_view(&mut self, view: ViewMode);

    /// Enable or disable the view toggles and the export trigger.
    fn set_result_controls(&mut self, enabled: bool);

    /// Show a message to the user.
    fn notify(&mut self, notice: Notice);

    /// Hand an export artifact to the user (download, file write, ...).
    fn deliver(&mut self, artifact: &ExportArtifact) -> Result<()>;
}
