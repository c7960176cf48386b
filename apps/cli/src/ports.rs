//! Terminal implementation of the controller's view ports.

use std::path::PathBuf;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqfinder_core::{
    ExportArtifact, Notice, NoticeLevel, SubmitState, ViewPorts, write_artifact,
};
use reqfinder_render::ViewMode;
use reqfinder_shared::Result;
use tracing::debug;

/// Collects rendered output for printing and shows a spinner while a query
/// is in flight.
pub(crate) struct CliPorts {
    spinner: Option<ProgressBar>,
    export_dir: PathBuf,
    results: Option<String>,
    sources: Option<String>,
    active_view: ViewMode,
    notices: Vec<Notice>,
    exported: Vec<PathBuf>,
}

impl CliPorts {
    pub(crate) fn new(export_dir: PathBuf) -> Self {
        Self {
            spinner: None,
            export_dir,
            results: None,
            sources: None,
            active_view: ViewMode::Structured,
            notices: Vec::new(),
            exported: Vec::new(),
        }
    }

    pub(crate) fn results(&self) -> Option<&str> {
        self.results.as_deref()
    }

    pub(crate) fn sources(&self) -> Option<&str> {
        self.sources.as_deref()
    }

    pub(crate) fn active_view(&self) -> ViewMode {
        self.active_view
    }

    pub(crate) fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub(crate) fn exported(&self) -> &[PathBuf] {
        &self.exported
    }

    fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }
}

impl ViewPorts for CliPorts {
    fn set_results(&mut self, html: &str) {
        self.results = Some(html.to_string());
    }

    fn set_sources(&mut self, html: &str) {
        self.sources = Some(html.to_string());
    }

    fn show_results(&mut self) {
        debug!("results ready");
    }

    fn scroll_to_results(&mut self) {}

    fn set_submit(&mut self, state: &SubmitState) {
        if state.enabled {
            if let Some(spinner) = self.spinner.take() {
                spinner.finish_and_clear();
            }
        } else {
            self.start_spinner(&state.label);
        }
    }

    fn set_active_view(&mut self, view: ViewMode) {
        self.active_view = view;
    }

    fn set_result_controls(&mut self, _enabled: bool) {}

    /// Errors are kept for the command's exit report instead of printed here.
    fn notify(&mut self, notice: Notice) {
        let line = match notice.level {
            NoticeLevel::Info => Some(notice.to_string()),
            NoticeLevel::Warning => Some(format!("warning: {notice}")),
            NoticeLevel::Error => None,
        };
        if let Some(line) = line {
            match &self.spinner {
                Some(spinner) => spinner.suspend(|| eprintln!("{line}")),
                None => eprintln!("{line}"),
            }
        }
        self.notices.push(notice);
    }

    fn deliver(&mut self, artifact: &ExportArtifact) -> Result<()> {
        let path = write_artifact(&self.export_dir, artifact)?;
        self.exported.push(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deliver_writes_into_export_dir() {
        let dir = std::env::temp_dir().join(format!("reqfinder-cli-{}", std::process::id()));
        let mut ports = CliPorts::new(dir.clone());
        let artifact = ExportArtifact {
            filename: "regulatory-requirements_toys_brazil_x.json".into(),
            body: "{}".into(),
        };

        ports.deliver(&artifact).unwrap();

        assert_eq!(ports.exported(), [dir.join(&artifact.filename)]);
        assert_eq!(std::fs::read_to_string(&ports.exported()[0]).unwrap(), "{}");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn submit_toggle_manages_spinner() {
        let mut ports = CliPorts::new(PathBuf::from("."));
        ports.set_submit(&SubmitState {
            enabled: false,
            label: "Searching...".into(),
        });
        assert!(ports.spinner.is_some());

        ports.notify(Notice::warning("slow backend"));
        ports.set_submit(&SubmitState {
            enabled: true,
            label: "Search Requirements".into(),
        });
        assert!(ports.spinner.is_none());
        assert_eq!(ports.notices().len(), 1);
    }
}
