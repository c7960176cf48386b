//! View ports backed by shared page state the draw loop reads from.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use reqfinder_core::{
    ExportArtifact, Notice, SUBMIT_LABEL, SubmitState, ViewPorts, write_artifact,
};
use reqfinder_render::ViewMode;
use reqfinder_render::text::to_terminal_text;
use reqfinder_shared::Result;
use tracing::warn;

/// Everything the page shows outside the query form.
#[derive(Debug)]
pub(crate) struct PageState {
    /// Results region as terminal text; `None` until the first result.
    pub results: Option<String>,
    /// Data-sources panel as terminal text.
    pub sources: String,
    pub results_visible: bool,
    /// First visible line of the results region.
    pub scroll: u16,
    pub submit: SubmitState,
    pub active_view: ViewMode,
    /// Whether view toggles and export are usable.
    pub controls_enabled: bool,
    /// Latest user-facing message.
    pub notice: Option<Notice>,
    pub last_export: Option<PathBuf>,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            results: None,
            sources: String::new(),
            results_visible: false,
            scroll: 0,
            submit: SubmitState {
                enabled: true,
                label: SUBMIT_LABEL.to_string(),
            },
            active_view: ViewMode::Structured,
            controls_enabled: false,
            notice: None,
            last_export: None,
        }
    }
}

pub(crate) type SharedPage = Rc<RefCell<PageState>>;

/// Writes controller output into a [`SharedPage`].
///
/// Each call holds the borrow only for its own duration, so the draw loop can
/// read the page while a submit is pending.
pub(crate) struct TuiPorts {
    page: SharedPage,
    export_dir: PathBuf,
}

impl TuiPorts {
    pub(crate) fn new(page: SharedPage, export_dir: PathBuf) -> Self {
        Self { page, export_dir }
    }
}

fn as_text(html: &str) -> String {
    to_terminal_text(html).unwrap_or_else(|e| {
        warn!(error = %e, "falling back to raw markup");
        html.to_string()
    })
}

impl ViewPorts for TuiPorts {
    fn set_results(&mut self, html: &str) {
        let text = as_text(html);
        let mut page = self.page.borrow_mut();
        page.results = Some(text);
        page.scroll = 0;
    }

    fn set_sources(&mut self, html: &str) {
        self.page.borrow_mut().sources = as_text(html);
    }

    fn show_results(&mut self) {
        self.page.borrow_mut().results_visible = true;
    }

    fn scroll_to_results(&mut self) {
        self.page.borrow_mut().scroll = 0;
    }

    fn set_submit(&mut self, state: &SubmitState) {
        self.page.borrow_mut().submit = state.clone();
    }

    fn set_active_view(&mut self, view: ViewMode) {
        self.page.borrow_mut().active_view = view;
    }

    fn set_result_controls(&mut self, enabled: bool) {
        self.page.borrow_mut().controls_enabled = enabled;
    }

    fn notify(&mut self, notice: Notice) {
        self.page.borrow_mut().notice = Some(notice);
    }

    fn deliver(&mut self, artifact: &ExportArtifact) -> Result<()> {
        let path = write_artifact(&self.export_dir, artifact)?;
        self.page.borrow_mut().last_export = Some(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqfinder_core::NoticeLevel;

    #[test]
    fn results_are_stored_as_terminal_text() {
        let page = SharedPage::default();
        let mut ports = TuiPorts::new(page.clone(), PathBuf::from("."));
        page.borrow_mut().scroll = 12;

        ports.set_results("<h2>Requirements for Toys in Brazil</h2><p>INMETRO</p>");

        let page = page.borrow();
        let text = page.results.as_deref().unwrap();
        assert!(text.contains("Requirements for Toys in Brazil"));
        assert!(!text.contains("<h2>"));
        assert_eq!(page.scroll, 0);
    }

    #[test]
    fn port_calls_update_shared_page() {
        let page = SharedPage::default();
        let mut ports = TuiPorts::new(page.clone(), PathBuf::from("."));

        ports.set_submit(&SubmitState {
            enabled: false,
            label: "Searching...".into(),
        });
        ports.set_active_view(ViewMode::Raw);
        ports.set_result_controls(true);
        ports.notify(Notice::error("boom"));

        let page = page.borrow();
        assert!(!page.submit.enabled);
        assert_eq!(page.active_view, ViewMode::Raw);
        assert!(page.controls_enabled);
        assert_eq!(page.notice.as_ref().unwrap().level, NoticeLevel::Error);
    }
}
