//! Query lifecycle orchestration: submit, view toggles, and export.
//!
//! ```text
//! Idle ──submit──▶ Loading ──ok──▶ Displayed ──toggle──▶ Displayed
//!                     │                 │
//!                     └──err──▶ Failed ◀┘ (next submit re-enters Loading)
//! ```

use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use tracing::{error, info, instrument, warn};

use reqfinder_demo::{MarketFilter, QueryMatcher};
use reqfinder_render::{ViewMode, render_result, render_sources};
use reqfinder_shared::{ProductQuery, QueryResult, ReqFinderError, Result};

use crate::export::build_artifact;
use crate::fetcher::RequirementsFetcher;
use crate::ports::{Notice, SubmitState, ViewPorts};
use crate::sources::extract_sources;

/// Default label of the submit trigger.
pub const SUBMIT_LABEL: &str = "Search Requirements";

/// Label of the submit trigger while a query is in flight.
pub const LOADING_LABEL: &str = "Searching...";

/// Neutral message when the demo matcher finds nothing.
pub const NO_RESULTS_MESSAGE: &str =
    "No results found for this query. Please try a different product description.";

const MISSING_DESCRIPTION_MESSAGE: &str = "Please describe your product to generate requirements.";
const MISSING_FIELDS_MESSAGE: &str = "Please enter both product type and target market";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Where results come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuerySource {
    /// POST to the requirements backend.
    #[default]
    Live,
    /// Canned samples, no network.
    Demo,
}

/// Query form contents as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryForm {
    /// Free-text product description (live mode sends it as the product type).
    pub description: String,
    /// Market selector value (`all`, `eu`, or a free-form market name).
    pub market: String,
    /// Ask for a detailed answer.
    pub detailed: bool,
}

/// Lifecycle phase of the current query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Displayed,
    Failed,
}

/// What a submit ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new result is current and rendered.
    Displayed,
    /// The demo matcher found nothing; prior state is untouched.
    NoResults,
    /// Input failed validation; nothing was requested.
    Invalid,
    /// The lookup failed; prior results remain on screen.
    Failed,
}

// ---------------------------------------------------------------------------
// SubmitGuard
// ---------------------------------------------------------------------------

/// Holds the submit trigger disabled for its lifetime and restores it on drop,
/// including during unwinding.
struct SubmitGuard<'a, P: ViewPorts> {
    ports: &'a mut P,
    restore: SubmitState,
}

impl<'a, P: ViewPorts> SubmitGuard<'a, P> {
    fn engage(ports: &'a mut P, label: &str) -> Self {
        ports.set_submit(&SubmitState {
            enabled: false,
            label: LOADING_LABEL.to_string(),
        });
        Self {
            ports,
            restore: SubmitState {
                enabled: true,
                label: label.to_string(),
            },
        }
    }
}

impl<P: ViewPorts> Deref for SubmitGuard<'_, P> {
    type Target = P;

    fn deref(&self) -> &P {
        self.ports
    }
}

impl<P: ViewPorts> DerefMut for SubmitGuard<'_, P> {
    fn deref_mut(&mut self) -> &mut P {
        self.ports
    }
}

impl<P: ViewPorts> Drop for SubmitGuard<'_, P> {
    fn drop(&mut self) {
        self.ports.set_submit(&self.restore);
    }
}

// ---------------------------------------------------------------------------
// ViewController
// ---------------------------------------------------------------------------

/// Owns the current result and drives the view ports through each query.
pub struct ViewController<F, P> {
    fetcher: F,
    matcher: QueryMatcher,
    ports: P,
    source: QuerySource,
    current: Option<QueryResult>,
    view: ViewMode,
    phase: Phase,
    submit_label: String,
}

impl<F: RequirementsFetcher, P: ViewPorts> ViewController<F, P> {
    /// Create a controller and paint the initial (empty) state onto `ports`.
    pub fn new(fetcher: F, matcher: QueryMatcher, ports: P, source: QuerySource) -> Self {
        let mut controller = Self {
            fetcher,
            matcher,
            ports,
            source,
            current: None,
            view: ViewMode::Structured,
            phase: Phase::Idle,
            submit_label: SUBMIT_LABEL.to_string(),
        };
        controller.paint_initial();
        controller
    }

    fn paint_initial(&mut self) {
        self.ports.set_submit(&SubmitState {
            enabled: true,
            label: self.submit_label.clone(),
        });
        self.ports.set_sources(&render_sources(None));
        self.ports.set_active_view(self.view);
        self.ports.set_result_controls(false);
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The result currently on display, if any.
    pub fn current(&self) -> Option<&QueryResult> {
        self.current.as_ref()
    }

    /// The active view toggle.
    pub fn view(&self) -> ViewMode {
        self.view
    }

    /// Where submits are answered from.
    pub fn source(&self) -> QuerySource {
        self.source
    }

    /// Switch between live and demo lookups for subsequent submits.
    pub fn set_source(&mut self, source: QuerySource) {
        self.source = source;
    }

    /// Borrow the view ports.
    pub fn ports(&self) -> &P {
        &self.ports
    }

    /// Run one query end to end.
    ///
    /// Validation failures never reach the network. The submit trigger is
    /// disabled while the lookup runs and restored on every exit path.
    #[instrument(skip_all, fields(source = ?self.source, market = %form.market))]
    pub async fn submit(&mut self, form: QueryForm) -> SubmitOutcome {
        let description = form.description.trim();
        let market = form.market.trim();

        let invalid = match self.source {
            QuerySource::Demo if description.is_empty() => Some(MISSING_DESCRIPTION_MESSAGE),
            QuerySource::Live if description.is_empty() || market.is_empty() => {
                Some(MISSING_FIELDS_MESSAGE)
            }
            _ => None,
        };
        if let Some(message) = invalid {
            warn!(message, "query rejected by validation");
            self.ports.notify(Notice::warning(message));
            self.phase = Phase::Idle;
            return SubmitOutcome::Invalid;
        }

        self.phase = Phase::Loading;
        let mut ports = SubmitGuard::engage(&mut self.ports, &self.submit_label);

        let lookup: Result<Option<QueryResult>> = match self.source {
            QuerySource::Demo => Ok(self
                .matcher
                .find(description, &MarketFilter::parse(market))
                .cloned()
                .map(QueryResult::Sample)),
            QuerySource::Live => {
                let query = ProductQuery {
                    product_type: description.to_string(),
                    market: market.to_string(),
                    detailed: form.detailed,
                };
                self.fetcher
                    .fetch(&query)
                    .await
                    .map(|doc| Some(QueryResult::Requirements(doc)))
            }
        };

        let result = match lookup {
            Ok(Some(result)) => result,
            Ok(None) => {
                info!(query = description, "no sample matched");
                ports.notify(Notice::info(NO_RESULTS_MESSAGE));
                self.phase = if self.current.is_some() {
                    Phase::Displayed
                } else {
                    Phase::Idle
                };
                return SubmitOutcome::NoResults;
            }
            Err(e) => {
                error!(error = %e, network = e.is_network(), "requirements lookup failed");
                ports.notify(Notice::error(failure_message(&e)));
                self.phase = Phase::Failed;
                return SubmitOutcome::Failed;
            }
        };

        let html = match render_result(&result, ViewMode::Structured) {
            Ok(html) => html,
            Err(e) => {
                error!(error = %e, "rendering failed");
                ports.notify(Notice::error(e.to_string()));
                self.phase = Phase::Failed;
                return SubmitOutcome::Failed;
            }
        };

        let sources = result.as_requirements().map(extract_sources).unwrap_or_default();

        ports.set_results(&html);
        ports.set_active_view(ViewMode::Structured);
        ports.set_sources(&render_sources(Some(sources.as_slice())));
        ports.set_result_controls(true);
        ports.show_results();
        ports.scroll_to_results();
        drop(ports);

        info!(
            product = %result.product_type(),
            market = %result.market(),
            sources = sources.len(),
            "result displayed"
        );

        self.view = ViewMode::Structured;
        self.current = Some(result);
        self.phase = Phase::Displayed;
        SubmitOutcome::Displayed
    }

    /// Re-render the current result in `view`. Returns `false` (and does
    /// nothing) when there is no current result.
    pub fn toggle_view(&mut self, view: ViewMode) -> bool {
        let Some(result) = self.current.as_ref() else {
            return false;
        };

        match render_result(result, view) {
            Ok(html) => {
                self.ports.set_results(&html);
                self.ports.set_active_view(view);
                self.view = view;
                true
            }
            Err(e) => {
                error!(error = %e, %view, "re-render failed");
                self.ports.notify(Notice::error(e.to_string()));
                false
            }
        }
    }

    /// Export the current result stamped with `at`.
    ///
    /// Returns the delivered file name, or `None` when there is nothing to export.
    pub fn export(&mut self, at: DateTime<Utc>) -> Result<Option<String>> {
        let Some(result) = self.current.as_ref() else {
            return Ok(None);
        };

        let delivered = build_artifact(result, at).and_then(|artifact| {
            self.ports.deliver(&artifact)?;
            Ok(artifact.filename)
        });

        match delivered {
            Ok(filename) => {
                info!(%filename, "result exported");
                self.ports.notify(Notice::info(format!("Exported {filename}")));
                Ok(Some(filename))
            }
            Err(e) => {
                error!(error = %e, "export failed");
                self.ports.notify(Notice::error(format!("Export failed: {e}")));
                Err(e)
            }
        }
    }
}

fn failure_message(err: &ReqFinderError) -> String {
    format!("Error fetching regulation requirements: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::TimeZone;
    use reqfinder_demo::SampleRegistry;
    use reqfinder_render::{NO_SOURCE_TEXT, SOURCES_EMPTY_TEXT, SOURCES_IDLE_TEXT};
    use reqfinder_client::RequirementsClient;
    use reqfinder_shared::{Requirement, RequirementsDocument};
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::fetcher::ConfiguredFetcher;
    use crate::ports::NoticeLevel;
    use crate::ports::testing::RecordingPorts;

    /// Fetcher returning a canned outcome and counting calls.
    struct FakeFetcher {
        calls: AtomicUsize,
        last_query: Mutex<Option<ProductQuery>>,
        respond: fn(&ProductQuery) -> Result<RequirementsDocument>,
    }

    impl FakeFetcher {
        fn new(respond: fn(&ProductQuery) -> Result<RequirementsDocument>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                last_query: Mutex::new(None),
                respond,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl RequirementsFetcher for FakeFetcher {
        fn fetch(
            &self,
            query: &ProductQuery,
        ) -> impl Future<Output = Result<RequirementsDocument>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_query.lock().unwrap() = Some(query.clone());
            let outcome = (self.respond)(query);
            async move { outcome }
        }
    }

    fn wearable(query: &ProductQuery) -> Result<RequirementsDocument> {
        Ok(RequirementsDocument {
            product_type: query.product_type.clone(),
            market: query.market.clone(),
            summary: "CE marking applies.".into(),
            requirements: vec![
                Requirement {
                    name: "CE Marking".into(),
                    category: "Certification".into(),
                    description: "RED".into(),
                    source: Some("https://eur-lex.europa.eu/eli/dir/2014/53/oj".into()),
                },
                Requirement {
                    name: "WEEE".into(),
                    category: "Labeling".into(),
                    description: "Bin symbol".into(),
                    source: None,
                },
            ],
        })
    }

    fn server_down(_: &ProductQuery) -> Result<RequirementsDocument> {
        Err(ReqFinderError::Server {
            status: 500,
            body: "OpenAI API error".into(),
        })
    }

    fn live(fetcher: FakeFetcher) -> ViewController<FakeFetcher, RecordingPorts> {
        ViewController::new(
            fetcher,
            QueryMatcher::default(),
            RecordingPorts::default(),
            QuerySource::Live,
        )
    }

    fn demo() -> ViewController<FakeFetcher, RecordingPorts> {
        ViewController::new(
            FakeFetcher::new(wearable),
            QueryMatcher::new(SampleRegistry::builtin()),
            RecordingPorts::default(),
            QuerySource::Demo,
        )
    }

    fn form(description: &str, market: &str) -> QueryForm {
        QueryForm {
            description: description.into(),
            market: market.into(),
            detailed: false,
        }
    }

    #[test]
    fn initial_paint_shows_idle_state() {
        let controller = live(FakeFetcher::new(wearable));
        let ports = controller.ports();
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(ports.sources.as_deref().unwrap().contains(SOURCES_IDLE_TEXT));
        assert!(!ports.controls_enabled);
        assert_eq!(ports.submit().unwrap().label, SUBMIT_LABEL);
    }

    #[test]
    fn guard_restores_submit_on_unwind() {
        let mut ports = RecordingPorts::default();

        let unwound = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = SubmitGuard::engage(&mut ports, SUBMIT_LABEL);
            panic!("render blew up");
        }));

        assert!(unwound.is_err());
        assert_eq!(ports.submit_history.len(), 2);
        assert!(!ports.submit_history[0].enabled);
        assert!(ports.submit().unwrap().enabled);
        assert_eq!(ports.submit().unwrap().label, SUBMIT_LABEL);
    }

    #[tokio::test]
    async fn empty_description_never_hits_network() {
        let mut controller = live(FakeFetcher::new(wearable));

        let outcome = controller.submit(form("   ", "European Union")).await;

        assert_eq!(outcome, SubmitOutcome::Invalid);
        assert_eq!(controller.fetcher.calls(), 0);
        assert_eq!(controller.phase(), Phase::Idle);
        let ports = controller.ports();
        assert!(ports.submit().unwrap().enabled);
        assert_eq!(ports.submit_history.len(), 1);
        assert_eq!(ports.notices[0].level, NoticeLevel::Warning);
    }

    #[tokio::test]
    async fn live_submit_renders_structured_view_and_sources() {
        let mut controller = live(FakeFetcher::new(wearable));

        let outcome = controller
            .submit(QueryForm {
                description: " Wearable Tech ".into(),
                market: "European Union".into(),
                detailed: true,
            })
            .await;

        assert_eq!(outcome, SubmitOutcome::Displayed);
        assert_eq!(controller.phase(), Phase::Displayed);
        assert_eq!(controller.fetcher.calls(), 1);

        let sent = controller.fetcher.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(sent.product_type, "Wearable Tech");
        assert!(sent.detailed);

        let ports = controller.ports();
        let results = ports.results.as_deref().unwrap();
        assert!(results.contains("Requirements for Wearable Tech in European Union"));
        assert!(results.contains(NO_SOURCE_TEXT));
        assert!(ports.sources.as_deref().unwrap().contains("eur-lex.europa.eu"));
        assert!(ports.results_visible);
        assert_eq!(ports.scrolls, 1);
        assert!(ports.controls_enabled);
        assert_eq!(ports.active_view, Some(ViewMode::Structured));

        // Disabled with the loading label, then restored.
        let history = &ports.submit_history;
        assert_eq!(history[history.len() - 2].label, LOADING_LABEL);
        assert!(!history[history.len() - 2].enabled);
        assert_eq!(ports.submit().unwrap().label, SUBMIT_LABEL);
        assert!(ports.submit().unwrap().enabled);
    }

    #[tokio::test]
    async fn failure_keeps_previous_results_and_restores_submit() {
        let mut controller = live(FakeFetcher::new(wearable));
        controller.submit(form("Wearable Tech", "EU")).await;
        let shown = controller.ports().results.clone();

        controller.fetcher.respond = server_down;
        let outcome = controller.submit(form("Toys", "Brazil")).await;

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(controller.phase(), Phase::Failed);
        assert_eq!(controller.ports().results, shown);
        assert_eq!(controller.current().unwrap().product_type(), "Wearable Tech");

        let ports = controller.ports();
        let last = ports.notices.last().unwrap();
        assert_eq!(last.level, NoticeLevel::Error);
        assert!(last.message.contains("500"));
        assert!(ports.submit().unwrap().enabled);
        assert_eq!(ports.submit().unwrap().label, SUBMIT_LABEL);
    }

    #[tokio::test]
    async fn toggles_rerender_without_network() {
        let mut controller = live(FakeFetcher::new(wearable));
        controller.submit(form("Wearable Tech", "EU")).await;
        let structured = controller.ports().results.clone().unwrap();

        assert!(controller.toggle_view(ViewMode::Raw));
        assert_eq!(controller.ports().active_view, Some(ViewMode::Raw));
        assert!(controller.ports().results.as_deref().unwrap().contains("raw-json"));

        assert!(controller.toggle_view(ViewMode::Structured));
        assert_eq!(controller.ports().results.as_deref(), Some(structured.as_str()));
        assert_eq!(controller.fetcher.calls(), 1);
        assert_eq!(controller.phase(), Phase::Displayed);
    }

    #[test]
    fn toggle_and_export_without_result_are_noops() {
        let mut controller = live(FakeFetcher::new(wearable));
        assert!(!controller.toggle_view(ViewMode::Raw));
        assert_eq!(controller.ports().results_writes, 0);

        let exported = controller.export(Utc::now()).unwrap();
        assert!(exported.is_none());
        assert!(controller.ports().delivered.is_empty());
    }

    #[tokio::test]
    async fn demo_submit_renders_narrative_sample() {
        let mut controller = demo();

        let outcome = controller
            .submit(form("I need info about a fitness band with lithium battery", "us"))
            .await;

        assert_eq!(outcome, SubmitOutcome::Displayed);
        assert_eq!(controller.fetcher.calls(), 0);
        let results = controller.ports().results.clone().unwrap();
        assert!(results.contains("United States Market Access Requirements"));
        assert!(results.contains("<h2>FCC Certification</h2>"));
        assert!(controller.ports().sources.as_deref().unwrap().contains(SOURCES_EMPTY_TEXT));
    }

    #[tokio::test]
    async fn demo_mode_ignores_unusable_backend_config() {
        let bad = reqfinder_shared::ApiConfig {
            base_url: "not a url".into(),
            ..Default::default()
        };
        let fetcher = ConfiguredFetcher::from_result(RequirementsClient::from_config(&bad));
        let mut controller = ViewController::new(
            fetcher,
            QueryMatcher::default(),
            RecordingPorts::default(),
            QuerySource::Demo,
        );

        let outcome = controller
            .submit(form("fitness band with lithium battery", "eu"))
            .await;
        assert_eq!(outcome, SubmitOutcome::Displayed);

        controller.set_source(QuerySource::Live);
        let outcome = controller.submit(form("Wearable Tech", "EU")).await;
        assert_eq!(outcome, SubmitOutcome::Failed);
        let notice = controller.ports().notices.last().unwrap();
        assert!(notice.message.contains("invalid base_url"));
        assert_eq!(controller.current().unwrap().market(), "eu");
    }

    #[tokio::test]
    async fn demo_no_match_is_a_neutral_notice() {
        let mut controller = demo();

        let outcome = controller.submit(form("a random unrelated gadget", "eu")).await;

        assert_eq!(outcome, SubmitOutcome::NoResults);
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(controller.current().is_none());
        let ports = controller.ports();
        assert_eq!(ports.notices[0].level, NoticeLevel::Info);
        assert_eq!(ports.notices[0].message, NO_RESULTS_MESSAGE);
        assert!(ports.submit().unwrap().enabled);
    }

    #[tokio::test]
    async fn new_result_replaces_current_wholesale() {
        let mut controller = live(FakeFetcher::new(wearable));
        controller.submit(form("Wearable Tech", "EU")).await;
        controller.toggle_view(ViewMode::Raw);
        controller.submit(form("Toys", "Brazil")).await;

        let current = controller.current().unwrap();
        assert_eq!(current.product_type(), "Toys");
        assert_eq!(current.market(), "Brazil");
        assert_eq!(controller.view(), ViewMode::Structured);
    }

    #[tokio::test]
    async fn export_delivers_named_artifact() {
        let mut controller = live(FakeFetcher::new(wearable));
        controller.submit(form("Wearable Tech", "European Union")).await;

        let at = Utc.with_ymd_and_hms(2024, 1, 5, 10, 20, 30).unwrap();
        let filename = controller.export(at).unwrap().unwrap();

        assert_eq!(
            filename,
            "regulatory-requirements_wearable-tech_european-union_2024-01-05T10-20-30-000Z.json"
        );
        let delivered = &controller.ports().delivered[0];
        let parsed: QueryResult = serde_json::from_str(&delivered.body).unwrap();
        assert_eq!(&parsed, controller.current().unwrap());
    }

    #[tokio::test]
    async fn independent_controllers_do_not_share_state() {
        let mut a = live(FakeFetcher::new(wearable));
        let b = live(FakeFetcher::new(wearable));
        a.submit(form("Wearable Tech", "EU")).await;
        assert!(a.current().is_some());
        assert!(b.current().is_none());
    }

    // -- Live client against a mock backend --

    async fn mock_backend(response: ResponseTemplate) -> (MockServer, RequirementsClient) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/requirements"))
            .respond_with(response)
            .expect(1)
            .mount(&server)
            .await;
        let endpoint = Url::parse(&format!("{}/api/requirements", server.uri())).unwrap();
        (server, RequirementsClient::new(endpoint).unwrap())
    }

    #[tokio::test]
    async fn live_fixture_flows_to_results_and_sources() {
        let body = std::fs::read_to_string(
            std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("../../../fixtures/json/requirements.fixture.json"),
        )
        .unwrap();
        let (_server, client) = mock_backend(ResponseTemplate::new(200).set_body_string(body)).await;
        let mut controller = ViewController::new(
            client,
            QueryMatcher::default(),
            RecordingPorts::default(),
            QuerySource::Live,
        );

        let outcome = controller.submit(form("Wearable Tech", "European Union")).await;

        assert_eq!(outcome, SubmitOutcome::Displayed);
        let ports = controller.ports();
        let sources = ports.sources.as_deref().unwrap();
        assert_eq!(sources.matches("class=\"data-source\"").count(), 3);
        let results = ports.results.as_deref().unwrap();
        assert_eq!(results.matches("class=\"requirement-card\"").count(), 5);
    }

    #[tokio::test]
    async fn live_server_error_surfaces_status() {
        let (_server, client) =
            mock_backend(ResponseTemplate::new(500).set_body_string("Server error")).await;
        let mut controller = ViewController::new(
            client,
            QueryMatcher::default(),
            RecordingPorts::default(),
            QuerySource::Live,
        );

        let outcome = controller.submit(form("Wearable Tech", "EU")).await;

        assert_eq!(outcome, SubmitOutcome::Failed);
        let notice = controller.ports().notices.last().unwrap();
        assert!(notice.message.starts_with("Error fetching regulation requirements"));
        assert!(notice.message.contains("500"));
        assert!(controller.ports().results.is_none());
    }
}
