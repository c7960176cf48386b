//! Core TUI application state and event loop.

use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use color_eyre::eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::backend::Backend;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use reqfinder_client::RequirementsClient;
use reqfinder_core::{
    ConfiguredFetcher, QuerySource, RequirementsFetcher, SubmitOutcome, ViewController,
};
use reqfinder_demo::QueryMatcher;
use reqfinder_shared::AppConfig;
use tracing::{debug, error, info};

use crate::ports::{SharedPage, TuiPorts};
use crate::screens::{Action, QueryScreen};
use crate::widgets::{notice_bar, status_bar};

/// Lines moved per scroll key press.
const SCROLL_STEP: u16 = 5;

/// Application state.
pub(crate) struct App {
    /// The query form.
    pub screen: QueryScreen,
    /// Page content written by the controller's ports.
    pub page: SharedPage,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Status message shown in bottom bar when no notice is pending.
    pub status: String,
    /// Whether help overlay is visible.
    pub show_help: bool,
}

impl App {
    pub(crate) fn new(config: &AppConfig, page: SharedPage) -> Self {
        Self {
            screen: QueryScreen::new(
                config.ui.markets.clone(),
                &config.ui.default_market,
                config.api.detailed,
                initial_source(config),
            ),
            page,
            should_quit: false,
            status: "Ready · press ? for help".to_string(),
            show_help: false,
        }
    }
}

fn initial_source(config: &AppConfig) -> QuerySource {
    if config.ui.demo {
        QuerySource::Demo
    } else {
        QuerySource::Live
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Where terminal input comes from.
pub(crate) trait EventSource {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;
    fn read(&mut self) -> io::Result<Event>;
}

/// Input from the real terminal via crossterm.
struct TerminalEvents;

impl EventSource for TerminalEvents {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        event::read()
    }
}

/// Drop every event already queued. Returns how many were dropped.
fn discard_pending<E: EventSource>(events: &mut E) -> io::Result<usize> {
    let mut dropped = 0;
    while events.poll(Duration::ZERO)? {
        events.read()?;
        dropped += 1;
    }
    Ok(dropped)
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Entry point: sets up terminal, runs event loop, restores terminal.
pub(crate) fn run(config: AppConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let fetcher = ConfiguredFetcher::from_result(RequirementsClient::from_config(&config.api));
    match fetcher.ready() {
        Some(client) => info!(endpoint = %client.endpoint(), "starting TUI"),
        None => info!("starting TUI without a usable backend"),
    }

    let page = SharedPage::default();
    let ports = TuiPorts::new(page.clone(), PathBuf::from(&config.export.dir));
    let mut controller = ViewController::new(
        fetcher,
        QueryMatcher::default(),
        ports,
        initial_source(&config),
    );
    let mut app = App::new(&config, page);

    // Setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(
        &mut terminal,
        &runtime,
        &mut controller,
        &mut app,
        &mut TerminalEvents,
    );

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B, F, E>(
    terminal: &mut Terminal<B>,
    runtime: &tokio::runtime::Runtime,
    controller: &mut ViewController<F, TuiPorts>,
    app: &mut App,
    events: &mut E,
) -> Result<()>
where
    B: Backend,
    F: RequirementsFetcher,
    E: EventSource,
{
    loop {
        terminal.draw(|f| draw(f, app))?;

        // Poll for events with 100ms timeout for responsive UI
        if events.poll(Duration::from_millis(100))? {
            if let Event::Key(key) = events.read()? {
                if let Some(action) = handle_key(app, key.code, key.modifiers) {
                    perform(action, terminal, runtime, controller, app, events)?;
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn perform<B, F, E>(
    action: Action,
    terminal: &mut Terminal<B>,
    runtime: &tokio::runtime::Runtime,
    controller: &mut ViewController<F, TuiPorts>,
    app: &mut App,
    events: &mut E,
) -> Result<()>
where
    B: Backend,
    F: RequirementsFetcher,
    E: EventSource,
{
    match action {
        Action::Submit => {
            if !app.page.borrow().submit.enabled {
                return Ok(());
            }
            app.page.borrow_mut().notice = None;
            controller.set_source(app.screen.source());

            let form = app.screen.form();
            let outcome = runtime.block_on(draw_while_pending(
                terminal,
                events,
                app,
                controller.submit(form),
            ))?;
            app.status = match outcome {
                SubmitOutcome::Displayed => "Results ready · s/r to switch view · e to export",
                SubmitOutcome::NoResults => "No matching sample",
                SubmitOutcome::Invalid => "Fill in the form first",
                SubmitOutcome::Failed => "Search failed",
            }
            .to_string();
        }
        Action::ShowView(view) => {
            controller.toggle_view(view);
        }
        Action::Export => match controller.export(Utc::now()) {
            Ok(Some(_)) => {
                if let Some(path) = &app.page.borrow().last_export {
                    app.status = format!("Exported to {}", path.display());
                }
            }
            Ok(None) => app.status = "Nothing to export yet".to_string(),
            Err(e) => error!(error = %e, "export failed"),
        },
        Action::ScrollUp => {
            let mut page = app.page.borrow_mut();
            page.scroll = page.scroll.saturating_sub(SCROLL_STEP);
        }
        Action::ScrollDown => {
            let mut page = app.page.borrow_mut();
            page.scroll = page.scroll.saturating_add(SCROLL_STEP);
        }
    }
    Ok(())
}

/// Keep redrawing while `pending` runs so the loading state stays visible.
///
/// The submit control is disabled for the whole wait, so input arriving in
/// that window is dropped rather than replayed once the control comes back.
async fn draw_while_pending<B, E, Fut>(
    terminal: &mut Terminal<B>,
    events: &mut E,
    app: &App,
    pending: Fut,
) -> Result<Fut::Output>
where
    B: Backend,
    E: EventSource,
    Fut: Future,
{
    tokio::pin!(pending);
    let mut ticker = tokio::time::interval(Duration::from_millis(100));

    let output = loop {
        tokio::select! {
            output = &mut pending => break output,
            _ = ticker.tick() => {
                terminal.draw(|f| draw(f, app))?;
                discard_pending(events)?;
            }
        }
    };

    let dropped = discard_pending(events)?;
    if dropped > 0 {
        debug!(dropped, "ignored input received while loading");
    }
    Ok(output)
}

fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    // Global keybindings (always active)
    match code {
        KeyCode::Char('q') | KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            return None;
        }
        KeyCode::Char('q') if !app.screen.is_editing() => {
            app.should_quit = true;
            return None;
        }
        KeyCode::Char('?') if !app.screen.is_editing() => {
            app.show_help = !app.show_help;
            return None;
        }
        KeyCode::Esc if app.show_help => {
            app.show_help = false;
            return None;
        }
        _ => {}
    }

    // If help is showing, consume any key to dismiss
    if app.show_help {
        app.show_help = false;
        return None;
    }

    app.screen.handle_key(code, modifiers)
}

fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    let page = app.page.borrow();

    let header_text = match &page.last_export {
        Some(path) => format!("Regulatory requirements lookup · last export: {}", path.display()),
        None => "Regulatory requirements lookup".to_string(),
    };
    let header = Paragraph::new(header_text)
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" ReqFinder ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        );
    f.render_widget(header, chunks[0]);

    app.screen.draw(f, chunks[1], &page);

    match &page.notice {
        Some(notice) => f.render_widget(notice_bar(notice), chunks[2]),
        None => f.render_widget(status_bar(&app.status), chunks[2]),
    }

    // Help overlay
    if app.show_help {
        draw_help_overlay(f);
    }
}

fn draw_help_overlay(f: &mut Frame) {
    let area = centered_rect(60, 60, f.area());

    let help_text = vec![
        Line::from("Keybindings").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from("  Tab/S-Tab    Next/previous field"),
        Line::from("  Enter        Edit field / toggle / search"),
        Line::from("  ← →          Change market or source"),
        Line::from("  Space        Toggle detailed"),
        Line::from("  ?            Toggle this help"),
        Line::from("  q / Ctrl-C   Quit"),
        Line::from(""),
        Line::from("Results:").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from("  s / r        Structured / raw view"),
        Line::from("  e            Export as JSON"),
        Line::from("  j/k PgDn/PgUp Scroll"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help · press any key to close ")
                .style(Style::default().bg(Color::DarkGray)),
        )
        .style(Style::default().fg(Color::White).bg(Color::DarkGray));

    // Clear background
    f.render_widget(ratatui::widgets::Clear, area);
    f.render_widget(help, area);
}

/// Create a centered rectangle with percentage width and height.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
