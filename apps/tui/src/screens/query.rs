//! Query screen: product form, results region, and data-sources panel.

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use reqfinder_core::{QueryForm, QuerySource};
use reqfinder_render::ViewMode;

use crate::ports::PageState;

/// Which form control is focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Description,
    Market,
    Detailed,
    Source,
    Submit,
}

/// What the app loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    Submit,
    ShowView(ViewMode),
    Export,
    ScrollUp,
    ScrollDown,
}

pub(crate) struct QueryScreen {
    description: String,
    markets: Vec<String>,
    market_idx: usize,
    detailed: bool,
    source: QuerySource,
    focused: Field,
    editing: bool,
}

impl QueryScreen {
    /// Build the form. `default_market` is preselected when it is in `markets`.
    pub(crate) fn new(
        markets: Vec<String>,
        default_market: &str,
        detailed: bool,
        source: QuerySource,
    ) -> Self {
        let markets = if markets.is_empty() {
            vec![default_market.to_string()]
        } else {
            markets
        };
        let market_idx = markets
            .iter()
            .position(|m| m.eq_ignore_ascii_case(default_market))
            .unwrap_or(0);

        Self {
            description: String::new(),
            markets,
            market_idx,
            detailed,
            source,
            focused: Field::Description,
            editing: false,
        }
    }

    pub(crate) fn is_editing(&self) -> bool {
        self.editing
    }

    pub(crate) fn source(&self) -> QuerySource {
        self.source
    }

    /// Snapshot of the form for a submit.
    pub(crate) fn form(&self) -> QueryForm {
        QueryForm {
            description: self.description.clone(),
            market: self.markets[self.market_idx].clone(),
            detailed: self.detailed,
        }
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect, page: &PageState) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(5), // Description
                Constraint::Length(3), // Market
                Constraint::Length(3), // Detailed
                Constraint::Length(3), // Source
                Constraint::Length(3), // Submit
                Constraint::Length(2), // Hint
                Constraint::Min(3),    // Data sources
            ])
            .split(columns[0]);

        let description = Paragraph::new(self.description.as_str())
            .wrap(Wrap { trim: false })
            .block(self.field_block(Field::Description, " Product description "));
        f.render_widget(description, left[0]);

        let market = Paragraph::new(format!(
            "< {} >  (← → to change)",
            self.markets[self.market_idx]
        ))
        .block(self.field_block(Field::Market, " Target market "));
        f.render_widget(market, left[1]);

        let detailed = Paragraph::new(if self.detailed { "[x] detailed" } else { "[ ] detailed" })
            .block(self.field_block(Field::Detailed, " Detail "));
        f.render_widget(detailed, left[2]);

        let source = Paragraph::new(match self.source {
            QuerySource::Live => "< live backend >",
            QuerySource::Demo => "< demo samples >",
        })
        .block(self.field_block(Field::Source, " Source "));
        f.render_widget(source, left[3]);

        let submit_style = if !page.submit.enabled {
            Style::default().fg(Color::DarkGray)
        } else if self.focused == Field::Submit {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let submit = Paragraph::new(page.submit.label.as_str())
            .alignment(Alignment::Center)
            .style(submit_style)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(submit, left[4]);

        let hint = if self.editing {
            "Type to edit · Enter to search · Esc to stop editing"
        } else {
            "Tab next field · s/r view · e export · ? help"
        };
        let hint = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(hint, left[5]);

        let sources = Paragraph::new(page.sources.as_str())
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(" Data sources "));
        f.render_widget(sources, left[6]);

        self.draw_results(f, columns[1], page);
    }

    fn draw_results(&self, f: &mut Frame, area: Rect, page: &PageState) {
        let toggle = |view: ViewMode| {
            let style = if !page.controls_enabled {
                Style::default().fg(Color::DarkGray)
            } else if page.active_view == view {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Span::styled(format!(" {view} "), style)
        };
        let title = Line::from(vec![
            Span::raw(" Results "),
            toggle(ViewMode::Structured),
            toggle(ViewMode::Raw),
        ]);
        let block = Block::default().borders(Borders::ALL).title(title);

        let body = match (&page.results, page.results_visible) {
            (Some(text), true) => Paragraph::new(text.as_str())
                .wrap(Wrap { trim: false })
                .scroll((page.scroll, 0)),
            _ => Paragraph::new("Describe a product and press Enter to search.")
                .style(Style::default().fg(Color::DarkGray)),
        };
        f.render_widget(body.block(block), area);
    }

    fn field_block(&self, field: Field, title: &'static str) -> Block<'static> {
        let style = if self.focused == field && self.editing {
            Style::default().fg(Color::Yellow)
        } else if self.focused == field {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(style)
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode, _modifiers: KeyModifiers) -> Option<Action> {
        if self.editing {
            match code {
                KeyCode::Esc => self.editing = false,
                KeyCode::Tab => {
                    self.editing = false;
                    self.next_field();
                }
                KeyCode::Enter => {
                    self.editing = false;
                    return Some(Action::Submit);
                }
                KeyCode::Backspace => {
                    self.description.pop();
                }
                KeyCode::Char(c) => self.description.push(c),
                _ => {}
            }
            return None;
        }

        match code {
            KeyCode::Enter => match self.focused {
                Field::Description => self.editing = true,
                Field::Market => self.cycle_market(1),
                Field::Detailed => self.detailed = !self.detailed,
                Field::Source => self.toggle_source(),
                Field::Submit => return Some(Action::Submit),
            },
            KeyCode::Char(' ') if self.focused == Field::Detailed => self.detailed = !self.detailed,
            KeyCode::Left if self.focused == Field::Market => self.cycle_market(-1),
            KeyCode::Right if self.focused == Field::Market => self.cycle_market(1),
            KeyCode::Left | KeyCode::Right if self.focused == Field::Source => self.toggle_source(),
            KeyCode::Tab | KeyCode::Down => self.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.prev_field(),
            KeyCode::Char('s') => return Some(Action::ShowView(ViewMode::Structured)),
            KeyCode::Char('r') => return Some(Action::ShowView(ViewMode::Raw)),
            KeyCode::Char('e') => return Some(Action::Export),
            KeyCode::PageUp | KeyCode::Char('k') => return Some(Action::ScrollUp),
            KeyCode::PageDown | KeyCode::Char('j') => return Some(Action::ScrollDown),
            _ => {}
        }
        None
    }

    fn cycle_market(&mut self, step: isize) {
        let len = self.markets.len() as isize;
        self.market_idx = (self.market_idx as isize + step).rem_euclid(len) as usize;
    }

    fn toggle_source(&mut self) {
        self.source = match self.source {
            QuerySource::Live => QuerySource::Demo,
            QuerySource::Demo => QuerySource::Live,
        };
    }

    fn next_field(&mut self) {
        self.focused = match self.focused {
            Field::Description => Field::Market,
            Field::Market => Field::Detailed,
            Field::Detailed => Field::Source,
            Field::Source => Field::Submit,
            Field::Submit => Field::Description,
        };
    }

    fn prev_field(&mut self) {
        self.focused = match self.focused {
            Field::Description => Field::Submit,
            Field::Market => Field::Description,
            Field::Detailed => Field::Market,
            Field::Source => Field::Detailed,
            Field::Submit => Field::Source,
        };
    }
}
