//! Reusable TUI widgets.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use reqfinder_core::{Notice, NoticeLevel};

/// Bottom status bar.
pub(crate) fn status_bar(msg: &str) -> Paragraph<'_> {
    Paragraph::new(format!(" {msg}"))
        .style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White),
        )
}

/// Status bar carrying a notice, colored by level.
pub(crate) fn notice_bar(notice: &Notice) -> Paragraph<'static> {
    let bg = match notice.level {
        NoticeLevel::Info => Color::Blue,
        NoticeLevel::Warning => Color::Yellow,
        NoticeLevel::Error => Color::Red,
    };
    Paragraph::new(format!(" {notice}")).style(Style::default().bg(bg).fg(Color::Black))
}
