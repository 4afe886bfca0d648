// Secondary menu rendering.
// Draws the menu entries, highlighting whichever item carries the active class.

use ratatui::{prelude::*, widgets::*};

use crate::app::App;

/// Draw the secondary menu at the top of the screen.
pub fn draw_menu<S>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let doc = &app.document;
    let entries = app.tabs.entries();

    let titles: Vec<Line> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let item = entry.item_id();
            let label = doc.text(&item).unwrap_or(&entry.label);
            let style = if doc.has_class(&item, "active") {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(Span::styled(format!("{} {}", i + 1, label), style))
        })
        .collect();

    let selected = entries
        .iter()
        .position(|e| doc.has_class(&e.item_id(), "active"))
        .unwrap_or(0);

    let menu = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" resource hub ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .select(selected)
        .highlight_style(Style::default().fg(Color::Yellow))
        .divider(Span::raw(" │ "));

    frame.render_widget(menu, area);
}
