// Role switch modal rendering.
// Shows the loader, the error line with retry hint, or the selectable role list.

use ratatui::{prelude::*, widgets::*};

use crate::app::App;
use crate::dom::UiAdapter;

/// Draw the role switch modal on top of the current view.
pub fn draw_role_modal<S>(frame: &mut Frame, app: &App<S>) {
    let doc = &app.document;
    let ids = app.roles.ids();
    let area = frame.area();

    let modal_width = 50;
    let modal_height = 14;
    let modal_x = (area.width.saturating_sub(modal_width)) / 2;
    let modal_y = (area.height.saturating_sub(modal_height)) / 2;
    let modal_area = Rect::new(
        modal_x,
        modal_y,
        modal_width.min(area.width),
        modal_height.min(area.height),
    );

    frame.render_widget(Clear, modal_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Loader, error or list
            Constraint::Length(1), // Instructions
        ])
        .split(modal_area);

    let title = format!(" {} ", doc.text(&ids.modal).unwrap_or("Switch role"));
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);

    let retryable = doc.is_visible(&ids.error);

    if doc.is_visible(&ids.loader) {
        let text = Paragraph::new("⏳ Loading...")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow))
            .block(block);
        frame.render_widget(text, chunks[0]);
    } else if retryable {
        let message = doc.text(&ids.error).unwrap_or_default();
        let text = Paragraph::new(format!("❌ {}", message))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Red))
            .block(block);
        frame.render_widget(text, chunks[0]);
    } else if doc.is_visible(&ids.form) {
        let options = doc.options(&ids.select);
        let selected_value = doc.value(&ids.select).unwrap_or_default();

        let items: Vec<ListItem> = options
            .iter()
            .map(|option| {
                let style = if option.disabled {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(Span::styled(option.label.clone(), style))
            })
            .collect();

        let mut list_state = ListState::default();
        list_state.select(
            options
                .iter()
                .position(|o| !o.disabled && o.value == selected_value),
        );

        let list_widget = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        frame.render_stateful_widget(list_widget, chunks[0], &mut list_state);
    } else {
        frame.render_widget(block, chunks[0]);
    }

    let mut hints = vec![
        Span::styled(" Enter", Style::default().fg(Color::Yellow)),
        Span::styled(" = Switch  ", Style::default().fg(Color::DarkGray)),
        Span::styled("↑↓", Style::default().fg(Color::Yellow)),
        Span::styled(" = Navigate  ", Style::default().fg(Color::DarkGray)),
    ];
    if retryable {
        hints.push(Span::styled("R", Style::default().fg(Color::Yellow)));
        hints.push(Span::styled(" = Retry  ", Style::default().fg(Color::DarkGray)));
    }
    hints.push(Span::styled("Esc", Style::default().fg(Color::Yellow)));
    hints.push(Span::styled(" = Cancel ", Style::default().fg(Color::DarkGray)));

    let instructions = Paragraph::new(Line::from(hints)).alignment(Alignment::Center);
    frame.render_widget(instructions, chunks[1]);
}
