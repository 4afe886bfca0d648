// UI module for rendering the page in the terminal.
// Everything drawn here is read back from the document the controllers mutate.

mod modal;
mod tabs;

use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::app::{ADMIN_SECTION, App};
use crate::dom::UiAdapter;
use crate::state::MessageLevel;
use crate::state::chrome::{ADMIN_SIDEBAR, BACK_TO_TOP, MAIN_MENU_SIDEBAR};

/// At most this many notifications are drawn at once.
const MAX_VISIBLE_MESSAGES: usize = 3;

/// Format a timestamp as relative time (e.g., "2h ago").
pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(*dt);

    if duration.num_days() > 0 {
        format!("{}d ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}

/// Main draw function that renders the entire page.
pub fn draw<S>(frame: &mut Frame, app: &App<S>) {
    let message_rows = app.messages.messages().len().min(MAX_VISIBLE_MESSAGES) as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // Secondary menu
            Constraint::Length(message_rows), // Notifications
            Constraint::Min(1),               // Panel and sidebars
            Constraint::Length(1),            // Status bar
        ])
        .split(frame.area());

    tabs::draw_menu(frame, app, chunks[0]);
    draw_messages(frame, app, chunks[1]);
    draw_body(frame, app, chunks[2]);
    draw_status_bar(frame, app, chunks[3]);

    // Modal last, on top of everything
    if app.document.open_modal().is_some() {
        modal::draw_role_modal(frame, app);
    }
}

fn draw_messages<S>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let messages = app.messages.messages();
    let skip = messages.len().saturating_sub(MAX_VISIBLE_MESSAGES);

    let lines: Vec<Line> = messages
        .iter()
        .skip(skip)
        .filter(|msg| app.document.exists(&msg.id))
        .map(|msg| {
            let (icon, color) = match msg.level {
                MessageLevel::Info => ("ℹ️", Color::Cyan),
                MessageLevel::Success => ("✅", Color::Green),
                MessageLevel::Warning => ("⚠️", Color::Yellow),
                MessageLevel::Error => ("❌", Color::Red),
            };
            Line::from(vec![
                Span::raw(format!(" {} ", icon)),
                Span::styled(msg.text.clone(), Style::default().fg(color)),
                Span::styled(
                    format!("  {}", format_relative_time(&msg.created_at)),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

/// Draw the active panel, flanked by whichever sidebars are slid in.
fn draw_body<S>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let doc = &app.document;
    let main_open = doc.has_class(MAIN_MENU_SIDEBAR, "visible");
    let admin_open = doc.has_class(ADMIN_SIDEBAR, "visible");

    let mut constraints = Vec::new();
    if main_open {
        constraints.push(Constraint::Length(24));
    }
    constraints.push(Constraint::Min(1));
    if admin_open {
        constraints.push(Constraint::Length(24));
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    let mut index = 0;
    if main_open {
        draw_main_sidebar(frame, app, chunks[index]);
        index += 1;
    }
    draw_panel(frame, app, chunks[index]);
    if admin_open {
        draw_admin_sidebar(frame, app, chunks[index + 1]);
    }
}

fn draw_panel<S>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let doc = &app.document;
    let visible = app
        .tabs
        .entries()
        .iter()
        .find(|entry| doc.is_visible(&entry.panel_id()));

    let (title, body) = match visible {
        Some(entry) => (
            format!(" {} ", entry.label),
            doc.text(&entry.panel_id()).unwrap_or_default().to_string(),
        ),
        None => (" ".to_string(), String::new()),
    };

    let scroll = (doc.scroll_top() / 40).min(u16::MAX as u32) as u16;
    let block = Block::default().borders(Borders::ALL).title(title);
    let panel = Paragraph::new(body)
        .wrap(Wrap { trim: true })
        .scroll((scroll, 0))
        .block(block);
    frame.render_widget(panel, area);

    if doc.is_visible(BACK_TO_TOP) && area.height > 2 {
        let label = format!("↑ {} (t) ", doc.text(BACK_TO_TOP).unwrap_or("Top"));
        let hint_area = Rect::new(area.x + 1, area.y + area.height - 2, area.width.saturating_sub(2), 1);
        let hint = Paragraph::new(label)
            .alignment(Alignment::Right)
            .style(Style::default().fg(Color::Cyan));
        frame.render_widget(hint, hint_area);
    }
}

fn draw_main_sidebar<S>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let items: Vec<ListItem> = app
        .tabs
        .entries()
        .iter()
        .map(|entry| ListItem::new(format!("  {}", entry.label)))
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(app.tabs.active_index()));

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Menu "))
        .highlight_style(Style::default().fg(Color::Yellow))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_admin_sidebar<S>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let doc = &app.document;
    let header = doc.text(ADMIN_SECTION).unwrap_or("Admin");
    let collapsed = doc.has_class(ADMIN_SECTION, "collapsed");

    let mut lines = vec![Line::from(Span::styled(
        format!("{} {}", if collapsed { "▸" } else { "▾" }, header),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if !collapsed {
        for entry in app.tabs.entries() {
            lines.push(Line::from(format!("   {}", entry.label)));
        }
    }

    let sidebar = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Admin "));
    frame.render_widget(sidebar, area);
}

/// Draw the status bar with the address bar path and keybinding hints.
fn draw_status_bar<S>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let hints = vec![
        Span::styled(
            format!(" {} ", app.document.current_path()),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("[{}]", app.language),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  ←→ "),
        Span::styled("Tabs", Style::default().fg(Color::DarkGray)),
        Span::raw("  r "),
        Span::styled("Role", Style::default().fg(Color::DarkGray)),
        Span::raw("  l "),
        Span::styled("Language", Style::default().fg(Color::DarkGray)),
        Span::raw("  x "),
        Span::styled("Dismiss", Style::default().fg(Color::DarkGray)),
        Span::raw("  b "),
        Span::styled("Back", Style::default().fg(Color::DarkGray)),
        Span::raw("  s/a "),
        Span::styled("Sidebars", Style::default().fg(Color::DarkGray)),
        Span::raw("  q "),
        Span::styled("Quit", Style::default().fg(Color::DarkGray)),
    ];

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}
