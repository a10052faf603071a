use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use tryout_core::models::FieldKind;
use tryout_core::utils::truncate_string;
use tryout_core::{Field, Step};

use crate::app::{App, AppState, FormFocus};

use super::styles;

/// Width of the label column on the form
const LABEL_WIDTH: usize = 22;

/// Visible width of an input box
const INPUT_WIDTH: usize = 32;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Step indicator
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, chunks[0]);
    render_steps(frame, app, chunks[1]);
    if app.wizard.is_success() {
        render_confirmation(frame, app, chunks[2]);
    } else {
        render_form(frame, app, chunks[2]);
    }
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, area: Rect) {
    let title = "  Tryout Registration";
    let help_hint = "[F1] Help";

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title.len() as u16 + help_hint.len() as u16 + 4)
                as usize,
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_steps(frame: &mut Frame, app: &App, area: Rect) {
    let current = app.wizard.step();
    let done = app.wizard.is_success();

    let mut spans = vec![Span::raw(" ")];
    for (i, step) in Step::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" → ", styles::muted_style()));
        }
        let label = format!("{}. {}", step.number(), step.title());
        let is_current = !done && *step == current;
        let is_done = done || *step < current;
        spans.push(Span::styled(label, styles::step_style(is_current, is_done)));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Text shown inside an input box for a field
fn field_display(app: &App, field: Field) -> (String, Style) {
    let value = app.wizard.record().value(field);
    if !value.is_empty() {
        let shown = match field.kind() {
            FieldKind::Choice => format!("◀ {} ▶", value),
            _ => value.to_string(),
        };
        return (truncate_string(&shown, INPUT_WIDTH), styles::input_style());
    }

    let placeholder = match field.kind() {
        FieldKind::Choice => "◀ Select ▶",
        FieldKind::Phone => "(555) 555-5555",
        FieldKind::Email => "name@example.com",
        FieldKind::Zip => "5 digits",
        FieldKind::Text => "",
    };
    (placeholder.to_string(), styles::muted_style())
}

fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let error_height = if app.wizard.error().is_some() { 4 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(error_height)])
        .split(area);

    let step = app.wizard.step();
    let mut lines = vec![Line::from("")];

    for field in Field::for_step(step) {
        let focused = app.focus == FormFocus::Field(*field);
        let (text, text_style) = field_display(app, *field);
        let box_style = if focused {
            styles::selected_style()
        } else {
            text_style
        };
        let cursor = if focused && field.kind() != FieldKind::Choice {
            "▌"
        } else {
            ""
        };

        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:<width$}", format!("{}:", field.label()), width = LABEL_WIDTH),
                styles::muted_style(),
            ),
            Span::styled("[", styles::muted_style()),
            Span::styled(
                format!("{:<width$}", format!("{}{}", text, cursor), width = INPUT_WIDTH),
                box_style,
            ),
            Span::styled("]", styles::muted_style()),
        ]));

        if let Some(hint) = app.wizard.field_error(*field) {
            lines.push(Line::from(vec![
                Span::raw(" ".repeat(LABEL_WIDTH + 3)),
                Span::styled(hint, styles::error_style()),
            ]));
        }
    }

    lines.push(Line::from(""));
    lines.push(render_buttons(app));

    let block = Block::default()
        .title(format!(" Step {} of 3: {} ", step.number(), step.title()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(app.focus != FormFocus::Error));

    frame.render_widget(Paragraph::new(lines).block(block), chunks[0]);

    if let Some(error) = app.wizard.error() {
        render_error_region(frame, app, error, chunks[1]);
    }
}

fn button(label: &str, focused: bool, enabled: bool) -> Vec<Span<'static>> {
    let style = if focused {
        styles::selected_style()
    } else if enabled {
        styles::input_style()
    } else {
        styles::disabled_style()
    };
    let text = if focused {
        format!(" ▶ {} ◀ ", label)
    } else {
        format!("   {}   ", label)
    };
    vec![Span::raw("["), Span::styled(text, style), Span::raw("]")]
}

fn render_buttons(app: &App) -> Line<'static> {
    let step = app.wizard.step();
    let mut spans: Vec<Span<'static>> = vec![Span::raw(" ".repeat(LABEL_WIDTH + 2))];

    if step != Step::Player {
        spans.extend(button("Back", app.focus == FormFocus::Back, true));
        spans.push(Span::raw("  "));
    }

    if step.is_last() {
        let label = if app.wizard.is_submitting() {
            "Submitting..."
        } else {
            "Submit"
        };
        spans.extend(button(label, app.focus == FormFocus::Submit, app.wizard.can_submit()));
    } else {
        spans.extend(button("Next", app.focus == FormFocus::Next, app.wizard.can_advance()));
    }

    Line::from(spans)
}

fn render_error_region(frame: &mut Frame, app: &App, error: &str, area: Rect) {
    let focused = app.focus == FormFocus::Error;
    let title = if focused {
        " Error - press any key "
    } else {
        " Error "
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(styles::error_border_style(focused));

    let paragraph = Paragraph::new(Line::from(Span::styled(
        format!(" {}", error),
        styles::error_style(),
    )))
    .wrap(Wrap { trim: true })
    .block(block);

    frame.render_widget(paragraph, area);
}

fn render_confirmation(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("  Registration received!", styles::success_style())),
        Line::from(""),
    ];

    if let Some(confirmation) = app.wizard.confirmation() {
        lines.push(Line::from(vec![
            Span::styled("  Player:     ", styles::muted_style()),
            Span::styled(confirmation.player_name.clone(), styles::input_style()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("  Contact:    ", styles::muted_style()),
            Span::styled(confirmation.email.clone(), styles::input_style()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("  Submitted:  ", styles::muted_style()),
            Span::styled(
                confirmation
                    .received_at
                    .with_timezone(&chrono::Local)
                    .format("%b %d, %Y %l:%M %p")
                    .to_string(),
                styles::input_style(),
            ),
        ]));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "  Tryout details will be sent to the email above.",
        styles::highlight_style(),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Press ", styles::muted_style()),
        Span::styled("[N]", styles::help_key_style()),
        Span::styled(" to register another player, ", styles::muted_style()),
        Span::styled("[Q]", styles::help_key_style()),
        Span::styled(" to quit", styles::muted_style()),
    ]));

    let block = Block::default()
        .title(" Confirmation ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = if app.wizard.is_success() {
        "[n]ew | [q]uit"
    } else {
        "Tab next | ←/→ choose | Enter select | Esc back"
    };

    let left_text = match app.status_message {
        Some(ref msg) => format!(" {} ", msg),
        None => String::new(),
    };
    let right_text = format!(" {} ", shortcuts);

    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::highlight_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);

    frame.render_widget(
        Paragraph::new(status_line).style(styles::status_bar_style()),
        area,
    );
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 18, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");
    let entry = |key: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<12}", key), styles::help_key_style()),
            Span::styled(desc, styles::help_desc_style()),
        ])
    };

    let help_text = vec![
        Line::from(Span::styled("  Tryout Registration", styles::title_style())),
        Line::from(Span::styled(format!("  version {}", version), styles::muted_style())),
        Line::from(""),
        Line::from(Span::styled(" Form", styles::highlight_style())),
        entry("Tab/↓", "Next field or button"),
        entry("Shift+Tab/↑", "Previous field or button"),
        entry("←/→, Space", "Change a selection"),
        entry("Backspace", "Delete / clear selection"),
        entry("Enter", "Activate Back, Next or Submit"),
        entry("Esc", "Previous step (quit on step 1)"),
        Line::from(""),
        Line::from(Span::styled(" Anywhere", styles::highlight_style())),
        entry("F1", "Toggle this help"),
        entry("Ctrl+C", "Quit immediately"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Quit? Your entries will be lost.",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
