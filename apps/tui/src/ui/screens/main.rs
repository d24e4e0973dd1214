use crate::app::picker::Picker;
use crate::app::state::LoadState;
use crate::app::App;
use crate::ui::widgets::charts::render_chart_section;
use crate::ui::widgets::map::{render_map, to_color};
use crate::ui::widgets::popup::{footer_row, list_window, overlay_rect};
use crate::ui::MainLayout;
use launch_atlas_core::LaunchStatus;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::Throbber;

/// Milestones shown in the side panel, newest first.
const MILESTONE_LINES: usize = 6;

pub fn render_main(app: &App, f: &mut Frame<'_>, layout: &MainLayout) {
    render_header(app, f, layout.header);
    render_map(app, f, layout.map);
    render_details(app, f, layout.details);
    render_chart_section(app, f, layout.charts);
    render_timeline(app, f, layout.timeline);
    render_status(app, f, layout.status);
    render_shortcuts(f, layout.shortcuts);

    if let Some(picker) = app.picker.as_ref() {
        render_picker_popup(picker, f, f.area());
    }
    if app.show_help {
        render_help_popup(f, f.area());
    }
}

fn render_header(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(block, area);

    let inner = area.inner(Margin::new(1, 1));
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(28)])
        .split(inner);

    let mut spans = vec![
        Span::styled(
            "Launch ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "Atlas",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(timeline) = app.timeline.as_ref() {
        let state = if timeline.is_playing() { "▶ playing" } else { "⏸ paused" };
        spans.extend([
            Span::styled("  │  ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                timeline.current().to_string(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {} view  ×{}  {state}", app.mode.label(), timeline.speed()),
                Style::default().fg(Color::Gray),
            ),
        ]);
    }
    f.render_widget(Paragraph::new(TextLine::from(spans)), chunks[0]);

    match &app.load_state {
        LoadState::Loading => {
            let throbber = Throbber::default()
                .label("Loading launches")
                .style(Style::default().fg(Color::Gray))
                .throbber_style(Style::default().fg(Color::Cyan));
            let mut state = app.throbber.clone();
            f.render_stateful_widget(throbber, chunks[1], &mut state);
        }
        LoadState::Failed(_) => {
            let paragraph = Paragraph::new(Span::styled(
                "load failed",
                Style::default().fg(Color::Red),
            ))
            .alignment(Alignment::Right);
            f.render_widget(paragraph, chunks[1]);
        }
        LoadState::Ready => {
            f.render_widget(status_legend().alignment(Alignment::Right), chunks[1]);
        }
    }
}

fn status_legend() -> Paragraph<'static> {
    let spans: Vec<Span<'static>> = [
        LaunchStatus::Successful,
        LaunchStatus::Failure,
        LaunchStatus::PartialFailure,
        LaunchStatus::Planned,
    ]
    .into_iter()
    .flat_map(|status| {
        [
            Span::styled("● ", Style::default().fg(to_color(status.color()))),
            Span::styled(
                format!("{} ", status_initial(status)),
                Style::default().fg(Color::Gray),
            ),
        ]
    })
    .collect();
    Paragraph::new(TextLine::from(spans))
}

const fn status_initial(status: LaunchStatus) -> &'static str {
    match status {
        LaunchStatus::Successful => "ok",
        LaunchStatus::Failure => "fail",
        LaunchStatus::PartialFailure => "partial",
        LaunchStatus::Planned => "planned",
        LaunchStatus::Other => "other",
    }
}

fn render_details(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Selection ")
        .title_style(Style::default().fg(Color::Green))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let label_style = Style::default().fg(Color::Gray);
    let value_style = Style::default().fg(Color::Yellow);

    let mut lines = vec![TextLine::from(vec![Span::styled(
        app.selection.breadcrumb(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )])];

    if let Some(frame) = app.frame.as_ref() {
        lines.push(TextLine::from(vec![
            Span::styled("In window: ", label_style),
            Span::styled(
                format!(
                    "{} launches at {} sites",
                    frame.launchpads.total_launches(),
                    frame.launchpads.len()
                ),
                value_style,
            ),
        ]));
        if frame.launchpads.unplottable > 0 {
            lines.push(TextLine::from(vec![
                Span::styled("Without coordinates: ", label_style),
                Span::styled(frame.launchpads.unplottable.to_string(), value_style),
            ]));
        }
    }

    if let Some(key) = app.interaction.pinned() {
        lines.push(TextLine::from(vec![
            Span::styled("Pinned: ", label_style),
            Span::styled(key.to_string(), value_style),
        ]));
    }

    let milestones = app.visible_milestones();
    if !milestones.is_empty() {
        lines.push(TextLine::from(""));
        lines.push(TextLine::from(Span::styled(
            "Milestones",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for milestone in milestones.into_iter().take(MILESTONE_LINES) {
            lines.push(TextLine::from(vec![
                Span::styled(format!("{} ", milestone.year), value_style),
                Span::styled(format!("{}: ", milestone.author), label_style),
                Span::raw(milestone.text.clone()),
            ]));
        }
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_timeline(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Timeline ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let Some(timeline) = app.timeline.as_ref() else {
        f.render_widget(block, area);
        return;
    };

    let gauge = Gauge::default()
        .block(block)
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .ratio(timeline.progress().clamp(0.0, 1.0))
        .label(format!(
            "{} ── {} ── {}",
            timeline.min(),
            timeline.current(),
            timeline.max()
        ));
    f.render_widget(gauge, area);
}

fn render_status(app: &App, f: &mut Frame<'_>, area: Rect) {
    let style = if app.status_message.starts_with("Error") {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Gray)
    };
    f.render_widget(
        Paragraph::new(Span::styled(app.status_message.clone(), style)),
        area,
    );
}

fn key_hint(key: &'static str, label: &'static str) -> [Span<'static>; 2] {
    [
        Span::styled(
            key,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(label, Style::default().fg(Color::Gray)),
    ]
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let spans: Vec<Span<'static>> = [
        key_hint("?", ": Help | "),
        key_hint("Space", ": Play | "),
        key_hint("←/→", ": Step | "),
        key_hint("m", ": Month/Year | "),
        key_hint("s", ": Select | "),
        key_hint("Tab", ": Sites | "),
        key_hint("+/-", ": Zoom | "),
        key_hint("q", ": Quit"),
    ]
    .into_iter()
    .flatten()
    .collect();

    f.render_widget(
        Paragraph::new(TextLine::from(spans)).alignment(Alignment::Center),
        area,
    );
}

fn render_picker_popup(picker: &Picker, f: &mut Frame<'_>, area: Rect) {
    let popup_area = overlay_rect(area, 50, picker.options.len().clamp(4, 16) + 2);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(format!(" {} ", picker.title()))
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let query = if picker.searching {
        TextLine::from(vec![
            Span::styled("/", Style::default().fg(Color::Yellow)),
            Span::raw(picker.query.clone()),
            Span::styled("_", Style::default().fg(Color::Yellow)),
        ])
    } else {
        TextLine::from(Span::styled(
            "Press / to search",
            Style::default().fg(Color::DarkGray),
        ))
    };
    f.render_widget(Paragraph::new(query), rows[0]);

    let visible = picker.visible();
    let max_rows = usize::from(rows[1].height);
    let window = list_window(visible.len(), max_rows, picker.index);
    let items: Vec<ListItem<'_>> = visible
        .iter()
        .enumerate()
        .skip(window.start)
        .take(window.len())
        .map(|(index, option)| {
            let style = if index == picker.index {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Span::styled((*option).to_string(), style))
        })
        .collect();

    if items.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled("No matches", Style::default().fg(Color::Gray))),
            rows[1],
        );
    } else {
        f.render_widget(List::new(items), rows[1]);
    }

    let hint = Paragraph::new(Span::styled(
        "Enter: choose | Backspace: up a level | Esc: close",
        Style::default().fg(Color::Gray),
    ))
    .alignment(Alignment::Center);
    f.render_widget(hint, rows[2]);
}

fn render_help_popup(f: &mut Frame<'_>, area: Rect) {
    let lines = build_help_lines();
    let popup_area = overlay_rect(area, 80, lines.len() + 1);
    f.render_widget(Clear, popup_area);

    let help_block = Block::default()
        .title("== Help & Keyboard Shortcuts ==")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let help_paragraph = Paragraph::new(Text::from(lines))
        .block(help_block)
        .wrap(Wrap { trim: true });

    f.render_widget(help_paragraph, popup_area);

    let hint = Paragraph::new(Text::from(TextLine::from(vec![Span::styled(
        "Press ? or Esc to close",
        Style::default().fg(Color::Gray),
    )])))
    .alignment(Alignment::Center);

    f.render_widget(hint, footer_row(popup_area));
}

fn help_entry(key: &'static str, description: &'static str) -> TextLine<'static> {
    TextLine::from(vec![
        Span::styled(
            format!("  {key:<10}"),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(description),
    ])
}

fn help_heading(title: &'static str) -> TextLine<'static> {
    TextLine::from(vec![Span::styled(
        title,
        Style::default().add_modifier(Modifier::BOLD),
    )])
}

fn build_help_lines() -> Vec<TextLine<'static>> {
    let mut lines = vec![
        TextLine::from(vec![Span::styled(
            "Launch Atlas",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]),
        TextLine::from(""),
        TextLine::from(
            "Launch sites appear on the map for the current month or year. Marker size follows the number of launches, colour follows the most common outcome.",
        ),
        TextLine::from(""),
        help_heading("Timeline:"),
        help_entry("Space", "Play / pause"),
        help_entry("← →", "Step one month"),
        help_entry("[ ]", "Slower / faster"),
        help_entry("r", "Back to the first month"),
        help_entry("m", "Switch between month and year view"),
        TextLine::from(""),
        help_heading("Map:"),
        help_entry("Tab", "Hover the next site, west to east"),
        help_entry("Enter", "Pin the hovered site"),
        help_entry("Esc", "Unpin"),
        help_entry("+ -", "Zoom in / out"),
        help_entry("h j k l", "Pan"),
        help_entry("0", "Reset zoom"),
        help_entry("mouse", "Hover, click to pin, wheel to zoom"),
        TextLine::from(""),
        help_heading("Selection:"),
        help_entry("s", "Pick an era, then a provider, then a rocket"),
        help_entry("/", "Search inside the picker"),
        help_entry("Backspace", "Go up one level"),
        help_entry("c", "Switch chart"),
        TextLine::from(""),
        help_entry("q", "Quit"),
        TextLine::from(""),
        help_heading("CLI Options:"),
    ];

    let help_text = crate::cli::CliArgs::help_text();
    for line in help_text.lines() {
        if line.starts_with("Usage") || line.starts_with("Options") || line.trim().is_empty() {
            continue;
        }
        lines.push(TextLine::from(line.to_string()));
    }

    lines
}
