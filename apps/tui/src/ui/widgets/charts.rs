use crate::app::state::ChartTab;
use crate::app::App;
use crate::ui::widgets::map::to_color;
use launch_atlas_core::charts::{launches_by_provider, yearly_summary, YearSummary};
use launch_atlas_core::window::history_until;
use launch_atlas_core::{LaunchRecord, LaunchStatus};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph, Tabs,
};
use ratatui::Frame;

const TOP_PROVIDERS: usize = 6;

pub fn render_chart_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    render_chart_tabs(app, f, split[0]);
    match app.chart_tab {
        ChartTab::SuccessRate => render_success_rate(app, f, split[1]),
        ChartTab::Providers => render_provider_bars(app, f, split[1]),
    }
}

fn render_chart_tabs(app: &App, f: &mut Frame<'_>, area: Rect) {
    let titles = ChartTab::ALL
        .iter()
        .map(|tab| TextLine::from(tab.title()))
        .collect::<Vec<_>>();

    let tabs = Tabs::new(titles)
        .select(app.chart_tab.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::raw("|"));

    f.render_widget(tabs, area);
}

/// Launches that have happened by the current timeline position under the
/// active selection.
fn history(app: &App) -> Vec<&LaunchRecord> {
    let Some(timeline) = app.timeline.as_ref() else {
        return Vec::new();
    };
    history_until(&app.records, &app.selection, timeline.current())
}

fn empty_chart(f: &mut Frame<'_>, area: Rect, title: &str) {
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let paragraph = Paragraph::new("No launches yet")
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

/// `(year, percent)` points for every year with a known outcome.
fn success_points(summary: &[YearSummary]) -> Vec<(f64, f64)> {
    summary
        .iter()
        .filter_map(|year| {
            year.success_rate
                .map(|rate| (f64::from(year.year), rate * 100.0))
        })
        .collect()
}

fn render_success_rate(app: &App, f: &mut Frame<'_>, area: Rect) {
    let summary = yearly_summary(history(app));
    let points = success_points(&summary);
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        empty_chart(f, area, "Success rate");
        return;
    };
    let (first_year, last_year) = (first.0, last.0.max(first.0 + 1.0));

    let datasets = vec![Dataset::default()
        .name("success %")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(to_color(LaunchStatus::Successful.color())))
        .data(&points)];

    let launches: usize = summary.iter().map(|year| year.total).sum();
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(format!("Success rate · {launches} launches"))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([first_year, last_year])
                .labels(vec![
                    Span::raw(format!("{first_year:.0}")),
                    Span::raw(format!("{last_year:.0}")),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, 100.0])
                .labels(vec![Span::raw("0"), Span::raw("50"), Span::raw("100")]),
        );

    f.render_widget(chart, area);
}

fn render_provider_bars(app: &App, f: &mut Frame<'_>, area: Rect) {
    let providers = launches_by_provider(history(app), TOP_PROVIDERS);
    if providers.is_empty() {
        empty_chart(f, area, "Top providers");
        return;
    }

    let bars: Vec<Bar<'_>> = providers
        .iter()
        .map(|provider| {
            Bar::default()
                .value(provider.count as u64)
                .label(TextLine::from(provider.name.clone()))
                .style(Style::default().fg(Color::Cyan))
                .value_style(Style::default().fg(Color::Black).bg(Color::Cyan))
        })
        .collect();

    let max_value = providers
        .iter()
        .map(|provider| provider.count as u64)
        .max()
        .unwrap_or(0)
        .max(1);

    let chart = BarChart::default()
        .block(
            Block::default()
                .title("Top providers")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&bars))
        .max(max_value)
        .bar_gap(0)
        .bar_width(1);

    f.render_widget(chart, area);
}
