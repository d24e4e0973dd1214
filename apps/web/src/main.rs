use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use launch_atlas_core::charts::{launches_by_provider, yearly_summary};
use launch_atlas_core::window::history_until;
use launch_atlas_core::scale::Rgb;
use launch_atlas_core::{LaunchRecord, LaunchStatus, Point, Size};
use ratzilla::ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line as TextLine, Span, Text},
    widgets::{
        canvas::{Canvas, Circle, Context, Line as CanvasLine, Points},
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Clear, Dataset, Gauge, GraphType,
        Paragraph, Tabs, Wrap,
    },
    Frame, Terminal,
};
use ratzilla::event::KeyCode;
use ratzilla::{DomBackend, WebRenderer};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{MouseEvent, Request, RequestInit, RequestMode, Response, WheelEvent};

mod animation;
mod dashboard;

use dashboard::{CellArea, Command, Dashboard, CHART_TABS};

const GRID_COLOR: Color = Color::DarkGray;
const GRATICULE_SPACING: f64 = 30.0;

fn main() -> io::Result<()> {
    let state = Rc::new(RefCell::new(Dashboard::default()));

    spawn_local(fetch_dataset(state.clone()));

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let state = state.clone();
        move |event| {
            if let Some(command) = command_for(event.code) {
                state.borrow_mut().apply(command);
            }
        }
    });

    if let Err(error) = listen_pointer(&state) {
        web_sys::console::warn_1(&error);
    }

    terminal.draw_web(move |f| {
        let area = f.area();
        let block = Block::default()
            .title("Launch Atlas")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray));
        let inner = block.inner(area).inner(Margin::new(1, 0));
        f.render_widget(block, area);

        let mut dashboard = state.borrow_mut();
        if !dashboard.loaded {
            let paragraph = Paragraph::new(Text::from(TextLine::from("Loading launches.json...")))
                .alignment(Alignment::Center);
            f.render_widget(paragraph, inner);
            return;
        }
        if let Some(error) = dashboard.error.as_ref() {
            let paragraph = Paragraph::new(Text::from(TextLine::from(error.clone())))
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center);
            f.render_widget(paragraph, inner);
            return;
        }

        let regions = split(inner);
        let map_inner = regions.map.inner(Margin::new(1, 1));
        dashboard.set_layout(
            CellArea {
                x: map_inner.x,
                y: map_inner.y,
                width: map_inner.width,
                height: map_inner.height,
            },
            area.width,
            area.height,
        );
        dashboard.tick(js_sys::Date::now() / 1000.0);
        dashboard.refresh(Size::new(
            f64::from(map_inner.width) * 2.0,
            f64::from(map_inner.height) * 4.0,
        ));
        render_dashboard(&dashboard, &regions, f);
    });

    Ok(())
}

#[derive(Clone, Copy)]
enum Pointer {
    Move,
    Press,
}

/// Mouse hover, click-to-pin and wheel zoom, mapped from page pixels to
/// terminal cells.
fn listen_pointer(state: &Rc<RefCell<Dashboard>>) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;

    for (name, pointer) in [("mousemove", Pointer::Move), ("mousedown", Pointer::Press)] {
        let state = state.clone();
        let handler = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            if pointer_matters(&event, pointer) {
                on_pointer(&state, &event, pointer);
            }
        });
        window.add_event_listener_with_callback(name, handler.as_ref().unchecked_ref())?;
        handler.forget();
    }

    let state = state.clone();
    let wheel = Closure::<dyn FnMut(WheelEvent)>::new(move |event: WheelEvent| {
        let Some((column, row)) = page_cell(&state.borrow(), &event) else {
            return;
        };
        state
            .borrow_mut()
            .scrolled(column, row, event.delta_y() < 0.0);
    });
    window.add_event_listener_with_callback("wheel", wheel.as_ref().unchecked_ref())?;
    wheel.forget();
    Ok(())
}

fn pointer_matters(event: &MouseEvent, pointer: Pointer) -> bool {
    match pointer {
        Pointer::Move => true,
        Pointer::Press => event.button() == 0,
    }
}

fn on_pointer(state: &Rc<RefCell<Dashboard>>, event: &MouseEvent, pointer: Pointer) {
    let Some((column, row)) = page_cell(&state.borrow(), event) else {
        return;
    };
    let mut dashboard = state.borrow_mut();
    match pointer {
        Pointer::Move => dashboard.pointer_moved(column, row),
        Pointer::Press => dashboard.clicked(column, row),
    }
}

fn page_cell(dashboard: &Dashboard, event: &MouseEvent) -> Option<(u16, u16)> {
    let window = web_sys::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    dashboard.cell_at(
        f64::from(event.client_x()),
        f64::from(event.client_y()),
        width,
        height,
    )
}

fn command_for(code: KeyCode) -> Option<Command> {
    let command = match code {
        KeyCode::Char(' ') => Command::TogglePlay,
        KeyCode::Right => Command::StepForward,
        KeyCode::Left => Command::StepBack,
        KeyCode::Char('r') => Command::Reset,
        KeyCode::Char(']') => Command::Faster,
        KeyCode::Char('[') => Command::Slower,
        KeyCode::Char('m') => Command::ToggleMode,
        KeyCode::Char('e') => Command::NextEra,
        KeyCode::Char('+' | '=') => Command::ZoomIn,
        KeyCode::Char('-') => Command::ZoomOut,
        KeyCode::Char('0') => Command::ResetZoom,
        KeyCode::Char('h') => Command::Pan(-1.0, 0.0),
        KeyCode::Char('l') => Command::Pan(1.0, 0.0),
        KeyCode::Char('k') => Command::Pan(0.0, -1.0),
        KeyCode::Char('j') => Command::Pan(0.0, 1.0),
        KeyCode::Tab | KeyCode::Down => Command::HoverNext,
        KeyCode::Up => Command::HoverPrev,
        KeyCode::Enter => Command::Pin,
        KeyCode::Esc => Command::ClearPin,
        KeyCode::Char('c') => Command::NextChart,
        _ => return None,
    };
    Some(command)
}

struct Regions {
    header: Rect,
    map: Rect,
    feed: Rect,
    chart: Rect,
    timeline: Rect,
    keys: Rect,
}

fn split(area: Rect) -> Regions {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(12),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(66), Constraint::Percentage(34)])
        .split(rows[1]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(content[1]);

    Regions {
        header: rows[0],
        map: content[0],
        feed: side[0],
        chart: side[1],
        timeline: rows[2],
        keys: rows[3],
    }
}

fn render_dashboard(dashboard: &Dashboard, regions: &Regions, f: &mut Frame<'_>) {
    render_header(dashboard, f, regions.header);
    render_map(dashboard, f, regions.map);
    render_feed(dashboard, f, regions.feed);
    render_chart(dashboard, f, regions.chart);
    render_timeline(dashboard, f, regions.timeline);
    render_keys(f, regions.keys);
}

const fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r(), rgb.g(), rgb.b())
}

fn render_header(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let mut spans = vec![Span::styled(
        dashboard.selection.breadcrumb(),
        Style::default().fg(Color::White),
    )];
    if let Some(timeline) = dashboard.timeline.as_ref() {
        spans.extend([
            Span::raw("  "),
            Span::styled(
                timeline.current().to_string(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(
                    "  {} view  ×{}  {}",
                    dashboard.mode.label(),
                    timeline.speed(),
                    if timeline.is_playing() { "playing" } else { "paused" }
                ),
                Style::default().fg(Color::Gray),
            ),
        ]);
    }
    f.render_widget(Paragraph::new(TextLine::from(spans)), area);
}

fn render_map(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Map")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(frame) = dashboard.frame.as_ref() else {
        let paragraph = Paragraph::new("No launches to show")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, inner);
        return;
    };
    let viewport = dashboard.viewport;
    if viewport.is_degenerate() {
        return;
    }

    let zoom = frame.zoom;
    let mut grid = frame.projection.graticule(GRATICULE_SPACING);
    grid.push(frame.projection.outline(5.0));
    let grid: Vec<Vec<Point>> = grid
        .into_iter()
        .map(|line| line.into_iter().map(|point| zoom.apply(point)).collect())
        .collect();
    let height = viewport.height;

    f.render_widget(
        Canvas::default()
            .marker(symbols::Marker::Braille)
            .x_bounds([0.0, viewport.width])
            .y_bounds([0.0, height])
            .paint(|ctx| {
                for line in &grid {
                    draw_polyline(ctx, line, height);
                }
                ctx.layer();

                for (original, drawn) in frame.connectors() {
                    let (from, to) = (zoom.apply(original), zoom.apply(drawn));
                    ctx.draw(&CanvasLine {
                        x1: from.x,
                        y1: height - from.y,
                        x2: to.x,
                        y2: height - to.y,
                        color: Color::Gray,
                    });
                }
                ctx.layer();

                for marker in &frame.markers {
                    let centre = zoom.apply(marker.position);
                    let color = to_color(dashboard.interaction.fill_for(marker));
                    let mut radius = marker.radius * zoom.k;
                    while radius > 0.5 {
                        ctx.draw(&Circle {
                            x: centre.x,
                            y: height - centre.y,
                            radius,
                            color,
                        });
                        radius -= 1.0;
                    }
                    ctx.draw(&Points {
                        coords: &[(centre.x, height - centre.y)],
                        color,
                    });
                }
            }),
        inner,
    );

    if let Some(tooltip) = dashboard.tooltip.as_ref() {
        let lines = tooltip.lines();
        let width = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
            .max(tooltip.title.chars().count()) as u16
            + 2;
        let width = width.min(inner.width);
        let height = (lines.len() as u16 + 2).min(inner.height);
        let corner = tooltip.placement(
            Size::new(f64::from(width) * 2.0, f64::from(height) * 4.0),
            viewport,
        );
        let rect = Rect {
            x: inner.x + (corner.x / 2.0) as u16,
            y: inner.y + (corner.y / 4.0) as u16,
            width,
            height,
        };
        let accent = to_color(tooltip.primary_status.color());
        let text: Vec<TextLine<'_>> = lines.into_iter().map(TextLine::from).collect();
        f.render_widget(Clear, rect);
        f.render_widget(
            Paragraph::new(Text::from(text)).block(
                Block::default()
                    .title(tooltip.title.clone())
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(accent)),
            ),
            rect,
        );
    }
}

fn draw_polyline(ctx: &mut Context<'_>, line: &[Point], height: f64) {
    for pair in line.windows(2) {
        ctx.draw(&CanvasLine {
            x1: pair[0].x,
            y1: height - pair[0].y,
            x2: pair[1].x,
            y2: height - pair[1].y,
            color: GRID_COLOR,
        });
    }
}

fn render_feed(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Milestones")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let lines: Vec<TextLine<'_>> = dashboard
        .visible_milestones()
        .into_iter()
        .map(|milestone| {
            TextLine::from(vec![
                Span::styled(
                    format!("{} ", milestone.year),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(
                    format!("{}: ", milestone.author),
                    Style::default().fg(Color::Gray),
                ),
                Span::raw(milestone.text.clone()),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn history(dashboard: &Dashboard) -> Vec<&LaunchRecord> {
    let Some(timeline) = dashboard.timeline.as_ref() else {
        return Vec::new();
    };
    history_until(&dashboard.records, &dashboard.selection, timeline.current())
}

fn render_chart(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let tabs = Tabs::new(CHART_TABS.iter().map(|title| TextLine::from(*title)).collect::<Vec<_>>())
        .select(dashboard.chart_tab)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(0, 0, 238))
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::raw("|"));
    f.render_widget(tabs, layout[0]);

    let records = history(dashboard);
    if dashboard.chart_tab == 0 {
        let points: Vec<(f64, f64)> = yearly_summary(records)
            .iter()
            .filter_map(|year| year.success_rate.map(|rate| (f64::from(year.year), rate * 100.0)))
            .collect();
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return;
        };
        let bounds = [first.0, last.0.max(first.0 + 1.0)];
        let chart = Chart::new(vec![Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(to_color(LaunchStatus::Successful.color())))
            .data(&points)])
        .x_axis(
            Axis::default()
                .bounds(bounds)
                .labels(vec![
                    Span::raw(format!("{:.0}", bounds[0])),
                    Span::raw(format!("{:.0}", bounds[1])),
                ]),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, 100.0])
                .labels(vec![Span::raw("0%"), Span::raw("100%")]),
        );
        f.render_widget(chart, layout[1]);
    } else {
        let providers = launches_by_provider(records, 6);
        let bars: Vec<Bar<'_>> = providers
            .iter()
            .map(|provider| {
                Bar::default()
                    .value(provider.count as u64)
                    .label(TextLine::from(provider.name.clone()))
                    .style(Style::default().fg(Color::Cyan))
                    .value_style(Style::default().fg(Color::White))
            })
            .collect();
        let chart = BarChart::default()
            .direction(Direction::Horizontal)
            .data(BarGroup::default().bars(&bars))
            .bar_gap(0)
            .bar_width(1);
        f.render_widget(chart, layout[1]);
    }
}

fn render_timeline(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let Some(timeline) = dashboard.timeline.as_ref() else {
        return;
    };
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Gray)),
        )
        .gauge_style(Style::default().fg(Color::Rgb(0, 0, 238)))
        .ratio(timeline.progress().clamp(0.0, 1.0))
        .label(format!(
            "{} ── {} ── {}",
            timeline.min(),
            timeline.current(),
            timeline.max()
        ));
    f.render_widget(gauge, area);
}

fn render_keys(f: &mut Frame<'_>, area: Rect) {
    let hint = |key: &'static str, label: &'static str| {
        [
            Span::styled(key, Style::default().fg(Color::Yellow)),
            Span::styled(label, Style::default().fg(Color::Gray)),
        ]
    };
    let spans: Vec<Span<'static>> = [
        hint("Space", " play  "),
        hint("←/→", " step  "),
        hint("m", " mode  "),
        hint("e", " era  "),
        hint("Tab", " sites  "),
        hint("Enter", " pin  "),
        hint("+/-", " zoom  "),
        hint("c", " chart"),
    ]
    .into_iter()
    .flatten()
    .collect();
    f.render_widget(
        Paragraph::new(TextLine::from(spans)).alignment(Alignment::Center),
        area,
    );
}

async fn fetch_text(path: &str) -> Result<String, String> {
    let window = web_sys::window().ok_or("no window")?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::SameOrigin);

    let request = Request::new_with_str_and_init(path, &opts)
        .map_err(|_| format!("cannot build request for {path}"))?;
    let response_value =
        wasm_bindgen_futures::JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|_| format!("request for {path} failed"))?;
    let response = response_value
        .dyn_into::<Response>()
        .map_err(|_| "Failed to read response".to_string())?;
    if !response.ok() {
        return Err(format!("{path}: HTTP {}", response.status()));
    }
    let body = response
        .text()
        .map_err(|_| format!("Failed to read {path} body"))?;
    let text = wasm_bindgen_futures::JsFuture::from(body)
        .await
        .map_err(|_| format!("Failed to read {path} body"))?;
    text.as_string().ok_or_else(|| format!("{path} is not text"))
}

async fn fetch_dataset(store: Rc<RefCell<Dashboard>>) {
    match fetch_text("launches.json").await {
        Ok(json) => store.borrow_mut().load_launches(&json),
        Err(error) => {
            web_sys::console::error_1(&error.clone().into());
            store.borrow_mut().fail(error);
            return;
        }
    }

    match fetch_text("events.json").await {
        Ok(json) => {
            if let Err(error) = store.borrow_mut().load_milestones(&json) {
                web_sys::console::warn_1(&format!("Failed to parse events.json: {error}").into());
            }
        }
        Err(error) => web_sys::console::warn_1(&error.into()),
    }
}
