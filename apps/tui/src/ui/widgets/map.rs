use crate::app::state::LoadState;
use crate::app::App;
use launch_atlas_core::land::project_rings;
use launch_atlas_core::scale::Rgb;
use launch_atlas_core::{MapFrame, Marker, Point, Size, Tooltip, TooltipKind, ZoomTransform};
use ratatui::layout::{Alignment, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine, Points};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

const GRATICULE_SPACING: f64 = 30.0;
const OUTLINE_STEP: f64 = 5.0;
const GRID_COLOR: Color = Color::DarkGray;
const LAND_COLOR: Color = Color::Rgb(86, 110, 86);
const CONNECTOR_COLOR: Color = Color::Gray;
const PIN_COLOR: Color = Color::White;

pub const fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r(), rgb.g(), rgb.b())
}

pub fn render_map(app: &App, f: &mut Frame<'_>, area: Rect) {
    let title = app.frame.as_ref().map_or_else(
        || " Map ".to_string(),
        |frame| {
            format!(
                " Map · {} sites · {} launches · zoom {:.1}x ",
                frame.markers.len(),
                frame.launchpads.total_launches(),
                frame.zoom.k
            )
        },
    );
    let block = Block::default()
        .title(title)
        .title_style(Style::default().fg(Color::Cyan))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(block, area);

    let inner = area.inner(Margin::new(1, 1));
    let Some(frame) = app.frame.as_ref() else {
        render_placeholder(app, f, inner);
        return;
    };
    if app.viewport.is_degenerate() {
        return;
    }

    let height = app.viewport.height;
    let (grid, land) = background(app, frame);
    let connectors: Vec<(Point, Point)> = frame
        .connectors()
        .map(|(original, drawn)| (frame.zoom.apply(original), frame.zoom.apply(drawn)))
        .collect();

    let canvas = Canvas::default()
        .marker(symbols::Marker::Braille)
        .x_bounds([0.0, app.viewport.width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            for line in &grid {
                draw_polyline(ctx, line, height, GRID_COLOR);
            }
            for ring in &land {
                draw_polyline(ctx, ring, height, LAND_COLOR);
            }
            ctx.layer();

            for (original, drawn) in &connectors {
                ctx.draw(&CanvasLine {
                    x1: original.x,
                    y1: height - original.y,
                    x2: drawn.x,
                    y2: height - drawn.y,
                    color: CONNECTOR_COLOR,
                });
                ctx.draw(&Points {
                    coords: &[(original.x, height - original.y)],
                    color: CONNECTOR_COLOR,
                });
            }
            ctx.layer();

            for marker in &frame.markers {
                let pinned = app.interaction.pinned() == Some(marker.key.as_str());
                draw_marker(ctx, marker, frame.zoom, height, app, pinned);
            }
        });
    f.render_widget(canvas, inner);

    if let Some(tooltip) = app.tooltip.as_ref() {
        render_tooltip(f, tooltip, inner);
    }
}

fn render_placeholder(app: &App, f: &mut Frame<'_>, area: Rect) {
    let message = match &app.load_state {
        LoadState::Loading => "Loading launches...".to_string(),
        LoadState::Failed(error) => format!("Could not load launches: {error}"),
        LoadState::Ready => "No launches to show".to_string(),
    };
    let paragraph = Paragraph::new(message)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    let middle = Rect {
        y: area.y + area.height / 2,
        height: area.height.min(1),
        ..area
    };
    f.render_widget(paragraph, middle);
}

/// Graticule plus globe outline, and the land rings if a land file was
/// loaded. All in screen space.
fn background(app: &App, frame: &MapFrame) -> (Vec<Vec<Point>>, Vec<Vec<Point>>) {
    let projection = &frame.projection;
    let mut grid = projection.graticule(GRATICULE_SPACING);
    grid.push(projection.outline(OUTLINE_STEP));
    let land = project_rings(projection, &app.land);
    (
        to_screen(grid, frame.zoom),
        to_screen(land, frame.zoom),
    )
}

fn to_screen(lines: Vec<Vec<Point>>, zoom: ZoomTransform) -> Vec<Vec<Point>> {
    lines
        .into_iter()
        .map(|line| line.into_iter().map(|point| zoom.apply(point)).collect())
        .collect()
}

/// Canvas y grows upwards, screen y grows downwards.
fn draw_polyline(ctx: &mut Context<'_>, line: &[Point], height: f64, color: Color) {
    for pair in line.windows(2) {
        ctx.draw(&CanvasLine {
            x1: pair[0].x,
            y1: height - pair[0].y,
            x2: pair[1].x,
            y2: height - pair[1].y,
            color,
        });
    }
}

fn draw_marker(
    ctx: &mut Context<'_>,
    marker: &Marker,
    zoom: ZoomTransform,
    height: f64,
    app: &App,
    pinned: bool,
) {
    let centre = zoom.apply(marker.position);
    let (x, y) = (centre.x, height - centre.y);
    let radius = marker.radius * zoom.k;
    let color = to_color(app.interaction.fill_for(marker));

    // Braille cells only draw outlines, so fill with concentric rings.
    let mut ring = radius;
    while ring > 0.5 {
        ctx.draw(&Circle {
            x,
            y,
            radius: ring,
            color,
        });
        ring -= 1.0;
    }
    ctx.draw(&Points {
        coords: &[(x, y)],
        color,
    });

    if pinned {
        ctx.draw(&Circle {
            x,
            y,
            radius: radius + 1.5,
            color: PIN_COLOR,
        });
    }
}

fn render_tooltip(f: &mut Frame<'_>, tooltip: &Tooltip, canvas: Rect) {
    let lines = tooltip.lines();
    let area = tooltip_rect(tooltip, &lines, canvas);
    if area.width < 4 || area.height < 3 {
        return;
    }

    let accent = to_color(tooltip.primary_status.color());
    let title = match tooltip.kind {
        TooltipKind::Compact => format!(" {} ", tooltip.title),
        TooltipKind::Expanded => format!(" {} (pinned) ", tooltip.title),
    };
    let block = Block::default()
        .title(title)
        .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));

    let text: Vec<TextLine<'_>> = lines
        .into_iter()
        .enumerate()
        .map(|(index, line)| {
            let style = if index == 0 {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            TextLine::from(Span::styled(line, style))
        })
        .collect();

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(Text::from(text)).block(block), area);
}

/// Cell rectangle for the tooltip box, next to its marker and inside `canvas`.
pub fn tooltip_rect(tooltip: &Tooltip, lines: &[String], canvas: Rect) -> Rect {
    let content_width = lines
        .iter()
        .map(|line| line.chars().count())
        .chain(std::iter::once(tooltip.title.chars().count() + 11))
        .max()
        .unwrap_or(0);
    let width = (content_width as u16).saturating_add(2).min(canvas.width);
    let height = (lines.len() as u16).saturating_add(2).min(canvas.height);

    let size = Size::new(f64::from(width) * 2.0, f64::from(height) * 4.0);
    let viewport = Size::new(f64::from(canvas.width) * 2.0, f64::from(canvas.height) * 4.0);
    let corner = tooltip.placement(size, viewport);

    Rect {
        x: canvas.x + (corner.x / 2.0).floor() as u16,
        y: canvas.y + (corner.y / 4.0).floor() as u16,
        width,
        height,
    }
}
