use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use launch_atlas_core::charts::{busiest_sites, launches_by_provider, status_breakdown, NamedCount};
use launch_atlas_core::LaunchRecord;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use serde::Serialize;
use std::io::Stdout;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

use crate::app::actions::{load_data, LoadedData};
use crate::app::{handle_input, handle_mouse, App};
use crate::config::AppConfig;
use crate::ui;

const TOP_N: usize = 5;

/// Run the application in headless mode (no UI)
pub async fn run_headless(config: &AppConfig, json: bool) -> Result<()> {
    let data = load_data(config.clone()).await?;
    let stats = build_headless_stats(&data);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        render_headless_stats(&stats);
    }

    Ok(())
}

fn render_headless_stats(stats: &HeadlessStats) {
    println!("\nLaunch Atlas Stats");
    println!("==================");
    println!("Total launches: {}", stats.total_launches);
    println!("Plottable: {}", stats.plottable);
    println!("Without coordinates: {}", stats.unplottable);
    if let (Some(first), Some(last)) = (&stats.first, &stats.last) {
        println!("Range: {first} to {last}");
    }
    println!("Milestones: {}", stats.milestones);

    println!("\nLaunches by Status:");
    for (status, count) in &stats.by_status {
        println!("- {status}: {count}");
    }

    println!("\nTop Providers:");
    for provider in &stats.top_providers {
        println!("- {}: {}", provider.name, provider.count);
    }

    println!("\nBusiest Sites:");
    for site in &stats.busiest_sites {
        println!("- {}: {}", site.name, site.count);
    }
}

fn build_headless_stats(data: &LoadedData) -> HeadlessStats {
    let records = &data.records;
    let plottable = records
        .iter()
        .filter(|record| record.coordinates().is_some())
        .count();

    HeadlessStats {
        total_launches: records.len(),
        plottable,
        unplottable: records.len() - plottable,
        first: records
            .iter()
            .map(LaunchRecord::year_month)
            .min()
            .map(|ym| ym.to_string()),
        last: records
            .iter()
            .map(LaunchRecord::year_month)
            .max()
            .map(|ym| ym.to_string()),
        by_status: status_breakdown(records)
            .iter()
            .map(|(status, count)| (status.as_str().to_string(), count))
            .collect(),
        top_providers: launches_by_provider(records, TOP_N),
        busiest_sites: busiest_sites(records, TOP_N),
        milestones: data.milestones.len(),
    }
}

#[derive(Debug, Serialize)]
struct HeadlessStats {
    total_launches: usize,
    plottable: usize,
    unplottable: usize,
    first: Option<String>,
    last: Option<String>,
    by_status: Vec<(String, usize)>,
    top_providers: Vec<NamedCount>,
    busiest_sites: Vec<NamedCount>,
    milestones: usize,
}

/// Run the main application event loop
pub async fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    let mut loading: Option<JoinHandle<Result<LoadedData>>> =
        Some(tokio::spawn(load_data(app.config.clone())));

    loop {
        if loading.as_ref().is_some_and(JoinHandle::is_finished) {
            if let Some(handle) = loading.take() {
                match handle.await {
                    Ok(Ok(data)) => app.apply_loaded(data),
                    Ok(Err(e)) => app.load_failed(e.to_string()),
                    Err(e) => app.load_failed(format!("loader task failed: {e}")),
                }
            }
        }

        app.update(Instant::now());

        let size = terminal.size()?;
        let layout = ui::layout(Rect::new(0, 0, size.width, size.height));
        app.set_map_area(layout.map_inner);
        app.refresh();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    handle_input(app, key.code);
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Mouse(mouse)) => handle_mouse(app, mouse),
                // Layout is recomputed at the top of every iteration.
                Ok(_) | Err(_) => {}
            }
        }
    }

    if let Some(handle) = loading {
        handle.abort();
    }
    Ok(())
}
