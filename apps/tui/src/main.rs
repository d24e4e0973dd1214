use clap::Parser;
use color_eyre::Result;
use launch_atlas::app::App;
use launch_atlas::cli::CliArgs;
use launch_atlas::config::AppConfig;
use launch_atlas::{event, logging, terminal};

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let config = AppConfig::load()?;

    // Headless when asked to, or when stdout is not a terminal
    let headless = args.headless || args.json || !is_terminal();
    logging::init(&config, headless)?;

    if headless {
        return event::run_headless(&config, args.json).await;
    }

    let mut app = App::new(config);
    let mut terminal = terminal::setup()?;

    let result = event::run(&mut terminal, &mut app).await;

    terminal::cleanup(true, true);

    result
}

fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
