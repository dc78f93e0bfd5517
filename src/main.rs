use anyhow::{Context, Result};
use clap::Parser;
use customizer::app::App;
use customizer::cli::{print_error, Cli};
use customizer::config::Config;
use customizer::utils::{get_config_path, get_log_dir, get_log_path};

/// Set up panic hook to restore terminal state on panic
fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal state before handling panic
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    if cli.command.is_some() {
        // Subcommands own no terminal UI, so warnings go straight to stderr
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        cli.execute()?;
        return Ok(());
    }

    setup_panic_hook();

    let config_path = get_config_path();
    let config = Config::load_or_create(&config_path).context("Failed to load configuration")?;

    // Set up logging directory
    let log_dir = get_log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {:?}", log_dir))?;

    // RUST_LOG wins over the configured level
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    // The terminal belongs to the TUI, so logs go to a file
    let file_appender = tracing_appender::rolling::never(&log_dir, "customizer.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    eprintln!("Logs are being written to: {:?}", get_log_path());

    let mut app = App::new(&config)?;
    let result = app.run();

    drop(guard);
    result
}

fn main() {
    if let Err(e) = run() {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
