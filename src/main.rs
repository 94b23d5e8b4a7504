use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use marker_globe::app::App;
use marker_globe::config;
use marker_globe::engine::LandMask;
use marker_globe::events::{translate_mouse, InputEvent};
use marker_globe::ui;
use ratatui::DefaultTerminal;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Spinning terminal globe with hoverable city markers
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start with the dark tint
    #[arg(long)]
    dark: bool,

    /// Log file (the terminal itself is busy drawing the globe)
    #[arg(long, default_value_os_t = std::env::temp_dir().join("marker-globe.log"))]
    log_file: PathBuf,

    /// Target frames per second
    #[arg(long, default_value_t = 60)]
    fps: u32,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("marker_globe=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;
    info!("marker-globe v{} starting", env!("CARGO_PKG_VERSION"));

    let mut config = config::load(cli.config.as_deref())?;
    if cli.dark {
        config.dark = 1.0;
    }
    let land = LandMask::load_or_builtin(config.land_geojson.as_deref());

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    // Run the app
    let result = run(&mut terminal, config, &land, cli.fps.max(1));

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    info!("marker-globe exiting");
    result
}

fn run(terminal: &mut DefaultTerminal, config: config::GlobeConfig, land: &LandMask, fps: u32) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(config, land, size.width, size.height);
    let frame_time = Duration::from_secs(1) / fps;

    loop {
        let started = Instant::now();

        // Renderer callback runs here, then the frame is drawn
        app.render_frame();
        terminal.draw(|frame| ui::render(frame, &app))?;

        // Drain input until the next frame is due
        let mut timeout = frame_time.saturating_sub(started.elapsed());
        while event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                    KeyCode::Char('r') | KeyCode::Char('0') => app.reset_rotation(),
                    KeyCode::Char('d') | KeyCode::Char('D') => app.toggle_dark(),
                    KeyCode::Left | KeyCode::Char('h') => app.nudge_left(),
                    KeyCode::Right | KeyCode::Char('l') => app.nudge_right(),
                    _ => {}
                },
                Event::Mouse(mouse) => {
                    if let Some(input) = translate_mouse(mouse) {
                        app.handle(input);
                    }
                }
                Event::Resize(width, height) => {
                    app.handle(InputEvent::Resize { width, height });
                }
                _ => {}
            }
            timeout = frame_time.saturating_sub(started.elapsed());
        }

        if app.should_quit {
            break;
        }
    }

    app.unmount();
    Ok(())
}
