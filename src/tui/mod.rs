mod app;
mod event_handler;
mod ui;

use anyhow::Result;
use crossterm::{
    event::{poll, read, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;

use crate::api::{GeminiClient, ImageGenerator};
use crate::config::Config;
use crate::core::ImageData;
use crate::imaging;
use crate::studio::Studio;

use app::{App, AppMode};

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Run the TUI application
pub async fn run(config: &mut Config) -> Result<()> {
    let client = GeminiClient::from_config(config)?;
    let studio = Studio::new(client, config);

    let samples = match imaging::ensure_sample_images(&config.samples_dir()) {
        Ok(samples) => samples,
        Err(e) => {
            tracing::warn!("Sample images unavailable: {}", e);
            Vec::new()
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new(config.clone(), studio, samples);

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Save config if changed
    if app.config_changed {
        *config = app.config.clone();
        config.save()?;
    }

    result
}

async fn run_app<G: ImageGenerator>(terminal: &mut Term, app: &mut App<G>) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| ui::draw(f, app))?;

        // Queued work runs after the frame that announces it
        if app.busy() {
            app.step().await;
            discard_pending_keys()?;
            continue;
        }

        if let Some(image) = app.preview.take() {
            show_preview(terminal, &image)?;
            continue;
        }

        // Handle events
        if poll(Duration::from_millis(100))? {
            if let Event::Key(key) = read()? {
                // Global quit shortcuts
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                // Handle mode-specific input
                match app.mode {
                    AppMode::Main => event_handler::handle_main_input(app, key).await?,
                    AppMode::Input(target) => {
                        event_handler::handle_input_mode(app, target, key).await?
                    }
                    AppMode::Brand => event_handler::handle_brand_input(app, key)?,
                    AppMode::Help => event_handler::handle_help_input(app, key)?,
                }
            }
        }

        // Check if we should quit
        if app.should_quit {
            return Ok(());
        }
    }
}

/// Keys pressed while a call was in flight are dropped
fn discard_pending_keys() -> Result<()> {
    while poll(Duration::from_millis(0))? {
        read()?;
    }
    Ok(())
}

/// Leave the alternate screen, print the image with viuer and wait for Enter
fn show_preview(terminal: &mut Term, image: &ImageData) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;

    let conf = viuer::Config {
        width: Some(80),
        height: Some(30),
        absolute_offset: false,
        ..Default::default()
    };
    match imaging::decode(image) {
        Ok(img) => {
            let img = imaging::resize_for_display(&img, imaging::PREVIEW_SIDE);
            if let Err(e) = viuer::print(&img, &conf) {
                tracing::debug!("Failed to display image in terminal: {}", e);
            }
        }
        Err(e) => eprintln!("{}", e.user_message()),
    }
    println!("Press Enter to return");
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;

    enable_raw_mode()?;
    execute!(terminal.backend_mut(), EnterAlternateScreen, EnableMouseCapture)?;
    terminal.clear()?;
    Ok(())
}
