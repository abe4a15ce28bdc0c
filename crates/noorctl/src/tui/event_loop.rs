//! Event Loop - Dashboard entry point and event handling

use anyhow::Result;
use chrono::{Local, Utc};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use noor_common::clock::ClockTicker;
use noor_common::config::NoorConfig;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

use super::render::draw_ui;
use super::state::{DashboardMessage, DashboardState};
use crate::app::{acquire_location, build_resolver, fetch_reflection};

/// Run the dashboard until the user quits or the schedule cannot be computed
pub async fn run(config: &NoorConfig) -> Result<()> {
    enable_raw_mode().map_err(|e| {
        anyhow::anyhow!(
            "Failed to enable raw mode: {}. Ensure you're running in a real terminal (TTY).",
            e
        )
    })?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| {
        let _ = disable_raw_mode();
        anyhow::anyhow!("Failed to initialize terminal: {}", e)
    })?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(terminal) => terminal,
        Err(e) => {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            return Err(e.into());
        }
    };

    let result = run_event_loop(&mut terminal, config).await;

    // Always attempt cleanup
    let cleanup_result = restore_terminal(&mut terminal);

    result.and(cleanup_result)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &NoorConfig,
) -> Result<()> {
    let mut state = DashboardState::new(
        build_resolver(config),
        config.display.language,
        Utc::now(),
        Local::now().date_naive(),
    );

    let (tx, mut rx) = mpsc::channel(8);
    spawn_fetches(config, tx);

    // Dropping the guard on any exit path stops the ticks
    let (_clock, mut ticks) = ClockTicker::start(Duration::from_millis(config.display.tick_millis));

    loop {
        while let Ok(message) = rx.try_recv() {
            state.handle_message(message)?;
        }

        while let Ok(now) = ticks.try_recv() {
            state.tick(now, now.with_timezone(&Local).date_naive())?;
        }

        terminal.draw(|f| draw_ui(f, &state))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match (key.code, key.modifiers) {
                    (KeyCode::Char('c'), KeyModifiers::CONTROL) => break,
                    (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => break,
                    _ => {}
                }
            }
        }
    }

    tracing::info!("Dashboard closed");
    Ok(())
}

/// Location and reflection run in the background; results arrive on `tx`
fn spawn_fetches(config: &NoorConfig, tx: mpsc::Sender<DashboardMessage>) {
    let location_config = config.clone();
    let location_tx = tx.clone();
    tokio::spawn(async move {
        match acquire_location(&location_config).await {
            Ok(outcome) => {
                let _ = location_tx.send(DashboardMessage::Location(outcome)).await;
            }
            Err(e) => tracing::error!(error = %e, "Location task failed"),
        }
    });

    let reflection_config = config.clone();
    tokio::spawn(async move {
        match fetch_reflection(&reflection_config).await {
            Ok(reflection) => {
                let _ = tx.send(DashboardMessage::Reflection(reflection)).await;
            }
            Err(e) => tracing::error!(error = %e, "Reflection task failed"),
        }
    });
}
