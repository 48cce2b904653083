use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::constants::UI_REFRESH_INTERVAL_MS;
use crate::tui::app::{App, BackendEvent};
use crate::tui::input::InputHandler;
use crate::tui::render::render_ui;
use crate::utils::SecretaryError;

/// Run the terminal UI
pub async fn run_ui(mut app: App) -> Result<()> {
    if !crossterm::tty::IsTty::is_tty(&io::stdout()) {
        eprintln!("❌ Secretary requires an interactive terminal.");
        eprintln!("   Use --prompt \"...\" to send a single message without one.");
        return Err(SecretaryError::Terminal("no interactive terminal available".into()).into());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Background tasks report back through this channel
    let (tx, mut rx) = mpsc::channel::<BackendEvent>(16);
    app.start_key_info_fetch(tx.clone());

    let res = run_app(&mut terminal, &mut app, tx, &mut rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tx: mpsc::Sender<BackendEvent>,
    rx: &mut mpsc::Receiver<BackendEvent>,
) -> Result<()> {
    let input = InputHandler::new();

    while app.running {
        app.drain_timeline_events();
        terminal.draw(|f| render_ui(f, app))?;

        // Polling blocks this task briefly; request tasks run on other workers
        if event::poll(Duration::from_millis(UI_REFRESH_INTERVAL_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let action = input.handle_key(key, app.input_mode);
                    app.handle_action(action, &tx);
                }
            }
        }

        while let Ok(event) = rx.try_recv() {
            app.handle_backend_event(event);
        }

        app.tick();
    }

    Ok(())
}
