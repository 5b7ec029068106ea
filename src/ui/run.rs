use std::io::{self, stdout};
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::event::{self, Event};
use ratatui::crossterm::{execute, terminal};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::info;

use crate::clipboard::{ClipboardBackend, ClipboardCopier};
use crate::sizing::RiskCalculator;
use crate::ui::{app::App, view::draw};

/// Run the interactive calculator until the user quits.
///
/// The terminal is restored on every exit path, including errors.
pub async fn run_tui(
    calculator: RiskCalculator,
    clipboard: Arc<dyn ClipboardBackend>,
) -> anyhow::Result<()> {
    let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
    let app = App::new(calculator, ClipboardCopier::new(clipboard), outcome_tx);

    terminal::enable_raw_mode()?;
    if let Err(e) = execute!(stdout(), terminal::EnterAlternateScreen) {
        let _ = terminal::disable_raw_mode();
        return Err(e.into());
    }

    // Leave the alternate screen before the panic message is printed
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = restore_terminal();
        default_hook(panic);
    }));

    info!("Terminal UI started");
    let res = event_loop(app, outcome_rx).await;
    let _ = std::panic::take_hook();

    let res = first_error(res, restore_terminal());
    info!("Terminal UI stopped");
    res
}

/// Undo raw mode and the alternate screen, attempting both steps.
fn restore_terminal() -> io::Result<()> {
    let raw = terminal::disable_raw_mode();
    let screen = execute!(stdout(), terminal::LeaveAlternateScreen);
    raw.and(screen)
}

fn first_error(res: anyhow::Result<()>, teardown: io::Result<()>) -> anyhow::Result<()> {
    res.and(teardown.map_err(anyhow::Error::from))
}

async fn event_loop(
    mut app: App,
    mut outcome_rx: mpsc::UnboundedReceiver<crate::clipboard::CopyOutcome<usize>>,
) -> anyhow::Result<()> {
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    loop {
        let now = Instant::now();
        while let Ok(outcome) = outcome_rx.try_recv() {
            app.on_copy_outcome(outcome, now);
        }
        app.tick(now);

        terminal.draw(|f| draw(f, &app, now))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        if app.should_quit {
            return Ok(());
        }

        // Let copy tasks make progress between polls
        tokio::task::yield_now().await;
    }
}
