use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{info, warn};

use inertia_core::forms::{Inquiry, InquiryOutbox};
use inertia_core::AppConfig;
use inertia_tui::{
    app::{App, Mode},
    event::{AppEvent, EventHandler, InquiryResult},
    input::{handle_key_event, Action},
    keymap::Keymap,
    widgets::{
        BackToTopWidget, PageViewWidget, PopupWidget, ProgressBarWidget, StatusBarWidget,
    },
    Page,
};

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    // Create keymap from config
    let keymap = Keymap::from_config(&config.keymap);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("Inertia"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut inquiry_writes = JoinSet::new();
    let result = event_loop(&mut terminal, config, &keymap, &mut inquiry_writes).await;

    // Submissions still in flight must reach the outbox before the runtime
    // exits, whether or not the loop failed
    finish_inquiry_writes(&mut inquiry_writes).await;

    // Restore terminal even if the loop failed
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Tui,
    config: Arc<AppConfig>,
    keymap: &Keymap,
    inquiry_writes: &mut JoinSet<()>,
) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(config.clone(), Page::sample(), size.width, size.height);

    let event_handler = EventHandler::new(config.ui.tick_rate_ms);

    // Create channel for async inquiry writes
    let (inquiry_tx, mut inquiry_rx) = mpsc::unbounded_channel::<InquiryResult>();

    let mut last_frame = Instant::now();

    loop {
        // Process any completed inquiry writes (non-blocking)
        while let Ok(result) = inquiry_rx.try_recv() {
            app.handle_inquiry_result(result);
        }
        while inquiry_writes.try_join_next().is_some() {}

        // Fire the animation frame once its interval has passed
        if app.frame_due(last_frame.elapsed()) {
            app.pump_frame();
            last_frame = Instant::now();
        }

        // Draw UI
        terminal.draw(|frame| {
            let size = frame.area();

            // Progress bar + page + status bar
            let main_layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1),
                    Constraint::Min(1),
                    Constraint::Length(1),
                ])
                .split(size);

            ProgressBarWidget::render(frame, main_layout[0], &app);
            PageViewWidget::render(frame, main_layout[1], &app);
            BackToTopWidget::render(frame, main_layout[1], &app);
            StatusBarWidget::render(frame, main_layout[2], &app);

            // Render popups on top
            match &app.mode {
                Mode::Inquiry(draft) => {
                    let remaining = app.remaining_attempts();
                    PopupWidget::render_inquiry(frame, draft, remaining, &app.theme);
                }
                Mode::Help => PopupWidget::render_help(frame, &app.config.keymap, &app.theme),
                Mode::Normal => {}
            }
        })?;

        // Wake up in time for the next frame while animating
        let event = if app.frame_pending() {
            event_handler.next_within(app.poll_timeout(last_frame.elapsed()))?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, &app, keymap);
                    handle_action(&mut app, action, &inquiry_tx, inquiry_writes);
                }
                AppEvent::Wheel { column, row, down } => {
                    app.clear_status();
                    app.on_wheel(column, row, down);
                }
                AppEvent::Resize(width, height) => app.resize(width, height),
                AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    app.shutdown();
    info!("viewer closed");
    Ok(())
}

fn handle_action(
    app: &mut App,
    action: Action,
    inquiry_tx: &mpsc::UnboundedSender<InquiryResult>,
    inquiry_writes: &mut JoinSet<()>,
) {
    // Keep status messages visible until the next scroll command
    if !matches!(action, Action::None | Action::InputChar(_) | Action::Backspace) {
        app.clear_status();
    }

    match action {
        Action::Quit => app.should_quit = true,
        Action::LineDown => app.line_down(),
        Action::LineUp => app.line_up(),
        Action::PageDown => app.page_down(),
        Action::PageUp => app.page_up(),
        Action::BackToTop => app.back_to_top(),
        Action::JumpToEnd => app.jump_to_end(),
        Action::NextSection => app.next_section(),
        Action::PrevSection => app.prev_section(),
        Action::OpenInquiry => app.open_inquiry(),
        Action::ToggleHelp => app.toggle_help(),
        Action::ExitMode => app.exit_mode(),
        Action::Confirm => {
            if let Some(inquiry) = app.confirm() {
                let outbox = app.outbox().clone();
                spawn_inquiry_write(inquiry_writes, outbox, inquiry, inquiry_tx.clone());
            }
        }
        Action::InputChar(c) => app.input_char(c),
        Action::Backspace => app.backspace(),
        Action::None => {}
    }
}

/// Append the inquiry on a tokio task and report back over the channel
fn spawn_inquiry_write(
    writes: &mut JoinSet<()>,
    outbox: InquiryOutbox,
    inquiry: Inquiry,
    tx: mpsc::UnboundedSender<InquiryResult>,
) {
    writes.spawn(async move {
        let result = match outbox.append(&inquiry).await {
            Ok(()) => InquiryResult::Success { id: inquiry.id },
            Err(e) => {
                warn!(error = %e, "inquiry was not stored");
                InquiryResult::Failure {
                    error: e.to_string(),
                }
            }
        };
        let _ = tx.send(result);
    });
}

/// Wait for every spawned outbox write to finish
async fn finish_inquiry_writes(writes: &mut JoinSet<()>) {
    if !writes.is_empty() {
        info!(pending = writes.len(), "waiting for inquiry writes");
    }
    while let Some(joined) = writes.join_next().await {
        if let Err(e) = joined {
            warn!(error = %e, "inquiry write task failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_waits_for_inquiry_writes() {
        let dir = tempfile::tempdir().unwrap();
        let outbox = InquiryOutbox::new(dir.path().join("inquiries.jsonl"));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let submitted: Vec<Inquiry> = ["a@example.com", "b@example.com", "c@example.com"]
            .iter()
            .map(|contact| Inquiry::new(contact, "Open day").unwrap())
            .collect();

        // The runtime is dropped right after the viewer returns, as in main
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async {
            let mut writes = JoinSet::new();
            for inquiry in &submitted {
                spawn_inquiry_write(&mut writes, outbox.clone(), inquiry.clone(), tx.clone());
            }
            finish_inquiry_writes(&mut writes).await;
            assert!(writes.is_empty());
        });
        drop(runtime);

        let stored = std::fs::read_to_string(outbox.path()).unwrap();
        assert_eq!(stored.lines().count(), submitted.len());
        for inquiry in &submitted {
            assert!(stored.contains(&inquiry.id.to_string()));
        }

        let mut reported = 0;
        while let Ok(result) = rx.try_recv() {
            assert!(matches!(result, InquiryResult::Success { .. }));
            reported += 1;
        }
        assert_eq!(reported, submitted.len());
    }
}
