mod app;
mod tui;
mod ui;

use std::fs::{self, OpenOptions};
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, style::Style, widgets::Widget};
use savekeep_core::{Config, default_config_path};

use app::{Action, AppMode, AppState, MAIN_MENU_ITEMS};
use tui::{AppEvent, EventHandler, handle_key};
use ui::{
    AppLayout, BackupListView, ConfirmDeleteView, ConfirmRestoreView, ErrorView, Footer, Header,
    InputView, ListStyle, MenuView, NotificationLine, Theme,
};

/// How long a notification stays on screen
const NOTIFICATION_TTL: Duration = Duration::from_secs(2);

const LOG_FILE: &str = "savekeep.log";

/// SAVEKEEP - Terminal backup manager for game save files
#[derive(Parser, Debug)]
#[command(name = "savekeep")]
#[command(about = "Back up and restore a game's save file from the terminal")]
#[command(version)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let config_path = args
        .config
        .clone()
        .or_else(default_config_path)
        .unwrap_or_else(|| PathBuf::from(savekeep_core::config::CONFIG_FILE));

    init_logging(&config_path, args.verbose)?;

    let config = Config::load(&config_path)
        .wrap_err_with(|| format!("could not read {}", config_path.display()))?;
    tracing::info!(
        config = %config_path.display(),
        first_run = config.is_none(),
        "starting"
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run app
    let result = run_app(&mut terminal, AppState::new(config_path, config));

    // Restore terminal
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;

    result
}

/// Log to a file beside the config; the terminal belongs to the UI
fn init_logging(config_path: &Path, verbose: u8) -> Result<()> {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let log_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(log_dir)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join(LOG_FILE))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .init();
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut state: AppState,
) -> Result<()> {
    let theme = Theme::default();
    let mut event_handler = EventHandler::new(100);

    loop {
        state.initialize();

        for id in state.take_scheduled_clears() {
            event_handler.schedule_clear(id, NOTIFICATION_TTL);
        }

        terminal.draw(|frame| {
            let area = frame.area();
            let layout = AppLayout::new(area);

            // Background
            frame
                .buffer_mut()
                .set_style(area, Style::default().bg(theme.bg));

            // Update visible height for scrolling
            state.visible_height = layout.body.height as usize;

            Header::new(&state, &theme).render(layout.header, frame.buffer_mut());
            NotificationLine::new(state.notification.as_ref(), &theme)
                .render(layout.notice, frame.buffer_mut());
            render_body(&state, &theme, layout.body, frame.buffer_mut());
            Footer::new(state.mode, &theme).render(layout.footer, frame.buffer_mut());
        })?;

        match event_handler.next()? {
            AppEvent::Key(key) => {
                let action = handle_key(key, state.mode);
                handle_action(&mut state, action);
            }
            AppEvent::ClearNotification(id) => state.clear_notification(id),
            AppEvent::Resize(_, _) => {
                // Terminal will redraw on next loop
            }
            AppEvent::Tick => {}
        }

        if state.should_quit {
            break;
        }
    }

    tracing::info!("exiting");
    Ok(())
}

fn render_body(
    state: &AppState,
    theme: &Theme,
    area: ratatui::layout::Rect,
    buf: &mut ratatui::buffer::Buffer,
) {
    match state.mode {
        AppMode::Initializing => {
            let msg = "Opening backup catalog...";
            let x = area.x + area.width.saturating_sub(msg.len() as u16) / 2;
            buf.set_string(x, area.y + area.height / 2, msg, Style::default().fg(theme.fg_dim));
        }
        AppMode::MainMenu => {
            let items = MAIN_MENU_ITEMS.iter().map(|s| s.to_string()).collect();
            MenuView::new("Main Menu", items, state.menu_index, theme).render(area, buf);
        }
        AppMode::Settings => {
            let items = vec![
                "Change save path".to_string(),
                "Change backup directory".to_string(),
                format!(
                    "Auto-backup before restore: {}",
                    if state.config.auto_backup { "ON" } else { "OFF" }
                ),
            ];
            MenuView::new("Settings", items, state.settings_index, theme).render(area, buf);
        }
        AppMode::BackupList(_) | AppMode::RestoreConfirmation => {
            BackupListView::new(
                &state.backups,
                state.selected_index,
                state.scroll_offset,
                ListStyle::Plain,
                theme,
            )
            .render(area, buf);

            if state.mode == AppMode::RestoreConfirmation
                && let Some(record) = &state.pending_restore
            {
                ConfirmRestoreView::new(record, state.config.auto_backup, theme).render(area, buf);
            }
        }
        AppMode::Deleting | AppMode::DeleteConfirmation => {
            BackupListView::new(
                &state.backups,
                state.selected_index,
                state.scroll_offset,
                ListStyle::Checkbox(&state.selection),
                theme,
            )
            .render(area, buf);

            if state.mode == AppMode::DeleteConfirmation {
                let marked = state.marked_backups();
                ConfirmDeleteView::new(&marked, theme).render(area, buf);
            }
        }
        AppMode::CreateBackup => {
            InputView::new(
                "Create Backup",
                "Name this backup (leave empty for a timestamp):",
                &state.input,
                theme,
            )
            .render(area, buf);
        }
        AppMode::ChangeSavePath => {
            InputView::new("Settings", "New save file path:", &state.input, theme)
                .with_error(state.input_error.as_deref())
                .render(area, buf);
        }
        AppMode::ChangeBackupDir => {
            InputView::new("Settings", "New backup directory:", &state.input, theme)
                .with_error(state.input_error.as_deref())
                .render(area, buf);
        }
        AppMode::FirstRunSavePath => {
            InputView::new(
                "Welcome",
                "Step 1/2: where is your game's save file?",
                &state.input,
                theme,
            )
            .render(area, buf);
        }
        AppMode::FirstRunBackupDir => {
            InputView::new(
                "Welcome",
                "Step 2/2: where should backups be stored?",
                &state.input,
                theme,
            )
            .with_error(state.input_error.as_deref())
            .render(area, buf);
        }
        AppMode::Error => {
            let message = state.error_message.as_deref().unwrap_or("unknown error");
            ErrorView::new(message, theme).render(area, buf);
        }
    }
}

fn handle_action(state: &mut AppState, action: Action) {
    // Nothing but quitting leaves the error screen
    if state.mode == AppMode::Error && action != Action::Quit {
        return;
    }

    match action {
        Action::MoveUp => state.move_up(),
        Action::MoveDown => state.move_down(),
        Action::PageUp => state.page_up(),
        Action::PageDown => state.page_down(),
        Action::GoToFirst => state.go_to_first(),
        Action::GoToLast => state.go_to_last(),
        Action::Choose(entry) => state.choose(entry),
        Action::Submit => state.submit(),
        Action::Back => state.back(),
        Action::InputChar(ch) => state.input_char(ch),
        Action::InputBackspace => state.input_backspace(),
        Action::ToggleMark => state.toggle_mark(),
        Action::MarkAll => state.mark_all(),
        Action::UnmarkAll => state.unmark_all(),
        Action::Confirm => state.confirm(),
        Action::Decline => state.decline(),
        Action::Quit => state.quit(),
        Action::Tick => {}
    }
}
