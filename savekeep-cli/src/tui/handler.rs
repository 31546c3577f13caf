use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{Action, AppMode};

/// Map key events to actions based on current mode
pub fn handle_key(key: KeyEvent, mode: AppMode) -> Action {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    match mode {
        AppMode::Initializing => Action::Tick,
        AppMode::Error => handle_key_error(key),
        AppMode::MainMenu => handle_key_main_menu(key),
        AppMode::Settings => handle_key_settings(key),
        AppMode::BackupList(_) => handle_key_list(key),
        AppMode::Deleting => handle_key_deleting(key),
        AppMode::RestoreConfirmation | AppMode::DeleteConfirmation => handle_key_confirm(key),
        AppMode::CreateBackup
        | AppMode::ChangeSavePath
        | AppMode::ChangeBackupDir
        | AppMode::FirstRunSavePath
        | AppMode::FirstRunBackupDir => handle_key_input(key),
    }
}

fn handle_key_error(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        _ => Action::Tick,
    }
}

fn handle_key_main_menu(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char(c @ '1'..='5') => Action::Choose(digit(c)),
        KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
        KeyCode::Home => Action::GoToFirst,
        KeyCode::End => Action::GoToLast,
        KeyCode::Enter => Action::Submit,
        _ => Action::Tick,
    }
}

fn handle_key_settings(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char(c @ '1'..='3') => Action::Choose(digit(c)),
        KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
        KeyCode::Enter => Action::Submit,
        KeyCode::Char('q') | KeyCode::Esc => Action::Back,
        _ => Action::Tick,
    }
}

fn handle_key_list(key: KeyEvent) -> Action {
    match key.code {
        // Navigation
        KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::Home | KeyCode::Char('g') => Action::GoToFirst,
        KeyCode::End | KeyCode::Char('G') => Action::GoToLast,

        KeyCode::Enter => Action::Submit,
        KeyCode::Char('q') | KeyCode::Esc => Action::Back,
        _ => Action::Tick,
    }
}

fn handle_key_deleting(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char(' ') => Action::ToggleMark,
        KeyCode::Right => Action::MarkAll,
        KeyCode::Left => Action::UnmarkAll,
        _ => handle_key_list(key),
    }
}

fn handle_key_confirm(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => Action::Confirm,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Action::Decline,
        _ => Action::Tick,
    }
}

fn handle_key_input(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::Submit,
        KeyCode::Esc => Action::Back,
        KeyCode::Backspace => Action::InputBackspace,
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            Action::InputChar(c)
        }
        _ => Action::Tick,
    }
}

fn digit(c: char) -> usize {
    c.to_digit(10).map_or(0, |d| d as usize)
}
