/// User actions that can be performed in the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move cursor up
    MoveUp,
    /// Move cursor down
    MoveDown,
    /// Move cursor up by a page
    PageUp,
    /// Move cursor down by a page
    PageDown,
    /// Go to first item
    GoToFirst,
    /// Go to last item
    GoToLast,
    /// Pick a numbered menu entry (1-based)
    Choose(usize),
    /// Enter: activate menu entry, pick highlighted backup, or submit input
    Submit,
    /// Leave the current screen without committing
    Back,
    /// Type a character into the text input
    InputChar(char),
    /// Delete the character before the input cursor
    InputBackspace,
    /// Mark/unmark the highlighted backup for deletion
    ToggleMark,
    /// Mark every backup
    MarkAll,
    /// Unmark every backup
    UnmarkAll,
    /// Confirm a pending restore or delete
    Confirm,
    /// Decline a pending restore or delete
    Decline,
    /// Quit the application
    Quit,
    /// No action
    Tick,
}
