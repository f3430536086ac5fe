//! The command vocabulary accepted by the executor. `(command, char)` is
//! the wire shape from the external interface: exactly one of
//! `Command::InsertChar` or any other variant is meaningful per call.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    InsertChar(char),

    Left,
    Right,
    Up,
    Down,
    WordLeft,
    WordRight,
    ParagraphForward,
    ParagraphBackward,
    PageUp,
    PageDown,
    Home,
    End,
    Top,
    Bottom,

    MarkLeft,
    MarkRight,
    MarkUp,
    MarkDown,
    MarkWordLeft,
    MarkWordRight,
    MarkHome,
    MarkEnd,
    MarkTop,
    MarkBottom,

    Tab,
    Enter,
    Backspace,
    DelChar,

    Undo,
    Redo,

    BlockShiftLeft,
    BlockShiftRight,

    Copy,
    Cut,
    Paste,
    Remove,

    ColumnHighlightToggle,
    OverwriteToggle,
    MatchBracket,
}

impl Command {
    /// Mark-motion commands extend the current selection; every other
    /// motion command clears it (per the `highlight` state machine).
    pub fn is_mark_motion(&self) -> bool {
        matches!(
            self,
            Command::MarkLeft
                | Command::MarkRight
                | Command::MarkUp
                | Command::MarkDown
                | Command::MarkWordLeft
                | Command::MarkWordRight
                | Command::MarkHome
                | Command::MarkEnd
                | Command::MarkTop
                | Command::MarkBottom
        )
    }

    pub fn is_motion(&self) -> bool {
        self.is_mark_motion()
            || matches!(
                self,
                Command::Left
                    | Command::Right
                    | Command::Up
                    | Command::Down
                    | Command::WordLeft
                    | Command::WordRight
                    | Command::ParagraphForward
                    | Command::ParagraphBackward
                    | Command::PageUp
                    | Command::PageDown
                    | Command::Home
                    | Command::End
                    | Command::Top
                    | Command::Bottom
            )
    }

    /// Whether this command is a forward (non-undo/redo) modification —
    /// used to decide whether the redo log should be reset.
    pub fn is_forward_modification(&self) -> bool {
        matches!(
            self,
            Command::InsertChar(_)
                | Command::Tab
                | Command::Enter
                | Command::Backspace
                | Command::DelChar
                | Command::BlockShiftLeft
                | Command::BlockShiftRight
                | Command::Cut
                | Command::Paste
                | Command::Remove
        )
    }
}
