/// Identifies one editor window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u64);

/// All messages that can be sent through the FLTK channel.
/// Each widget callback sends one of these; the dispatch loop in main handles them.
#[derive(Debug, Clone)]
pub enum Message {
    // File
    FileNew(WindowId),
    FileOpen(WindowId),
    FileSave(WindowId),
    FileSaveAs(WindowId),
    WindowClose(WindowId),

    // Window chrome
    OpenSettings(WindowId),
    TogglePin(WindowId),

    // Editor feedback
    BufferModified(WindowId),
    CursorMoved(WindowId),

    /// Timer tick: pick up files forwarded by other launches
    PollInstanceQueue,
}
