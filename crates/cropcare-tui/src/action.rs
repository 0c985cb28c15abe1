/// Actions that the TUI can process, mapped from keyboard input or internal events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    NavigateBack,
    /// Enter: submit the focused form or confirm.
    Confirm,
    MoveUp,
    MoveDown,
    NextField,
    PrevField,
    /// Text typed into the focused input.
    Input(char),
    Backspace,
    /// Text pasted or a file dropped onto the terminal.
    Paste(String),
    ShowDashboard,
    ShowPredict,
    ShowHistory,
    SwitchAuthTab,
    TogglePasswordVisibility,
    OpenFilePrompt,
    RemoveFile,
    AnalyzeAnother,
    Refresh,
    Export,
    ToggleTheme,
    DismissToast,
    ToggleHelp,
    Tick,
    Resize(u16, u16),
    None,
}
