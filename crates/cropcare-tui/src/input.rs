use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::action::Action;

/// Whether keys go to a text field or are shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Map a crossterm terminal event to a TUI action.
pub fn map_event(event: &Event, mode: InputMode) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => match mode {
            InputMode::Normal => map_key(key),
            InputMode::Editing => map_editing_key(key),
        },
        Event::Paste(text) => Action::Paste(text.clone()),
        Event::Resize(w, h) => Action::Resize(*w, *h),
        _ => Action::None,
    }
}

fn ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

fn map_key(key: &KeyEvent) -> Action {
    // Ctrl+C always quits
    if ctrl(key, 'c') {
        return Action::Quit;
    }

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Enter => Action::Confirm,
        KeyCode::Esc => Action::NavigateBack,
        KeyCode::Char('1') | KeyCode::Char('d') => Action::ShowDashboard,
        KeyCode::Char('2') | KeyCode::Char('p') => Action::ShowPredict,
        KeyCode::Char('3') | KeyCode::Char('h') => Action::ShowHistory,
        KeyCode::Char('o') => Action::OpenFilePrompt,
        KeyCode::Char('x') | KeyCode::Delete => Action::RemoveFile,
        KeyCode::Char('a') => Action::AnalyzeAnother,
        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Char('e') => Action::Export,
        KeyCode::Char('t') => Action::ToggleTheme,
        KeyCode::Char('n') => Action::DismissToast,
        KeyCode::Char('?') => Action::ToggleHelp,
        _ => Action::None,
    }
}

fn map_editing_key(key: &KeyEvent) -> Action {
    if ctrl(key, 'c') {
        return Action::Quit;
    }
    if ctrl(key, 't') {
        return Action::SwitchAuthTab;
    }
    if ctrl(key, 'p') {
        return Action::TogglePasswordVisibility;
    }
    if ctrl(key, 'y') {
        return Action::ToggleTheme;
    }

    match key.code {
        KeyCode::Enter => Action::Confirm,
        KeyCode::Esc => Action::NavigateBack,
        KeyCode::Tab | KeyCode::Down => Action::NextField,
        KeyCode::BackTab | KeyCode::Up => Action::PrevField,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => Action::Input(c),
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use ratatui::crossterm::event::KeyEventState;

    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn letters_are_text_while_editing() {
        let q = press(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(map_event(&q, InputMode::Editing), Action::Input('q'));
        assert_eq!(map_event(&q, InputMode::Normal), Action::Quit);
    }

    #[test]
    fn ctrl_c_quits_in_both_modes() {
        let c = press(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_event(&c, InputMode::Editing), Action::Quit);
        assert_eq!(map_event(&c, InputMode::Normal), Action::Quit);
    }

    #[test]
    fn paste_carries_text() {
        let paste = Event::Paste("/tmp/leaf.png".into());
        assert_eq!(
            map_event(&paste, InputMode::Normal),
            Action::Paste("/tmp/leaf.png".into())
        );
    }
}
