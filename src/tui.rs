use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::style::{Color, Modifier, Style};
use ratatui::Frame;

use crate::error::Result;

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::Yellow)
    .add_modifier(Modifier::BOLD);

pub const FOOTER_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const ACCENT_STYLE: Style = Style::new().fg(Color::Rgb(255, 103, 0));

pub const ACTIVE_STYLE: Style = Style::new().fg(Color::Rgb(16, 185, 129));
pub const INACTIVE_STYLE: Style = Style::new().fg(Color::Red);
pub const ERROR_STYLE: Style = Style::new().fg(Color::Red);

pub const SELECTED_STYLE: Style = Style::new()
    .bg(Color::Rgb(40, 40, 60))
    .add_modifier(Modifier::BOLD);

/// Redraw at least this often so loader progress shows up without input.
const TICK: Duration = Duration::from_millis(100);

/// Wrap text to a given width. Returns (wrapped_string, line_count).
pub fn wrap_text(text: &str, width: usize) -> (String, u16) {
    if width == 0 {
        return (text.to_string(), 1);
    }
    let wrapped = textwrap::fill(text, width);
    let lines = wrapped.lines().count().max(1) as u16;
    (wrapped, lines)
}

// ---------------------------------------------------------------------------
// Screen stack
// ---------------------------------------------------------------------------

pub enum ViewAction {
    Continue,
    /// Pop this screen and return to the one below.
    Close,
    /// Push a new screen on top of this one.
    Open(Box<dyn View>),
    /// Leave the application.
    Quit,
}

pub trait View {
    fn draw(&mut self, frame: &mut Frame);
    fn handle_key(&mut self, code: KeyCode) -> ViewAction;
    /// Called once per loop iteration, before drawing.
    fn tick(&mut self) {}
    /// Called when the screen is popped; loaders are unmounted here.
    fn on_close(&mut self) {}
}

/// Run a stack of screens starting from `root`. Sets up the terminal, event
/// loop, and panic hook, then restores the terminal on exit.
pub fn run_views(root: Box<dyn View>) -> Result<()> {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        hook(info);
    }));

    let mut terminal = ratatui::init();
    let mut stack: Vec<Box<dyn View>> = vec![root];

    let result: Result<()> = loop {
        let Some(view) = stack.last_mut() else {
            break Ok(());
        };
        view.tick();
        if let Err(e) = terminal.draw(|frame| view.draw(frame)) {
            break Err(e.into());
        }

        match event::poll(TICK) {
            Err(e) => break Err(e.into()),
            Ok(false) => continue,
            Ok(true) => {}
        }
        match event::read() {
            Err(e) => break Err(e.into()),
            Ok(Event::Key(key)) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    break Ok(());
                }
                match view.handle_key(key.code) {
                    ViewAction::Continue => {}
                    ViewAction::Open(next) => stack.push(next),
                    ViewAction::Close => {
                        if let Some(mut closed) = stack.pop() {
                            closed.on_close();
                        }
                    }
                    ViewAction::Quit => break Ok(()),
                }
            }
            _ => {}
        }
    };

    while let Some(mut view) = stack.pop() {
        view.on_close();
    }
    drop(terminal);
    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text() {
        let (s, n) = wrap_text("connection refused while loading employees", 12);
        assert!(n > 1);
        assert!(s.lines().all(|l| l.len() <= 12));
        assert_eq!(wrap_text("abc", 0), ("abc".to_string(), 1));
    }
}
