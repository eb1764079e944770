/// Keyboard input collector.
///
/// Every Press or Repeat of a movement key becomes one queued move, so a
/// held key keeps walking at the terminal's repeat rate and a quick tap
/// between ticks is never lost. Release events are ignored.
///
/// Key map:
///   Arrows / WASD   →  Move
///   R               →  Restart
///   Esc / Q / ^C    →  Quit

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use rockfall::Direction;

pub struct InputState {
    /// Moves collected during the most recent drain, in arrival order.
    moves: Vec<Direction>,

    /// Raw key events collected during drain, for meta-key handling.
    raw_events: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            moves: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events.
    /// Call this once per frame, before the simulation tick.
    pub fn drain_events(&mut self) {
        self.moves.clear();
        self.raw_events.clear();

        // Read all available events without blocking
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.accept(key);
            }
        }
    }

    /// Moves from this frame's drain, oldest first.
    pub fn moves(&self) -> &[Direction] {
        &self.moves
    }

    pub fn quit_pressed(&self) -> bool {
        self.raw_events.iter().any(is_quit)
    }

    pub fn restart_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            !k.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(k.code, KeyCode::Char('r') | KeyCode::Char('R'))
        })
    }

    // ── Internal ──

    fn accept(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if let Some(dir) = direction_for(key.code) {
            self.moves.push(dir);
        }
        self.raw_events.push(key);
    }
}

/// Movement key mapping: arrows and WASD.
pub fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),
        _ => None,
    }
}

fn is_quit(k: &KeyEvent) -> bool {
    if k.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(k.code, KeyCode::Char('c') | KeyCode::Char('C'));
    }
    matches!(k.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent { code, modifiers, kind, state: KeyEventState::NONE }
    }

    fn press(code: KeyCode) -> KeyEvent {
        key(code, KeyEventKind::Press, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_and_wasd_map_to_directions() {
        assert_eq!(direction_for(KeyCode::Up), Some(Direction::Up));
        assert_eq!(direction_for(KeyCode::Char('a')), Some(Direction::Left));
        assert_eq!(direction_for(KeyCode::Char('S')), Some(Direction::Down));
        assert_eq!(direction_for(KeyCode::Right), Some(Direction::Right));
        assert_eq!(direction_for(KeyCode::Char('x')), None);
    }

    #[test]
    fn presses_and_repeats_queue_in_order() {
        let mut input = InputState::new();
        input.accept(press(KeyCode::Left));
        input.accept(key(KeyCode::Left, KeyEventKind::Repeat, KeyModifiers::NONE));
        input.accept(press(KeyCode::Up));
        assert_eq!(input.moves(), &[Direction::Left, Direction::Left, Direction::Up]);
    }

    #[test]
    fn releases_are_ignored() {
        let mut input = InputState::new();
        input.accept(key(KeyCode::Right, KeyEventKind::Release, KeyModifiers::NONE));
        assert!(input.moves().is_empty());
    }

    #[test]
    fn quit_keys() {
        let mut input = InputState::new();
        input.accept(key(KeyCode::Char('c'), KeyEventKind::Press, KeyModifiers::CONTROL));
        assert!(input.quit_pressed());

        let mut input = InputState::new();
        input.accept(press(KeyCode::Esc));
        assert!(input.quit_pressed());

        let mut input = InputState::new();
        input.accept(press(KeyCode::Char('c')));
        assert!(!input.quit_pressed());
    }

    #[test]
    fn restart_key() {
        let mut input = InputState::new();
        input.accept(press(KeyCode::Char('r')));
        assert!(input.restart_pressed());
        assert!(!input.quit_pressed());
    }
}
