use std::collections::HashSet;

use crossterm::event::KeyCode;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    /// Discrete presses since the previous tick, in arrival order
    pub pressed: Vec<KeyCode>,
    /// Keys currently held down
    pub held: HashSet<KeyCode>,
}

impl InputSnapshot {
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.pressed.contains(&code)
    }

    /// Letter press, ignoring case.
    pub fn was_pressed_char(&self, c: char) -> bool {
        self.pressed.iter().any(|k| matches!(k, KeyCode::Char(p) if p.eq_ignore_ascii_case(&c)))
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        self.held.contains(&code)
    }

    /// Letter held, ignoring case.
    pub fn is_held_char(&self, c: char) -> bool {
        self.held.iter().any(|k| matches!(k, KeyCode::Char(p) if p.eq_ignore_ascii_case(&c)))
    }

    /// Copy with the discrete presses removed; used for the extra ticks of
    /// a frame so one press is seen by exactly one tick.
    pub fn without_presses(&self) -> Self {
        Self { pressed: Vec::new(), held: self.held.clone() }
    }
}

#[cfg(test)]
impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pressed(keys: &[KeyCode]) -> Self {
        Self { pressed: keys.to_vec(), held: HashSet::new() }
    }

    pub fn with_held(keys: &[KeyCode]) -> Self {
        Self { pressed: Vec::new(), held: keys.iter().copied().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_lookup_ignores_case() {
        let input = InputSnapshot::with_pressed(&[KeyCode::Char('R')]);
        assert!(input.was_pressed_char('r'));
        assert!(!input.was_pressed_char('p'));
        let held = InputSnapshot::with_held(&[KeyCode::Char('w')]);
        assert!(held.is_held_char('W'));
    }

    #[test]
    fn test_without_presses_keeps_held() {
        let mut input = InputSnapshot::with_held(&[KeyCode::Left]);
        input.pressed.push(KeyCode::Char(' '));
        let rest = input.without_presses();
        assert!(rest.pressed.is_empty());
        assert!(rest.is_held(KeyCode::Left));
    }
}
