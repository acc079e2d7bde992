use crate::scenario::InputKey;
use sandbox_sim::{InputSource, InputState};

/// Replays an input track against the simulated clock.
///
/// The state of the latest key at or before the current time is held; before the first
/// key nothing is pressed.
pub struct ScriptedInput {
    keys: Vec<InputKey>,
    now_s: f32,
    cursor: usize,
}

impl ScriptedInput {
    pub fn new(mut keys: Vec<InputKey>) -> Self {
        keys.sort_by(|a, b| a.at_s.total_cmp(&b.at_s));
        Self {
            keys,
            now_s: 0.0,
            cursor: 0,
        }
    }

    /// Move the clock forward. Time never runs backwards.
    pub fn set_time(&mut self, now_s: f32) {
        self.now_s = self.now_s.max(now_s);
        while self
            .keys
            .get(self.cursor)
            .is_some_and(|key| key.at_s <= self.now_s)
        {
            self.cursor += 1;
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> InputState {
        let Some(key) = self.cursor.checked_sub(1).and_then(|i| self.keys.get_mut(i)) else {
            return InputState::default();
        };
        let state = key.state;
        // Mouse movement is delivered once, not for the whole hold.
        key.state.look_delta = [0.0, 0.0];
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(at_s: f32, state: InputState) -> InputKey {
        InputKey { at_s, state }
    }

    #[test]
    fn holds_latest_key() {
        let forward = InputState {
            forward: true,
            ..InputState::default()
        };
        let brake = InputState {
            brake: true,
            ..InputState::default()
        };
        let mut script = ScriptedInput::new(vec![key(2.0, brake), key(1.0, forward)]);

        script.set_time(0.5);
        assert_eq!(script.poll(), InputState::default());
        script.set_time(1.5);
        assert!(script.poll().forward);
        script.set_time(2.0);
        assert!(script.poll().brake);
    }

    #[test]
    fn look_delta_is_consumed_once() {
        let look = InputState {
            look_delta: [10.0, 0.0],
            ..InputState::default()
        };
        let mut script = ScriptedInput::new(vec![key(0.0, look)]);
        script.set_time(0.1);
        assert_eq!(script.poll().look_delta, [10.0, 0.0]);
        assert_eq!(script.poll().look_delta, [0.0, 0.0]);
    }
}
