//! Carries out the action of a pressed key

use crate::hid::HidSink;
use crate::keymap::{Action, Keymap};
use crate::matrix::Coordinate;
use crate::mode::ModeState;
use crate::screen::{RenderSurface, Screen};

/// What a dispatch did, which decides how long its feedback stays up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dispatched {
    Typed,
    ModeSwitched { mode: usize },
    Unmapped,
}

pub struct Dispatcher<H, S> {
    hid: H,
    surface: S,
}

impl<H: HidSink, S: RenderSurface> Dispatcher<H, S> {
    pub fn new(hid: H, surface: S) -> Self {
        Dispatcher { hid, surface }
    }

    pub fn hid(&mut self) -> &mut H {
        &mut self.hid
    }

    pub fn surface(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn show(&mut self, screen: Screen) {
        screen.render(&mut self.surface);
    }

    /// Handles a press of `at`. The switch key is handled before the active table is looked
    /// at, so it switches in every mode.
    pub fn press<const MODES: usize, const ROWS: usize, const COLS: usize>(
        &mut self,
        keymap: &Keymap<MODES, ROWS, COLS>,
        modes: &mut ModeState<MODES>,
        at: Coordinate,
    ) -> Dispatched {
        let action = if at == keymap.switch_key {
            Action::SwitchMode
        } else {
            keymap.resolve(modes.current(), at)
        };
        self.dispatch(keymap, modes, at, action)
    }

    pub fn dispatch<const MODES: usize, const ROWS: usize, const COLS: usize>(
        &mut self,
        keymap: &Keymap<MODES, ROWS, COLS>,
        modes: &mut ModeState<MODES>,
        at: Coordinate,
        action: Action,
    ) -> Dispatched {
        match action {
            Action::SwitchMode => {
                let mode = modes.advance();
                let name = keymap.mode(mode).name;
                info!("mode {} ({=str})", mode, name);
                self.show(Screen::ModeChanged { mode: name });
                Dispatched::ModeSwitched { mode }
            }
            Action::TypeCommand {
                label,
                command,
                auto_enter,
            } => {
                info!("typing {=str}", label);
                for ch in command.chars() {
                    self.hid.type_char(ch);
                }
                if auto_enter {
                    self.hid.enter();
                }
                self.show(Screen::Command {
                    label,
                    mode: keymap.mode(modes.current()).name,
                    pending: !auto_enter,
                });
                Dispatched::Typed
            }
            Action::Unmapped => {
                info!("nothing mapped at {}", at);
                self.show(Screen::Unmapped { at });
                Dispatched::Unmapped
            }
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::keymap::KUBEPAD;
    use crate::mock::{HidRequest, RecordingHid, RecordingSurface};

    fn dispatcher() -> Dispatcher<RecordingHid, RecordingSurface> {
        Dispatcher::new(RecordingHid::default(), RecordingSurface::default())
    }

    #[test]
    fn type_command_with_enter() {
        let mut dispatcher = dispatcher();
        let mut modes = ModeState::new();

        let done = dispatcher.press(&KUBEPAD, &mut modes, Coordinate::new(0, 0));

        assert_eq!(done, Dispatched::Typed);
        assert_eq!(dispatcher.hid().typed(), "kubectl get pods -A");
        assert_eq!(dispatcher.hid().requests.len(), "kubectl get pods -A".len() + 1);
        assert_eq!(dispatcher.hid().requests.last(), Some(&HidRequest::Enter));
        assert_eq!(dispatcher.hid().enters(), 1);
        assert_eq!(
            dispatcher.surface().frames[0].lines(),
            ["[pods]", "<kubectl>"]
        );
    }

    #[test]
    fn partial_command_waits_for_input() {
        let mut dispatcher = dispatcher();
        let mut modes = ModeState::new();

        dispatcher.press(&KUBEPAD, &mut modes, Coordinate::new(1, 1));

        assert_eq!(dispatcher.hid().typed(), "kubectl logs -f ");
        assert_eq!(dispatcher.hid().enters(), 0);
        assert_eq!(
            dispatcher.surface().frames[0].lines(),
            ["[logs] ...", "<kubectl>"]
        );
    }

    #[test]
    fn commands_do_not_interleave() {
        let mut dispatcher = dispatcher();
        let mut modes = ModeState::new();

        dispatcher.press(&KUBEPAD, &mut modes, Coordinate::new(0, 0));
        dispatcher.press(&KUBEPAD, &mut modes, Coordinate::new(0, 2));

        let mut expected: std::vec::Vec<HidRequest> = "kubectl get pods -A"
            .chars()
            .map(HidRequest::Char)
            .collect();
        expected.push(HidRequest::Enter);
        expected.extend("kubectl get svc -A".chars().map(HidRequest::Char));
        expected.push(HidRequest::Enter);
        assert_eq!(dispatcher.hid().requests, expected);
    }

    #[test]
    fn switch_key_cycles_modes() {
        let mut dispatcher = dispatcher();
        let mut modes = ModeState::new();

        let seen: std::vec::Vec<_> = (0..3)
            .map(|_| dispatcher.press(&KUBEPAD, &mut modes, KUBEPAD.switch_key))
            .collect();

        assert_eq!(
            seen,
            [
                Dispatched::ModeSwitched { mode: 1 },
                Dispatched::ModeSwitched { mode: 2 },
                Dispatched::ModeSwitched { mode: 0 },
            ]
        );
        assert_eq!(modes.current(), 0);
        assert!(dispatcher.hid().requests.is_empty());
        assert_eq!(dispatcher.surface().frames[0].lines(), ["Mode", "<helm>"]);
        assert_eq!(dispatcher.surface().frames[1].lines(), ["Mode", "<debug>"]);
        assert_eq!(dispatcher.surface().frames[2].lines(), ["Mode", "<kubectl>"]);
    }

    #[test]
    fn switch_key_wins_over_table() {
        let mut keymap = KUBEPAD;
        let switch = keymap.switch_key;
        keymap.modes[1].table[switch.row as usize][switch.col as usize] =
            crate::keymap::cmd("oops", "oops");
        let mut dispatcher = dispatcher();
        let mut modes = ModeState::new();

        dispatcher.press(&keymap, &mut modes, switch);
        let done = dispatcher.press(&keymap, &mut modes, switch);

        assert_eq!(done, Dispatched::ModeSwitched { mode: 2 });
        assert!(dispatcher.hid().requests.is_empty());
    }

    #[test]
    fn unmapped_key_is_shown() {
        let mut dispatcher = dispatcher();
        let mut modes = ModeState::new();
        dispatcher.press(&KUBEPAD, &mut modes, KUBEPAD.switch_key);

        let done = dispatcher.press(&KUBEPAD, &mut modes, Coordinate::new(3, 1));

        assert_eq!(done, Dispatched::Unmapped);
        assert!(dispatcher.hid().requests.is_empty());
        assert_eq!(
            dispatcher.surface().frames[1].lines(),
            ["Not Mapped", "row 3 col 1"]
        );
    }

    #[test]
    fn each_screen_is_one_clear_and_one_flush() {
        let mut dispatcher = dispatcher();
        let mut modes = ModeState::new();

        dispatcher.press(&KUBEPAD, &mut modes, Coordinate::new(0, 0));
        dispatcher.press(&KUBEPAD, &mut modes, KUBEPAD.switch_key);
        dispatcher.press(&KUBEPAD, &mut modes, Coordinate::new(3, 1));

        let surface = dispatcher.surface();
        assert_eq!(surface.clears, 3);
        assert_eq!(surface.frames.len(), 3);
        assert!(surface.frames.iter().all(|frame| frame.texts.len() == 2));
    }
}
