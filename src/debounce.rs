use heapless::Vec;

use crate::matrix::{Coordinate, Grid};
use crate::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Pressed,
    Released,
}

/// A stable change of one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub at: Coordinate,
    pub edge: Edge,
    pub time: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyState {
    Released,
    /// Closed since `since`, not yet reported
    Pressing { since: Instant },
    /// `reported` is false for keys that were already held at boot
    Pressed { reported: bool },
    /// Open since `since`, release not yet reported
    Releasing { since: Instant, reported: bool },
}

/// Reports a key as pressed once its contact has stayed closed for the settle window, and
/// then not again until it has stayed open for the settle window. Holding a key therefore
/// gives one press, however often it is scanned.
///
/// A press coming less than the rearm time after the key's last reported press is taken
/// as chatter: it is swallowed, along with its release.
pub struct Debouncer<const ROWS: usize, const COLS: usize> {
    settle: Duration,
    rearm: Duration,
    key_state: [[KeyState; COLS]; ROWS],
    last_press: [[Option<Instant>; COLS]; ROWS],
    booted: bool,
}

impl<const ROWS: usize, const COLS: usize> Debouncer<ROWS, COLS> {
    pub fn new(settle: Duration) -> Self {
        Debouncer {
            settle,
            rearm: Duration::from_ticks(0),
            key_state: [[KeyState::Released; COLS]; ROWS],
            last_press: [[None; COLS]; ROWS],
            booted: false,
        }
    }

    pub fn with_rearm(mut self, rearm: Duration) -> Self {
        self.rearm = rearm;
        self
    }

    /// Pushes a [`KeyEvent`] for each key whose stable state changed. Returns if any did.
    ///
    /// Keys closed on the first call are taken as held since before boot: they are never
    /// reported until released and pressed again.
    pub fn debounce<const EVENTS: usize>(
        &mut self,
        presses: &Grid<ROWS, COLS>,
        now: Instant,
        events: &mut Vec<KeyEvent, EVENTS>,
    ) -> bool {
        let booting = !self.booted;
        self.booted = true;

        let mut changed = false;
        for (r, (states, row)) in self.key_state.iter_mut().zip(presses).enumerate() {
            for (c, (state, &closed)) in states.iter_mut().zip(row).enumerate() {
                if booting && closed {
                    *state = KeyState::Pressed { reported: false };
                    continue;
                }

                let Some(edge) = step(state, closed, now, self.settle) else {
                    continue;
                };
                if edge == Edge::Pressed {
                    let last_press = &mut self.last_press[r][c];
                    if matches!(*last_press, Some(last) if now - last < self.rearm) {
                        trace!("chatter at row {} col {}", r, c);
                        *state = KeyState::Pressed { reported: false };
                        continue;
                    }
                    *last_press = Some(now);
                }
                let event = KeyEvent {
                    at: Coordinate::new(r as u8, c as u8),
                    edge,
                    time: now,
                };
                debug!("{} at {}", edge, event.at);
                if events.push(event).is_err() {
                    warn!("key event dropped");
                }
                changed = true;
            }
        }
        changed
    }

    /// Whether `at` is reported pressed and has not been reported released since
    pub fn is_down(&self, at: Coordinate) -> bool {
        self.key_state
            .get(at.row as usize)
            .and_then(|row| row.get(at.col as usize))
            .map_or(false, |state| {
                matches!(
                    state,
                    KeyState::Pressed { .. } | KeyState::Releasing { .. }
                )
            })
    }
}

impl<const ROWS: usize, const COLS: usize> Default for Debouncer<ROWS, COLS> {
    fn default() -> Self {
        let timings = crate::config::Timings::DEFAULT;
        Self::new(timings.settle).with_rearm(timings.rearm)
    }
}

fn step(state: &mut KeyState, closed: bool, now: Instant, settle: Duration) -> Option<Edge> {
    match (*state, closed) {
        (KeyState::Released, true) => {
            *state = KeyState::Pressing { since: now };
            if settle.ticks() == 0 {
                *state = KeyState::Pressed { reported: true };
                return Some(Edge::Pressed);
            }
            None
        }
        (KeyState::Pressing { .. }, false) => {
            *state = KeyState::Released;
            None
        }
        (KeyState::Pressing { since }, true) if now - since >= settle => {
            *state = KeyState::Pressed { reported: true };
            Some(Edge::Pressed)
        }
        (KeyState::Pressed { reported }, false) => {
            *state = KeyState::Releasing {
                since: now,
                reported,
            };
            if settle.ticks() == 0 {
                *state = KeyState::Released;
                return reported.then_some(Edge::Released);
            }
            None
        }
        (KeyState::Releasing { reported, .. }, true) => {
            *state = KeyState::Pressed { reported };
            None
        }
        (KeyState::Releasing { since, reported }, false) if now - since >= settle => {
            *state = KeyState::Released;
            reported.then_some(Edge::Released)
        }
        _ => None,
    }
}
