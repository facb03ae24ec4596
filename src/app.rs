//! The scan loop

use core::convert::Infallible;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::{InputPin, OutputPin};
use heapless::Vec;

use crate::config::Timings;
use crate::debounce::{Debouncer, Edge, KeyEvent};
use crate::dispatch::{Dispatched, Dispatcher};
use crate::hid::HidSink;
use crate::keymap::Keymap;
use crate::matrix::{Coordinate, Matrix};
use crate::mode::ModeState;
use crate::screen::{RenderSurface, Screen};
use crate::{Clock, Duration};

/// Most key changes handled from a single scan
pub const EVENTS: usize = 16;

pub struct App<'k, I, O, H, S, C, D, const MODES: usize, const ROWS: usize, const COLS: usize>
{
    matrix: Matrix<I, O, ROWS, COLS>,
    debouncer: Debouncer<ROWS, COLS>,
    keymap: &'k Keymap<MODES, ROWS, COLS>,
    modes: ModeState<MODES>,
    dispatcher: Dispatcher<H, S>,
    clock: C,
    delay: D,
    timings: Timings,
}

impl<'k, E, I, O, H, S, C, D, const MODES: usize, const ROWS: usize, const COLS: usize>
    App<'k, I, O, H, S, C, D, MODES, ROWS, COLS>
where
    I: InputPin<Error = E>,
    O: OutputPin<Error = E>,
    H: HidSink,
    S: RenderSurface,
    C: Clock,
    D: DelayMs<u32>,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        matrix: Matrix<I, O, ROWS, COLS>,
        keymap: &'k Keymap<MODES, ROWS, COLS>,
        hid: H,
        surface: S,
        clock: C,
        delay: D,
        timings: Timings,
    ) -> Self {
        App {
            matrix,
            debouncer: Debouncer::new(timings.settle).with_rearm(timings.rearm),
            keymap,
            modes: ModeState::new(),
            dispatcher: Dispatcher::new(hid, surface),
            clock,
            delay,
            timings,
        }
    }

    pub fn modes(&self) -> &ModeState<MODES> {
        &self.modes
    }

    pub fn dispatcher(&mut self) -> &mut Dispatcher<H, S> {
        &mut self.dispatcher
    }

    /// Shows the splash screen for the startup hold
    pub fn start(&mut self) {
        info!("starting in mode {=str}", self.keymap.mode(0).name);
        self.dispatcher.show(Screen::Splash {
            mode: self.keymap.mode(self.modes.current()).name,
        });
        self.pause(self.timings.startup_hold);
    }

    /// One scan. Every press found is dispatched, shown for its hold time and then waited on
    /// until released, before the next is looked at.
    pub fn tick(&mut self) -> Result<(), E> {
        let mut events: Vec<KeyEvent, EVENTS> = Vec::new();
        self.sample(&mut events)?;

        for event in events.iter().filter(|event| event.edge == Edge::Pressed) {
            self.press(event.at)?;
        }

        self.pause(self.timings.scan_interval);
        Ok(())
    }

    pub fn run(&mut self) -> Result<Infallible, E> {
        self.start();
        loop {
            self.tick()?;
        }
    }

    fn press(&mut self, at: Coordinate) -> Result<(), E> {
        let hold = match self
            .dispatcher
            .press(self.keymap, &mut self.modes, at)
        {
            Dispatched::Typed => self.timings.key_hold,
            Dispatched::ModeSwitched { .. } => self.timings.mode_switch_hold,
            Dispatched::Unmapped => self.timings.unmapped_hold,
        };
        self.pause(hold);
        self.await_release(at)
    }

    /// Keeps scanning, without dispatching, until `at` is released or the release timeout
    /// passes
    fn await_release(&mut self, at: Coordinate) -> Result<(), E> {
        let start = self.clock.now();
        let mut events: Vec<KeyEvent, EVENTS> = Vec::new();
        loop {
            events.clear();
            self.sample(&mut events)?;
            if !self.debouncer.is_down(at) {
                return Ok(());
            }
            if let Some(timeout) = self.timings.release_timeout {
                if self.clock.now() - start >= timeout {
                    warn!("gave up waiting for {} to be released", at);
                    return Ok(());
                }
            }
            self.pause(self.timings.scan_interval);
        }
    }

    fn sample(&mut self, events: &mut Vec<KeyEvent, EVENTS>) -> Result<(), E> {
        let presses = self.matrix.scan()?;
        self.debouncer.debounce(&presses, self.clock.now(), events);
        Ok(())
    }

    fn pause(&mut self, duration: Duration) {
        let ms = u32::try_from(duration.to_millis()).unwrap_or(u32::MAX);
        self.delay.delay_ms(ms);
    }
}
