//! Fake hardware for tests: a scripted key matrix, a clock moved by delays, and
//! collaborators that record what they were asked to do.

extern crate std;

use core::cell::{Cell, RefCell};
use core::convert::Infallible;
use std::rc::Rc;
use std::string::String;
use std::vec::Vec;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::Point;
use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::{InputPin, OutputPin};

use crate::hid::HidSink;
use crate::matrix::Coordinate;
use crate::screen::RenderSurface;
use crate::{Clock, Instant};

/// Time in microseconds, shared by every clone. Delays move it forward.
#[derive(Clone, Default)]
pub struct FakeTime {
    micros: Rc<Cell<u64>>,
    delays: Rc<RefCell<Vec<u32>>>,
}

impl FakeTime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.micros.get() / 1000
    }

    pub fn delays(&self) -> Vec<u32> {
        self.delays.borrow().clone()
    }
}

impl Clock for FakeTime {
    fn now(&self) -> Instant {
        Instant::from_ticks(self.micros.get())
    }
}

impl DelayMs<u32> for FakeTime {
    fn delay_ms(&mut self, ms: u32) {
        self.micros.set(self.micros.get() + ms as u64 * 1000);
        self.delays.borrow_mut().push(ms);
    }
}

const MAX_COLS: usize = 8;

struct BoardState {
    time: FakeTime,
    held: Vec<(Coordinate, u64, u64)>,
    col_levels: [bool; MAX_COLS],
    active_low: bool,
    max_active: usize,
}

impl BoardState {
    fn col_active_level(&self) -> bool {
        !self.active_low
    }

    fn active_cols(&self) -> usize {
        let active = self.col_active_level();
        self.col_levels.iter().filter(|level| **level == active).count()
    }

    fn closed(&self, at: Coordinate) -> bool {
        let now = self.time.now_ms();
        self.held
            .iter()
            .any(|&(key, from, to)| key == at && from <= now && now < to)
    }
}

/// Key matrix whose contacts close on a schedule
#[derive(Clone)]
pub struct Board(Rc<RefCell<BoardState>>);

impl Board {
    pub fn new(time: FakeTime) -> Self {
        Board(Rc::new(RefCell::new(BoardState {
            time,
            held: Vec::new(),
            col_levels: [false; MAX_COLS],
            active_low: false,
            max_active: 0,
        })))
    }

    /// Pull-up rows, columns selected by driving them low
    pub fn active_low(self) -> Self {
        {
            let mut state = self.0.borrow_mut();
            state.active_low = true;
            state.col_levels = [true; MAX_COLS];
        }
        self
    }

    pub fn pins<const ROWS: usize, const COLS: usize>(
        &self,
    ) -> (heapless::Vec<MockRow, ROWS>, heapless::Vec<MockCol, COLS>) {
        let rows = (0..ROWS as u8)
            .map(|row| MockRow {
                board: self.clone(),
                row,
            })
            .collect();
        let cols = (0..COLS as u8)
            .map(|col| MockCol {
                board: self.clone(),
                col,
            })
            .collect();
        (rows, cols)
    }

    /// Closes `at` from now on
    pub fn hold(&self, at: Coordinate) {
        self.0.borrow_mut().held.push((at, 0, u64::MAX));
    }

    pub fn hold_from(&self, at: Coordinate, from_ms: u64) {
        self.0.borrow_mut().held.push((at, from_ms, u64::MAX));
    }

    /// Closes `at` from `from_ms` until just before `to_ms`
    pub fn press_between(&self, at: Coordinate, from_ms: u64, to_ms: u64) {
        self.0.borrow_mut().held.push((at, from_ms, to_ms));
    }

    pub fn active_cols(&self) -> usize {
        self.0.borrow().active_cols()
    }

    /// Most columns that were ever driven at the same time
    pub fn max_active_cols(&self) -> usize {
        self.0.borrow().max_active
    }
}

pub struct MockRow {
    board: Board,
    row: u8,
}

impl InputPin for MockRow {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Infallible> {
        let state = self.board.0.borrow();
        let active = state.col_active_level();
        let closed = (0..MAX_COLS as u8).any(|col| {
            state.col_levels[col as usize] == active
                && state.closed(Coordinate::new(self.row, col))
        });
        Ok(if closed { active } else { !active })
    }

    fn is_low(&self) -> Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}

pub struct MockCol {
    board: Board,
    col: u8,
}

impl MockCol {
    fn set(&mut self, level: bool) {
        let mut state = self.board.0.borrow_mut();
        state.col_levels[self.col as usize] = level;
        state.max_active = state.max_active.max(state.active_cols());
    }
}

impl OutputPin for MockCol {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.set(true);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HidRequest {
    Char(char),
    Enter,
}

#[derive(Default)]
pub struct RecordingHid {
    pub requests: Vec<HidRequest>,
}

impl RecordingHid {
    /// Characters typed, without the Enters
    pub fn typed(&self) -> String {
        self.requests
            .iter()
            .filter_map(|request| match request {
                HidRequest::Char(ch) => Some(*ch),
                HidRequest::Enter => None,
            })
            .collect()
    }

    pub fn enters(&self) -> usize {
        self.requests
            .iter()
            .filter(|request| **request == HidRequest::Enter)
            .count()
    }
}

impl HidSink for RecordingHid {
    fn type_char(&mut self, ch: char) {
        self.requests.push(HidRequest::Char(ch));
    }

    fn enter(&mut self) {
        self.requests.push(HidRequest::Enter);
    }
}

#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub texts: Vec<(Point, String, BinaryColor)>,
}

impl Frame {
    pub fn lines(&self) -> Vec<String> {
        self.texts.iter().map(|(_, text, _)| text.clone()).collect()
    }
}

/// Keeps every flushed frame
#[derive(Default)]
pub struct RecordingSurface {
    pub frames: Vec<Frame>,
    pub clears: usize,
    drawing: Frame,
}

impl RenderSurface for RecordingSurface {
    fn clear(&mut self) {
        self.clears += 1;
        self.drawing = Frame::default();
    }

    fn draw_text(&mut self, at: Point, text: &str, color: BinaryColor) {
        self.drawing.texts.push((at, String::from(text), color));
    }

    fn flush(&mut self) {
        self.frames.push(core::mem::take(&mut self.drawing));
    }
}
