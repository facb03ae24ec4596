//! Decodes a keyboard matrix

use embedded_hal::digital::v2::{InputPin, OutputPin};
use heapless::Vec;

/// Closed contacts, indexed `[row][col]`
pub type Grid<const ROWS: usize, const COLS: usize> = [[bool; COLS]; ROWS];

/// Position of a key in the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Coordinate {
    pub row: u8,
    pub col: u8,
}

impl Coordinate {
    pub const fn new(row: u8, col: u8) -> Self {
        Coordinate { row, col }
    }
}

/// Samples `rows` while driving one of `cols` at a time to `col_active`.
///
/// Every column is set inactive first, and each column is released again before the next
/// one is driven, so two columns are never active together.
pub fn decode<
    E,
    InputPinT: InputPin<Error = E>,
    OutputPinT: OutputPin<Error = E>,
    const ROWS: usize,
    const COLS: usize,
>(
    rows: &mut Vec<InputPinT, ROWS>,
    cols: &mut Vec<OutputPinT, COLS>,
    keys: &mut Grid<ROWS, COLS>,
    col_active: bool,
) -> Result<(), E> {
    for col in cols.iter_mut() {
        col.set_state((!col_active).into())?;
    }

    for (c, col) in cols.iter_mut().enumerate() {
        col.set_state(col_active.into())?;
        for (r, row) in rows.iter_mut().enumerate() {
            keys[r][c] = row.is_high()? == col_active;
        }
        col.set_state((!col_active).into())?;
    }
    Ok(())
}

/// Owns the matrix pins
pub struct Matrix<InputPinT, OutputPinT, const ROWS: usize, const COLS: usize> {
    rows: Vec<InputPinT, ROWS>,
    cols: Vec<OutputPinT, COLS>,
    col_active: bool,
}

impl<E, InputPinT, OutputPinT, const ROWS: usize, const COLS: usize>
    Matrix<InputPinT, OutputPinT, ROWS, COLS>
where
    InputPinT: InputPin<Error = E>,
    OutputPinT: OutputPin<Error = E>,
{
    /// Rows pulled down, columns driven high to select
    pub fn new(rows: Vec<InputPinT, ROWS>, cols: Vec<OutputPinT, COLS>) -> Self {
        Matrix {
            rows,
            cols,
            col_active: true,
        }
    }

    /// For boards wired with pull-up rows and active-low columns
    pub fn active_low(mut self) -> Self {
        self.col_active = false;
        self
    }

    pub fn scan(&mut self) -> Result<Grid<ROWS, COLS>, E> {
        let mut keys = [[false; COLS]; ROWS];
        decode(&mut self.rows, &mut self.cols, &mut keys, self.col_active)?;
        Ok(keys)
    }
}
