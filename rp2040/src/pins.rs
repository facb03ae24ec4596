use rp_pico as bsp;

use bsp::hal::gpio::{DynPinId, FunctionSioInput, FunctionSioOutput, Pin, PullDown};
use bsp::Pins;
use heapless::Vec;

use crate::oled::{SclPin, SdaPin};

pub type RowPin = Pin<DynPinId, FunctionSioInput, PullDown>;
pub type ColPin = Pin<DynPinId, FunctionSioOutput, PullDown>;

/// Rows GP10-GP13 as pulled-down inputs, columns GP14-GP16 as push-pull outputs, and the
/// display's I2C0 on GP4 (SDA) and GP5 (SCL)
pub fn pins<const ROWS: usize, const COLS: usize>(
    pins: Pins,
    rows: &mut Vec<RowPin, ROWS>,
    cols: &mut Vec<ColPin, COLS>,
) -> (SdaPin, SclPin) {
    rows.extend([
        pins.gpio10.into_pull_down_input().into_dyn_pin(),
        pins.gpio11.into_pull_down_input().into_dyn_pin(),
        pins.gpio12.into_pull_down_input().into_dyn_pin(),
        pins.gpio13.into_pull_down_input().into_dyn_pin(),
    ]);

    cols.extend([
        pins.gpio14.into_push_pull_output().into_dyn_pin(),
        pins.gpio15.into_push_pull_output().into_dyn_pin(),
        pins.gpio16.into_push_pull_output().into_dyn_pin(),
    ]);

    (pins.gpio4.reconfigure(), pins.gpio5.reconfigure())
}
