//! 128x64 SSD1306 on I2C0
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use rp_pico::hal::gpio::bank0::{Gpio4, Gpio5};
use rp_pico::hal::gpio::{FunctionI2C, Pin, PullUp};
use rp_pico::hal::{pac, I2C};
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};

use kubepad::display::Flush;

pub type SdaPin = Pin<Gpio4, FunctionI2C, PullUp>;
pub type SclPin = Pin<Gpio5, FunctionI2C, PullUp>;

type Driver = Ssd1306<
    I2CInterface<I2C<pac::I2C0, (SdaPin, SclPin)>>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;

/// Buffered display; drawing only touches the buffer until [`Flush::flush`]
pub struct Oled(Driver);

impl Oled {
    /// At the default 0x3C address
    pub fn new(i2c: I2C<pac::I2C0, (SdaPin, SclPin)>) -> Self {
        let mut display = Ssd1306::new(
            I2CDisplayInterface::new(i2c),
            DisplaySize128x64,
            DisplayRotation::Rotate0,
        )
        .into_buffered_graphics_mode();
        display.init().unwrap();
        Oled(display)
    }
}

impl OriginDimensions for Oled {
    fn size(&self) -> Size {
        OriginDimensions::size(&self.0)
    }
}

impl DrawTarget for Oled {
    type Color = BinaryColor;
    type Error = <Driver as DrawTarget>::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<BinaryColor>>,
    {
        self.0.draw_iter(pixels)
    }

    fn clear(&mut self, color: BinaryColor) -> Result<(), Self::Error> {
        DrawTarget::clear(&mut self.0, color)
    }
}

impl Flush for Oled {
    type Error = <Driver as DrawTarget>::Error;

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.0.flush()
    }
}
