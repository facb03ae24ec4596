//! [`RenderSurface`] on top of `embedded-graphics`

use embedded_graphics::mono_font::{ascii::FONT_6X10, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

use crate::screen::RenderSurface;

/// Displays that draw into a buffer and show it on `flush`, such as the SSD1306 in
/// buffered graphics mode
pub trait Flush {
    type Error;
    fn flush(&mut self) -> Result<(), Self::Error>;
}

pub struct TextDisplay<D> {
    target: D,
}

impl<D> TextDisplay<D>
where
    D: DrawTarget<Color = BinaryColor> + Flush,
{
    pub fn new(target: D) -> Self {
        TextDisplay { target }
    }

    pub fn target(&mut self) -> &mut D {
        &mut self.target
    }
}

impl<D> RenderSurface for TextDisplay<D>
where
    D: DrawTarget<Color = BinaryColor> + Flush,
{
    fn clear(&mut self) {
        if self.target.clear(BinaryColor::Off).is_err() {
            warn!("display clear failed");
        }
    }

    fn draw_text(&mut self, at: Point, text: &str, color: BinaryColor) {
        let style = MonoTextStyle::new(&FONT_6X10, color);
        if Text::with_baseline(text, at, style, Baseline::Top)
            .draw(&mut self.target)
            .is_err()
        {
            warn!("display draw failed");
        }
    }

    fn flush(&mut self) {
        if self.target.flush().is_err() {
            warn!("display flush failed");
        }
    }
}
