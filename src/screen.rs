//! What is shown on the status display

use core::fmt::Write;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::Point;
use heapless::String;

use crate::matrix::Coordinate;

/// Longest line drawn, enough for a 128 pixel wide display with a 6 pixel font
pub const LINE: usize = 32;

/// Something text can be drawn on. Nothing is visible until [`flush`](Self::flush).
pub trait RenderSurface {
    fn clear(&mut self);
    fn draw_text(&mut self, at: Point, text: &str, color: BinaryColor);
    fn flush(&mut self);
}

const FIRST: Point = Point::new(0, 12);
const SECOND: Point = Point::new(0, 36);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen<'a> {
    Splash { mode: &'a str },
    Command { label: &'a str, mode: &'a str, pending: bool },
    ModeChanged { mode: &'a str },
    Unmapped { at: Coordinate },
}

impl Screen<'_> {
    /// One clear, one or two lines of text, one flush
    pub fn render<S: RenderSurface>(&self, surface: &mut S) {
        surface.clear();
        match *self {
            Screen::Splash { mode } => {
                surface.draw_text(FIRST, "Kubepad Active!", BinaryColor::On);
                surface.draw_text(SECOND, &angled(mode), BinaryColor::On);
            }
            Screen::Command {
                label,
                mode,
                pending,
            } => {
                surface.draw_text(FIRST, &bracketed(label, pending), BinaryColor::On);
                surface.draw_text(SECOND, &angled(mode), BinaryColor::On);
            }
            Screen::ModeChanged { mode } => {
                surface.draw_text(FIRST, "Mode", BinaryColor::On);
                surface.draw_text(SECOND, &angled(mode), BinaryColor::On);
            }
            Screen::Unmapped { at } => {
                let mut line: String<LINE> = String::new();
                write!(line, "row {} col {}", at.row, at.col).ok();
                surface.draw_text(FIRST, "Not Mapped", BinaryColor::On);
                surface.draw_text(SECOND, &line, BinaryColor::On);
            }
        }
        surface.flush();
    }
}

/// `[label]`, followed by an ellipsis while the command waits for more input
fn bracketed(label: &str, pending: bool) -> String<LINE> {
    enclosed('[', label, ']', if pending { " ..." } else { "" })
}

fn angled(mode: &str) -> String<LINE> {
    enclosed('<', mode, '>', "")
}

/// `open`, `text`, `close` and `suffix`. Text past the line length is cut off, keeping the
/// closing mark and the suffix.
fn enclosed(open: char, text: &str, close: char, suffix: &str) -> String<LINE> {
    let room = LINE - open.len_utf8() - close.len_utf8() - suffix.len();
    let mut line = String::new();
    line.push(open).ok();
    let mut used = 0;
    for ch in text.chars() {
        used += ch.len_utf8();
        if used > room {
            trace!("line cut off at {} bytes", room);
            break;
        }
        line.push(ch).ok();
    }
    line.push(close).ok();
    line.push_str(suffix).ok();
    line
}
