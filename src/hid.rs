//! Typing characters as USB keyboard reports

use heapless::Vec;
pub use usbd_human_interface_device::page::Keyboard;

/// Receives the text a command types. Requests are delivered in call order; whether they
/// reach the host is up to the transport.
pub trait HidSink {
    fn type_char(&mut self, ch: char);
    fn enter(&mut self);
}

/// Transport for whole keyboard reports, listing the keys held down
pub trait ReportWriter {
    type Error;
    fn write_report(&mut self, keys: &[Keyboard]) -> Result<(), Self::Error>;
}

/// A key plus whether it needs shift, on a US layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStroke {
    pub key: Keyboard,
    pub shift: bool,
}

impl KeyStroke {
    const fn plain(key: Keyboard) -> Self {
        KeyStroke { key, shift: false }
    }

    const fn shifted(key: Keyboard) -> Self {
        KeyStroke { key, shift: true }
    }
}

/// The keystroke producing `ch`, or `None` if it cannot be typed
pub fn stroke(ch: char) -> Option<KeyStroke> {
    use Keyboard::*;

    let stroke = match ch {
        'a'..='z' => KeyStroke::plain(Keyboard::from(u8::from(A) + (ch as u8 - b'a'))),
        'A'..='Z' => KeyStroke::shifted(Keyboard::from(u8::from(A) + (ch as u8 - b'A'))),
        '1'..='9' => KeyStroke::plain(Keyboard::from(u8::from(Keyboard1) + (ch as u8 - b'1'))),
        '0' => KeyStroke::plain(Keyboard0),
        ' ' => KeyStroke::plain(Space),
        '\n' => KeyStroke::plain(ReturnEnter),
        '\t' => KeyStroke::plain(Tab),
        '-' => KeyStroke::plain(Minus),
        '=' => KeyStroke::plain(Equal),
        '[' => KeyStroke::plain(LeftBrace),
        ']' => KeyStroke::plain(RightBrace),
        '\\' => KeyStroke::plain(Backslash),
        ';' => KeyStroke::plain(Semicolon),
        '\'' => KeyStroke::plain(Apostrophe),
        '`' => KeyStroke::plain(Grave),
        ',' => KeyStroke::plain(Comma),
        '.' => KeyStroke::plain(Dot),
        '/' => KeyStroke::plain(ForwardSlash),
        '!' => KeyStroke::shifted(Keyboard1),
        '@' => KeyStroke::shifted(Keyboard2),
        '#' => KeyStroke::shifted(Keyboard3),
        '$' => KeyStroke::shifted(Keyboard4),
        '%' => KeyStroke::shifted(Keyboard5),
        '^' => KeyStroke::shifted(Keyboard6),
        '&' => KeyStroke::shifted(Keyboard7),
        '*' => KeyStroke::shifted(Keyboard8),
        '(' => KeyStroke::shifted(Keyboard9),
        ')' => KeyStroke::shifted(Keyboard0),
        '_' => KeyStroke::shifted(Minus),
        '+' => KeyStroke::shifted(Equal),
        '{' => KeyStroke::shifted(LeftBrace),
        '}' => KeyStroke::shifted(RightBrace),
        '|' => KeyStroke::shifted(Backslash),
        ':' => KeyStroke::shifted(Semicolon),
        '"' => KeyStroke::shifted(Apostrophe),
        '~' => KeyStroke::shifted(Grave),
        '<' => KeyStroke::shifted(Comma),
        '>' => KeyStroke::shifted(Dot),
        '?' => KeyStroke::shifted(ForwardSlash),
        _ => return None,
    };
    Some(stroke)
}

/// [`HidSink`] sending one key-down report and one all-released report per character
pub struct ReportTypist<W> {
    writer: W,
}

impl<W: ReportWriter> ReportTypist<W> {
    pub fn new(writer: W) -> Self {
        ReportTypist { writer }
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.writer
    }

    fn tap(&mut self, stroke: KeyStroke) {
        let mut down: Vec<Keyboard, 2> = Vec::new();
        if stroke.shift {
            down.push(Keyboard::LeftShift).ok();
        }
        down.push(stroke.key).ok();

        if self.writer.write_report(&down).is_err() {
            warn!("key-down report dropped");
        }
        if self.writer.write_report(&[]).is_err() {
            warn!("key-up report dropped");
        }
    }
}

impl<W: ReportWriter> HidSink for ReportTypist<W> {
    fn type_char(&mut self, ch: char) {
        match stroke(ch) {
            Some(stroke) => self.tap(stroke),
            None => warn!("no key types {=u32:#x}", ch as u32),
        }
    }

    fn enter(&mut self) {
        self.tap(KeyStroke::plain(Keyboard::ReturnEnter));
    }
}
