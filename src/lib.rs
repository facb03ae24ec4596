//! Core of the Kubepad macro-keypad: a button matrix whose keys type shell commands into
//! the host, with the command set selected by a cycling "mode".
//!
//! Data flows one way each tick: [`matrix`] samples the contacts, [`debounce`] turns the
//! samples into stable [`debounce::KeyEvent`]s, [`keymap`] resolves presses to
//! [`keymap::Action`]s and [`dispatch`] types them through a [`hid::HidSink`] and shows
//! them on a [`screen::RenderSurface`]. [`app`] runs the loop.

#![no_std]

#[macro_use]
mod fmt;

pub mod app;
pub mod config;
pub mod debounce;
pub mod dispatch;
pub mod display;
pub mod hid;
pub mod keymap;
pub mod matrix;
pub mod mode;
pub mod screen;

#[cfg(test)]
mod mock;

/// Microsecond timestamps, the resolution of the RP2040 timer
pub type Instant = fugit::Instant<u64, 1, 1_000_000>;
pub type Duration = fugit::Duration<u64, 1, 1_000_000>;

/// Source of the current time for the debouncer and the release-wait.
pub trait Clock {
    fn now(&self) -> Instant;
}
