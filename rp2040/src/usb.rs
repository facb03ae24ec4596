//! USB keyboard transport. Everything runs on the scan loop, so the device is polled from
//! every wait: report writes spin on it until the endpoint is free, and delays service it
//! until their deadline.

use core::cell::RefCell;

use embedded_hal::blocking::delay::DelayMs;
use rp2040_hal::usb::UsbBus as Rp2040Usb;
use usb_device::class_prelude::*;
use usb_device::prelude::*;
use usbd_human_interface_device::device::keyboard::{NKROBootKeyboard, NKROBootKeyboardConfig};
use usbd_human_interface_device::prelude::*;

use kubepad::hid::{Keyboard, ReportWriter};
use kubepad::{Duration, Instant};

use crate::clock::now;

type KeyboardDev<'a> = frunk::HCons<NKROBootKeyboard<'a, Rp2040Usb>, frunk::HNil>;

/// Longest a report waits for the host to take the previous one
const REPORT_TIMEOUT: Duration = Duration::millis(100);

pub struct UsbKeyboard<'a> {
    device: UsbDevice<'a, Rp2040Usb>,
    keyboard: UsbHidClass<'a, Rp2040Usb, KeyboardDev<'a>>,
    last_tick: Instant,
}

impl<'a> UsbKeyboard<'a> {
    pub fn new(usb_alloc: &'a UsbBusAllocator<Rp2040Usb>) -> Self {
        let keyboard = UsbHidClassBuilder::new()
            .add_device(NKROBootKeyboardConfig::default())
            .build(usb_alloc);

        // https://pid.codes
        let device = UsbDeviceBuilder::new(usb_alloc, UsbVidPid(0x1209, 0x0001))
            .manufacturer("Kubepad")
            .product("Kubepad macro keypad")
            .serial_number("KP0001")
            .build();

        UsbKeyboard {
            device,
            keyboard,
            last_tick: now(),
        }
    }

    /// Polls the bus, and ticks the HID class once a millisecond
    pub fn service(&mut self) {
        if self.device.poll(&mut [&mut self.keyboard]) {
            match self.keyboard.device().read_report() {
                Err(UsbError::WouldBlock) => {}
                Err(e) => defmt::warn!(
                    "Failed to read keyboard report: {}",
                    defmt::Debug2Format(&e)
                ),
                Ok(_leds) => {}
            }
        }

        let time = now();
        if time - self.last_tick >= Duration::millis(1) {
            self.last_tick = time;
            match self.keyboard.tick() {
                Err(UsbHidError::WouldBlock) => {}
                Ok(_) => {}
                Err(e) => defmt::warn!(
                    "Failed to process keyboard tick: {}",
                    defmt::Debug2Format(&e)
                ),
            }
        }
    }

    fn write(&mut self, keys: &[Keyboard]) -> Result<(), UsbHidError> {
        let deadline = now() + REPORT_TIMEOUT;
        loop {
            match self
                .keyboard
                .device()
                .write_report(keys.iter().copied())
            {
                Ok(_) | Err(UsbHidError::Duplicate) => return Ok(()),
                Err(UsbHidError::WouldBlock) if now() < deadline => self.service(),
                Err(e) => return Err(e),
            }
        }
    }

    fn delay(&mut self, ms: u32) {
        let deadline = now() + Duration::millis(ms as u64);
        while now() < deadline {
            self.service();
        }
    }
}

/// Report transport for [`kubepad::hid::ReportTypist`]
pub struct Reports<'r, 'a>(pub &'r RefCell<UsbKeyboard<'a>>);

impl ReportWriter for Reports<'_, '_> {
    type Error = UsbHidError;

    fn write_report(&mut self, keys: &[Keyboard]) -> Result<(), UsbHidError> {
        self.0.borrow_mut().write(keys)
    }
}

/// Delay that keeps the USB device serviced
pub struct UsbDelay<'r, 'a>(pub &'r RefCell<UsbKeyboard<'a>>);

impl DelayMs<u32> for UsbDelay<'_, '_> {
    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().delay(ms);
    }
}
