#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_probe as _;

use core::cell::RefCell;

mod clock;
mod oled;
mod pins;
mod usb;

use clock::{now, TimerClock};
use oled::Oled;
use usb::{Reports, UsbDelay, UsbKeyboard};

use rp_pico as bsp;

use bsp::entry;
use bsp::{hal, hal::pac};
use hal::fugit::RateExtU32;
use hal::sio::Sio;
use hal::Clock;

use usb_device::class_prelude::*;

use heapless::Vec;

use kubepad::app::App;
use kubepad::config::Timings;
use kubepad::display::TextDisplay;
use kubepad::hid::ReportTypist;
use kubepad::keymap::{COLS, KUBEPAD, ROWS};
use kubepad::matrix::Matrix;

defmt::timestamp!("{=u64:us}", now().ticks());

const TIMINGS: Timings = Timings::DEFAULT;
const _: () = assert!(TIMINGS.validate().is_ok(), "invalid timings");

#[entry]
fn core0() -> ! {
    let mut pac = pac::Peripherals::take().unwrap();

    // Set up the watchdog driver - needed by the clock setup code
    let mut watchdog = hal::watchdog::Watchdog::new(pac.WATCHDOG);
    // Configure the clocks
    let clocks = hal::clocks::init_clocks_and_plls(
        bsp::XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    // Takes the timer out of reset for `clock::now`
    let _timer = hal::Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);

    let sio = Sio::new(pac.SIO);
    let pins = bsp::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    let mut rows = Vec::<_, ROWS>::new();
    let mut cols = Vec::<_, COLS>::new();
    let (sda, scl) = pins::pins(pins, &mut rows, &mut cols);
    let matrix = Matrix::new(rows, cols);

    let i2c = hal::I2C::i2c0(
        pac.I2C0,
        sda,
        scl,
        400.kHz(),
        &mut pac.RESETS,
        clocks.system_clock.freq(),
    );
    let display = TextDisplay::new(Oled::new(i2c));
    defmt::info!("display up");

    // USB
    let usb_alloc = UsbBusAllocator::new(hal::usb::UsbBus::new(
        pac.USBCTRL_REGS,
        pac.USBCTRL_DPRAM,
        clocks.usb_clock,
        true,
        &mut pac.RESETS,
    ));
    let usb = RefCell::new(UsbKeyboard::new(&usb_alloc));

    let mut app = App::new(
        matrix,
        &KUBEPAD,
        ReportTypist::new(Reports(&usb)),
        display,
        TimerClock,
        UsbDelay(&usb),
        TIMINGS,
    );

    match app.run() {
        Ok(never) => match never {},
        Err(never) => match never {},
    }
}
