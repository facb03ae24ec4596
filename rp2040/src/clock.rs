//! The RP2040 microsecond timer as the keypad's clock
use kubepad::{Clock, Instant};
use rp2040_hal::pac;

/// Reads the 64-bit timer without latching, retrying if the high word rolled over between
/// the two reads. The timer must have been taken out of reset (`hal::Timer::new`).
pub fn now() -> Instant {
    let timer = unsafe { &*pac::TIMER::ptr() };
    Instant::from_ticks(loop {
        let e = timer.timerawh.read().bits();
        let t = timer.timerawl.read().bits();
        let e2 = timer.timerawh.read().bits();
        if e == e2 {
            break ((e as u64) << 32) | (t as u64);
        }
    })
}

pub struct TimerClock;

impl Clock for TimerClock {
    fn now(&self) -> Instant {
        now()
    }
}
