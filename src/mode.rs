/// Index of the active mode. Starts at 0 and only moves forward, wrapping after the last of
/// `MODES`.
///
/// There must be at least one mode:
///
/// ```compile_fail
/// let modes = kubepad::mode::ModeState::<0>::new();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeState<const MODES: usize> {
    current: usize,
}

impl<const MODES: usize> ModeState<MODES> {
    const AT_LEAST_ONE: () = assert!(MODES > 0, "a keypad needs at least one mode");

    pub const fn new() -> Self {
        let () = Self::AT_LEAST_ONE;
        ModeState { current: 0 }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Moves to the next mode and returns its index
    pub fn advance(&mut self) -> usize {
        self.current = (self.current + 1) % MODES;
        self.current
    }
}

impl<const MODES: usize> Default for ModeState<MODES> {
    fn default() -> Self {
        Self::new()
    }
}
