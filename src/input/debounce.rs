//! Count-based push button debouncer
//!
//! Each `update` samples the raw level and walks a counter toward pressed or
//! released. The stable state only flips when the counter saturates, so
//! contact bounce shorter than `threshold` samples is ignored.

use crate::hal::ButtonInput;

/// Default number of consistent samples before the state flips
pub const DEFAULT_THRESHOLD: u8 = 3;

pub struct Debouncer<P> {
    read_level: P,
    counter: u8,
    threshold: u8,
    stable_pressed: bool,
    rose: bool,
}

impl<P> Debouncer<P>
where
    P: FnMut() -> bool,
{
    /// `read_level` returns `true` while the button is physically held.
    /// A `threshold` of 0 is treated as 1.
    pub fn new(read_level: P, threshold: u8) -> Self {
        Self {
            read_level,
            counter: 0,
            threshold: threshold.max(1),
            stable_pressed: false,
            rose: false,
        }
    }

    /// Debounced level
    pub fn is_held(&self) -> bool {
        self.stable_pressed
    }
}

impl<P> ButtonInput for Debouncer<P>
where
    P: FnMut() -> bool,
{
    fn update(&mut self) {
        if (self.read_level)() {
            if self.counter < self.threshold {
                self.counter += 1;
            }
        } else if self.counter > 0 {
            self.counter -= 1;
        }

        self.rose = false;
        if !self.stable_pressed && self.counter == self.threshold {
            self.stable_pressed = true;
            self.rose = true;
        } else if self.stable_pressed && self.counter == 0 {
            self.stable_pressed = false;
        }
    }

    fn pressed(&self) -> bool {
        self.rose
    }
}
