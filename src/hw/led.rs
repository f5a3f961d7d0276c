//! Status LED driver.
//!
//! Three discrete LEDs (red, green, blue; active-low) stand in for the
//! pattern renderer's colour output. LED `n` is on when bit `n` of the
//! frame mask is set and colour channel `n` is bright enough to show.

use badge::config::STATUS_LED_COUNT;
use badge::{AdapterFault, Frame, LedDriver};
use defmt::{trace, warn};
use embedded_hal::digital::OutputPin;

/// Channel level below which an LED stays dark.
const ON_THRESHOLD: u8 = 64;

pub struct StatusLeds<P> {
    pins: [P; STATUS_LED_COUNT as usize],
}

impl<P: OutputPin> StatusLeds<P> {
    /// `pins` in red, green, blue order. All LEDs start dark.
    pub fn new(pins: [P; STATUS_LED_COUNT as usize]) -> Self {
        let mut leds = Self { pins };
        if leds.show(0).is_err() {
            warn!("status LEDs did not switch off");
        }
        leds
    }

    fn show(&mut self, lit: u8) -> Result<(), AdapterFault> {
        for (n, pin) in self.pins.iter_mut().enumerate() {
            let res = if lit & (1 << n) != 0 {
                pin.set_low()
            } else {
                pin.set_high()
            };
            res.map_err(|_| AdapterFault)?;
        }
        Ok(())
    }
}

/// Collapse a frame into the set of LEDs that should be on.
fn lit_leds(frame: &Frame) -> u8 {
    let channels = [frame.color.r, frame.color.g, frame.color.b];
    channels
        .iter()
        .enumerate()
        .filter(|&(n, &level)| frame.lit_mask & (1 << n) != 0 && level >= ON_THRESHOLD)
        .fold(0, |acc, (n, _)| acc | (1 << n))
}

impl<P: OutputPin> LedDriver for StatusLeds<P> {
    fn start_frame(&mut self, frame: Frame) -> Result<(), AdapterFault> {
        let lit = lit_leds(&frame);
        trace!("LED frame {} -> {=u8:b}", frame.index, lit);
        self.show(lit)
    }

    fn stop(&mut self) -> Result<(), AdapterFault> {
        self.show(0)
    }
}
