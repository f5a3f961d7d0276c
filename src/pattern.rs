//! LED pattern descriptors and per-frame rendering.
//!
//! The state machine only tracks which frame is current; [`PatternDescriptor::frame`]
//! turns that index into a colour and an LED mask for the driver.

use crate::config::STATUS_LED_COUNT;

/// Registry key for a pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PatternId(pub u8);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const OFF: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale every channel by `level / 255`.
    pub fn scale(self, level: u8) -> Self {
        let f = |c: u8| ((c as u16 * level as u16) / 255) as u8;
        Self::new(f(self.r), f(self.g), f(self.b))
    }

    /// Colour wheel: 0 = red, 85 = green, 170 = blue.
    pub fn wheel(pos: u8) -> Self {
        let pos = 255 - pos;
        match pos {
            0..=84 => Self::new(255 - pos * 3, 0, pos * 3),
            85..=169 => {
                let p = pos - 85;
                Self::new(0, p * 3, 255 - p * 3)
            }
            _ => {
                let p = pos - 170;
                Self::new(p * 3, 255 - p * 3, 0)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PatternKind {
    /// Constant colour on all LEDs.
    Solid,
    /// On for even frames, off for odd frames.
    Blink,
    /// Triangle-wave fade up and down over the pattern length.
    Pulse,
    /// One LED lit at a time, walking across the strip.
    Chase,
    /// Hue rotates once over the pattern length. Ignores `color`.
    Rainbow,
}

/// Immutable, statically registered LED pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PatternDescriptor {
    pub id: PatternId,
    pub name: &'static str,
    pub kind: PatternKind,
    pub color: Rgb,
    pub frame_count: u16,
    pub frame_period_ms: u32,
    pub looping: bool,
}

/// One rendered frame handed to the LED driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    pub pattern: PatternId,
    pub index: u16,
    pub color: Rgb,
    /// Bit `n` set = status LED `n` lit.
    pub lit_mask: u8,
}

const ALL_LEDS: u8 = (1 << STATUS_LED_COUNT) - 1;

impl PatternDescriptor {
    /// Duration of one pass through every frame.
    pub fn duration_ms(&self) -> u32 {
        self.frame_count as u32 * self.frame_period_ms
    }

    /// Render frame `index` at global `brightness`.
    pub fn frame(&self, index: u16, brightness: u8) -> Frame {
        let count = self.frame_count.max(1) as u32;
        let i = index as u32 % count;

        let (color, lit_mask) = match self.kind {
            PatternKind::Solid => (self.color, ALL_LEDS),
            PatternKind::Blink => {
                if i % 2 == 0 {
                    (self.color, ALL_LEDS)
                } else {
                    (Rgb::OFF, 0)
                }
            }
            PatternKind::Pulse => {
                // 0 → 255 over the first half, back to 0 over the second.
                let phase = i * 510 / count;
                let level = if phase > 255 { 510 - phase } else { phase };
                (self.color.scale(level as u8), ALL_LEDS)
            }
            PatternKind::Chase => (self.color, 1 << (i % STATUS_LED_COUNT as u32)),
            PatternKind::Rainbow => (Rgb::wheel((i * 256 / count) as u8), ALL_LEDS),
        };

        Frame {
            pattern: self.id,
            index,
            color: color.scale(brightness),
            lit_mask,
        }
    }
}
