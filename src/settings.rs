//! User settings adjustable over BLE and persisted to flash.
//!
//! Record layout: `[version][flags][brightness][pattern]`
//!   - version    - `SETTINGS_VERSION`; anything else is treated as absent
//!   - flags      - bit 0 = sound enabled, bit 1 = pattern byte valid
//!   - brightness - global LED level, 0..=255
//!   - pattern    - last pattern selected over BLE

use crate::pattern::PatternId;

/// Bumped whenever the record layout changes.
pub const SETTINGS_VERSION: u8 = 2;

/// Serialized size of a settings record.
pub const SETTINGS_RECORD_SIZE: usize = 4;

const FLAG_SOUND: u8 = 0x01;
const FLAG_PATTERN: u8 = 0x02;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    pub sound_enabled: bool,
    pub brightness: u8,
    /// Pattern to bring back with `ResumePattern`.
    pub pattern: Option<PatternId>,
}

impl Settings {
    pub const fn new() -> Self {
        Self {
            sound_enabled: true,
            brightness: 128,
            pattern: None,
        }
    }

    /// Serialize into `buf`. Returns bytes written, 0 if `buf` is too small.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < SETTINGS_RECORD_SIZE {
            return 0;
        }
        let mut flags = if self.sound_enabled { FLAG_SOUND } else { 0 };
        if self.pattern.is_some() {
            flags |= FLAG_PATTERN;
        }
        buf[0] = SETTINGS_VERSION;
        buf[1] = flags;
        buf[2] = self.brightness;
        buf[3] = self.pattern.map_or(0, |id| id.0);
        SETTINGS_RECORD_SIZE
    }

    /// Parse a stored record. Short records and foreign versions yield `None`.
    pub fn deserialize(data: &[u8]) -> Option<Self> {
        match data {
            [SETTINGS_VERSION, flags, brightness, pattern, ..] => Some(Self {
                sound_enabled: flags & FLAG_SOUND != 0,
                brightness: *brightness,
                pattern: (flags & FLAG_PATTERN != 0).then_some(PatternId(*pattern)),
            }),
            _ => None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}
