//! Application-wide constants and compile-time configuration.
//!
//! Queue sizing, timing parameters, and board pin assignments live here
//! so they can be tuned in one place.

// Event path

/// Slots in the input → state machine event queue.
pub const EVENT_QUEUE_CAPACITY: usize = 32;

/// Largest BLE command payload (bytes after the opcode).
/// One ATT write at the default 23-byte MTU minus the opcode and ATT header.
pub const BLE_PAYLOAD_CAPACITY: usize = 19;

/// Number of capacitive touch pads on the badge.
pub const TOUCH_ZONE_COUNT: u8 = 9;

// Timing

/// Period of the `TimerTick` event (ms). 20 ms = 50 Hz.
pub const TICK_PERIOD_MS: u32 = 20;

/// Time spent in `Error` before falling back to `Idle` (ms).
pub const ERROR_BACKOFF_MS: u32 = 3_000;

/// Time allowed for the BLE link to come up after `Connect` (ms).
pub const HANDSHAKE_TIMEOUT_MS: u32 = 10_000;

/// Untouched time in `Idle` before entering `LowPower` (ms).
pub const LOW_POWER_TIMEOUT_MS: u32 = 300_000;

/// Slack between the song timeline and the player's completion report (ms).
/// A report earlier than this before the end belongs to a replaced song; no
/// report this long after the end means it was lost.
pub const SONG_COMPLETION_GRACE_MS: u32 = 12 * TICK_PERIOD_MS;

// BLE

/// GAP device name shown to phones.
pub const BLE_DEVICE_NAME: &str = "Badge";

/// Advertising interval (in 0.625 ms units). 400 = 250 ms.
pub const BLE_ADV_INTERVAL: u32 = 400;

// GPIO pin assignments (badge rev B)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your board.
//
//   Touch pads 0..8  → P0.02 P0.03 P0.04 P0.05 P0.28 P0.29 P0.30 P0.31 P1.15
//   Status LEDs R/G/B → P0.13 P0.14 P0.15
//   Buzzer (PWM0)    → P0.16

/// Number of discrete status LEDs driven by the pattern renderer.
pub const STATUS_LED_COUNT: u8 = 3;

/// Touch pad debounce time (ms).
pub const TOUCH_DEBOUNCE_MS: u64 = 30;

/// Gap inserted between untied notes so repeated pitches re-articulate (ms).
pub const NOTE_ARTICULATION_MS: u32 = 10;

// Settings storage

/// Flash page index where the settings store starts (4 KB per page on nRF52840).
pub const STORAGE_FLASH_PAGE_START: u32 = 248;

/// Number of flash pages reserved for the settings store.
pub const STORAGE_FLASH_PAGE_COUNT: u32 = 4;
