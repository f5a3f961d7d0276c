//! Orchestration core of the badge firmware.
//!
//! Input adapters (touch pads, BLE writes, the tick timer) push [`Event`]s
//! into a bounded [`EventQueue`]. The main loop calls
//! [`StateMachine::step`], which consumes one event, decides the next
//! [`SystemMode`] and commands the LED and audio adapters through the
//! traits in [`output`].
//!
//! Everything here is `no_std` and free of hardware dependencies so it can
//! be tested on the host:
//!
//! Usage: `cargo test --lib` (unit) or `cargo test` (unit + integration)
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main]
//! and is only built with `--features embedded`.

#![cfg_attr(not(test), no_std)]

// Must come first so the log macros are visible to every module below.
#[macro_use]
mod fmt;

pub mod catalog;
pub mod config;
pub mod error;
pub mod event;
pub mod machine;
pub mod output;
pub mod pattern;
pub mod queue;
pub mod registry;
pub mod settings;
pub mod song;

pub use error::{AdapterFault, BadgeError, DescriptorId};
pub use event::{BleCommand, BleRequest, Event, EventKind, Opcode, SubsystemId, Zone};
pub use machine::{ActiveRenderContext, StateMachine, StepReport, SystemMode};
pub use output::{AudioDriver, BleLink, Command, LedDriver, Outputs};
pub use pattern::{Frame, PatternDescriptor, PatternId, PatternKind, Rgb};
pub use queue::EventQueue;
pub use registry::{Descriptor, Registry};
pub use settings::Settings;
pub use song::{Note, NoteValue, SongDescriptor, SongId};

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests - state machine transitions
// ═══════════════════════════════════════════════════════════════════════════
