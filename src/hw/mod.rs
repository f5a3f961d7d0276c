//! Hardware adapters for the badge board.
//!
//! Input side: touch pads, the BLE command characteristic and the tick
//! timer all [`post`] events into [`EVENTS`]. Output side: the status LEDs,
//! the piezo buzzer and the BLE link implement the driver traits the state
//! machine commands.

pub mod ble;
pub mod buzzer;
pub mod led;
pub mod storage;
pub mod touch;

use badge::config::EVENT_QUEUE_CAPACITY;
use badge::{Event, EventQueue};
use defmt::Format;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// The one structure shared between input tasks and the main loop.
pub static EVENTS: EventQueue<EVENT_QUEUE_CAPACITY> = EventQueue::new();

/// Raised whenever an event is queued so the main loop can sleep when idle.
pub static WAKE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Queue `event` for the state machine. Never waits; a full queue drops it.
pub fn post(event: Event) -> bool {
    let accepted = EVENTS.push(event);
    if accepted {
        WAKE.signal(());
    }
    accepted
}

/// Bring-up failures of the firmware adapters.
#[derive(Debug, Clone, Copy, Format)]
pub enum Error {
    /// GATT table registration with the SoftDevice failed.
    GattRegister,
    /// Connectable advertising could not start.
    Advertise,
    /// Flash read/write/erase failed.
    Storage,
}
