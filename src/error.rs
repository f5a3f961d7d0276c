//! Error taxonomy for the badge core.
//!
//! We avoid `alloc` - all variants carry only small `Copy` data so an error
//! can be stored on the state machine and echoed in a `StepReport`.

use crate::event::{SubsystemId, Zone};
use crate::pattern::PatternId;
use crate::song::SongId;

/// Identifier handed to the registry when a lookup failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DescriptorId {
    Pattern(PatternId),
    Song(SongId),
    /// Default song bound to a touch zone.
    ZoneSong(Zone),
}

/// Every condition `step()` resolves locally. None of them is fatal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BadgeError {
    /// Event queue full - the event was dropped, no state change.
    QueueOverflow,

    /// Pattern or song id not in the registry. Forces `Error`.
    UnknownDescriptorId(DescriptorId),

    /// An output adapter (or the BLE link) reported a fault. Forces `Error`.
    AdapterFailure(SubsystemId),

    /// BLE write with an unknown opcode or a missing payload byte.
    /// The event is ignored.
    MalformedBleCommand { opcode: u8 },

    /// Registry failed validation (duplicate ids, empty descriptors).
    InvalidRegistry,
}

impl BadgeError {
    /// True for errors that move the state machine into `Error`.
    pub fn forces_error_mode(&self) -> bool {
        matches!(
            self,
            BadgeError::UnknownDescriptorId(_) | BadgeError::AdapterFailure(_)
        )
    }
}

/// Fault reported by an output driver. The state machine attaches the
/// subsystem before recording it as [`BadgeError::AdapterFailure`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdapterFault;
