//! Events produced by the input adapters and consumed by the state machine.
//!
//! An [`Event`] is immutable once enqueued. BLE writes keep their raw
//! opcode and payload until the state machine decodes them, so a malformed
//! command is diagnosed in one place ([`BleCommand::decode`]).

use crate::config::{BLE_PAYLOAD_CAPACITY, TOUCH_ZONE_COUNT};
use crate::error::BadgeError;
use crate::pattern::PatternId;
use crate::song::SongId;
use heapless::Vec;

/// Physical touch region, `0..TOUCH_ZONE_COUNT`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Zone(u8);

impl Zone {
    /// Returns `None` for pads the board does not have.
    pub const fn new(index: u8) -> Option<Self> {
        if index < TOUCH_ZONE_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Output or link subsystem that can report completion or failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SubsystemId {
    Ble,
    Led,
    Audio,
}

/// Command opcodes carried in byte 0 of a BLE write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Opcode {
    Connect = 0x01,
    Disconnect = 0x02,
    SetPattern = 0x10,
    PlaySong = 0x11,
    Stop = 0x12,
    ResumePattern = 0x13,
    SetSound = 0x20,
    SetBrightness = 0x21,
}

impl TryFrom<u8> for Opcode {
    type Error = BadgeError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Ok(match raw {
            0x01 => Opcode::Connect,
            0x02 => Opcode::Disconnect,
            0x10 => Opcode::SetPattern,
            0x11 => Opcode::PlaySong,
            0x12 => Opcode::Stop,
            0x13 => Opcode::ResumePattern,
            0x20 => Opcode::SetSound,
            0x21 => Opcode::SetBrightness,
            _ => return Err(BadgeError::MalformedBleCommand { opcode: raw }),
        })
    }
}

/// A decoded BLE command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BleRequest {
    Connect,
    Disconnect,
    SetPattern(PatternId),
    PlaySong(SongId),
    Stop,
    /// Restart the pattern remembered in the settings.
    ResumePattern,
    SetSound(bool),
    SetBrightness(u8),
}

/// Raw BLE command as received from the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BleCommand {
    pub opcode: u8,
    pub payload: Vec<u8, BLE_PAYLOAD_CAPACITY>,
}

impl BleCommand {
    /// Copy `payload` into a command. Fails if it exceeds the payload capacity.
    pub fn new(opcode: u8, payload: &[u8]) -> Result<Self, BadgeError> {
        let payload =
            Vec::from_slice(payload).map_err(|_| BadgeError::MalformedBleCommand { opcode })?;
        Ok(Self { opcode, payload })
    }

    /// Split a characteristic write (`[opcode, payload...]`) into a command.
    pub fn from_write(data: &[u8]) -> Result<Self, BadgeError> {
        match data.split_first() {
            Some((&opcode, payload)) => Self::new(opcode, payload),
            None => Err(BadgeError::MalformedBleCommand { opcode: 0 }),
        }
    }

    /// Interpret opcode and payload. Trailing payload bytes are ignored.
    pub fn decode(&self) -> Result<BleRequest, BadgeError> {
        let opcode = Opcode::try_from(self.opcode)?;
        let arg = || {
            self.payload
                .first()
                .copied()
                .ok_or(BadgeError::MalformedBleCommand {
                    opcode: self.opcode,
                })
        };

        Ok(match opcode {
            Opcode::Connect => BleRequest::Connect,
            Opcode::Disconnect => BleRequest::Disconnect,
            Opcode::SetPattern => BleRequest::SetPattern(PatternId(arg()?)),
            Opcode::PlaySong => BleRequest::PlaySong(SongId(arg()?)),
            Opcode::Stop => BleRequest::Stop,
            Opcode::ResumePattern => BleRequest::ResumePattern,
            Opcode::SetSound => BleRequest::SetSound(arg()? != 0),
            Opcode::SetBrightness => BleRequest::SetBrightness(arg()?),
        })
    }
}

/// Everything that can happen to the badge.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    TouchPress(Zone),
    TouchRelease(Zone),
    BleCommand(BleCommand),
    /// Milliseconds elapsed since the previous tick.
    TimerTick(u32),
    SubsystemDone(SubsystemId),
}

/// Payload-free discriminant of an [`Event`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventKind {
    TouchPress,
    TouchRelease,
    BleCommand,
    TimerTick,
    SubsystemDone,
}

impl Event {
    /// Shorthand for a BLE command event.
    pub fn ble(opcode: Opcode, payload: &[u8]) -> Result<Self, BadgeError> {
        BleCommand::new(opcode as u8, payload).map(Event::BleCommand)
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Event::TouchPress(_) => EventKind::TouchPress,
            Event::TouchRelease(_) => EventKind::TouchRelease,
            Event::BleCommand(_) => EventKind::BleCommand,
            Event::TimerTick(_) => EventKind::TimerTick,
            Event::SubsystemDone(_) => EventKind::SubsystemDone,
        }
    }
}
