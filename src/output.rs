//! Output adapter contracts.
//!
//! Drivers are stateless command sinks: they get told what to show or play
//! and report back (asynchronously) through `SubsystemDone` events. They
//! make no decisions of their own.

use crate::error::{AdapterFault, BadgeError};
use crate::event::SubsystemId;
use crate::pattern::Frame;
use crate::song::{SongDescriptor, SongId};

/// LED renderer. Reports `SubsystemDone(Led)` if it finishes a
/// non-looping pattern on its own.
pub trait LedDriver {
    fn start_frame(&mut self, frame: Frame) -> Result<(), AdapterFault>;
    fn stop(&mut self) -> Result<(), AdapterFault>;
}

/// Audio player. Reports `SubsystemDone(Audio)` when playback completes.
pub trait AudioDriver {
    fn start_playback(&mut self, song: &SongDescriptor) -> Result<(), AdapterFault>;
    fn stop(&mut self) -> Result<(), AdapterFault>;
}

/// BLE link. Reports `SubsystemDone(Ble)` once the link is usable.
pub trait BleLink {
    fn begin_handshake(&mut self) -> Result<(), AdapterFault>;
}

/// Side effect issued by one `step()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    BeginHandshake,
    StartFrame(Frame),
    StopLed,
    StartPlayback(SongId),
    StopAudio,
    StopAll,
}

/// The three output adapters, owned by the state machine.
pub struct Outputs<L, A, B> {
    pub led: L,
    pub audio: A,
    pub ble: B,
}

impl<L: LedDriver, A: AudioDriver, B: BleLink> Outputs<L, A, B> {
    pub fn new(led: L, audio: A, ble: B) -> Self {
        Self { led, audio, ble }
    }

    pub fn begin_handshake(&mut self) -> Result<Command, BadgeError> {
        self.ble.begin_handshake().map_err(fault(SubsystemId::Ble))?;
        Ok(Command::BeginHandshake)
    }

    pub fn start_frame(&mut self, frame: Frame) -> Result<Command, BadgeError> {
        self.led.start_frame(frame).map_err(fault(SubsystemId::Led))?;
        Ok(Command::StartFrame(frame))
    }

    pub fn stop_led(&mut self) -> Result<Command, BadgeError> {
        self.led.stop().map_err(fault(SubsystemId::Led))?;
        Ok(Command::StopLed)
    }

    pub fn start_playback(&mut self, song: &SongDescriptor) -> Result<Command, BadgeError> {
        self.audio
            .start_playback(song)
            .map_err(fault(SubsystemId::Audio))?;
        Ok(Command::StartPlayback(song.id))
    }

    pub fn stop_audio(&mut self) -> Result<Command, BadgeError> {
        self.audio.stop().map_err(fault(SubsystemId::Audio))?;
        Ok(Command::StopAudio)
    }

    /// Stop both outputs. Both are always attempted; the first fault wins.
    pub fn stop_all(&mut self) -> Result<Command, BadgeError> {
        let led = self.led.stop().map_err(fault(SubsystemId::Led));
        let audio = self.audio.stop().map_err(fault(SubsystemId::Audio));
        led.and(audio)?;
        Ok(Command::StopAll)
    }
}

fn fault(subsystem: SubsystemId) -> impl Fn(AdapterFault) -> BadgeError {
    move |_| BadgeError::AdapterFailure(subsystem)
}
