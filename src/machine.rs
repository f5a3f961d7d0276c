//! The badge's central state machine.
//!
//! [`StateMachine::step`] pops at most one event, applies the transition
//! rules for the current [`SystemMode`] and issues at most one output
//! command. It never blocks and never fails: lookup misses and adapter
//! faults are resolved here by moving to `Error`, stopping the outputs, and
//! recording the error in the returned [`StepReport`].
//!
//! Transition rules, first match wins, everything else is ignored:
//!
//! ```text
//! any             Disconnect            -> Idle            StopAll
//! Idle|LowPower   Connect               -> Connecting      BeginHandshake
//! Connecting      Done(Ble)             -> Connected
//! Connecting      Tick past handshake   -> Error           StopAll
//! Connected|PPat  SetPattern(id)        -> PlayingPattern  StartFrame
//! Connected|PPat  ResumePattern         -> PlayingPattern  StartFrame if one is remembered
//! Connected|PSong PlaySong(id)|Touch(z) -> PlayingSong     StartPlayback
//! PPat|PSong      Stop                  -> Connected       StopLed|StopAudio
//! PPat            Tick                  -> PPat|Connected  StartFrame|StopLed
//! PPat            Done(Led)             -> Connected
//! PSong           Tick                  -> PSong           (note index only)
//! PSong           Tick past end + grace -> PSong|Connected StartPlayback|StopAudio
//! PSong           Done(Audio) near end  -> PSong|Connected StartPlayback if looping
//! Idle            Tick past timeout     -> LowPower        StopAll
//! LowPower        Touch(z)              -> Idle
//! Error           Tick past backoff     -> Idle
//! ```

use crate::config::{
    ERROR_BACKOFF_MS, HANDSHAKE_TIMEOUT_MS, LOW_POWER_TIMEOUT_MS, SONG_COMPLETION_GRACE_MS,
};
use crate::error::{BadgeError, DescriptorId};
use crate::event::{BleRequest, Event, EventKind, SubsystemId, Zone};
use crate::output::{AudioDriver, BleLink, Command, LedDriver, Outputs};
use crate::pattern::{PatternDescriptor, PatternId};
use crate::queue::EventQueue;
use crate::registry::{Descriptor, Registry};
use crate::settings::Settings;
use crate::song::{SongDescriptor, SongId};

/// The single current high-level operating state of the badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SystemMode {
    Idle,
    Connecting,
    Connected,
    PlayingPattern,
    PlayingSong,
    LowPower,
    Error,
}

/// What is currently rendered or played. Cleared on every mode change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActiveRenderContext<'r> {
    pub target: Option<Descriptor<'r>>,
    /// Current frame (patterns) or note (songs).
    pub index: u16,
    /// Time since the episode started, folded per loop for patterns.
    pub elapsed_ms: u32,
    pub looping: bool,
}

impl<'r> ActiveRenderContext<'r> {
    fn start(target: Descriptor<'r>, looping: bool) -> Self {
        Self {
            target: Some(target),
            index: 0,
            elapsed_ms: 0,
            looping,
        }
    }

    pub fn is_clear(&self) -> bool {
        *self == Self::default()
    }

    pub fn pattern_id(&self) -> Option<PatternId> {
        match self.target {
            Some(Descriptor::Pattern(p)) => Some(p.id),
            _ => None,
        }
    }

    pub fn song_id(&self) -> Option<SongId> {
        match self.target {
            Some(Descriptor::Song(s)) => Some(s.id),
            _ => None,
        }
    }
}

/// Outcome of one `step()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepReport {
    /// Kind of event consumed, `None` if the queue was empty.
    pub event: Option<EventKind>,
    pub from: SystemMode,
    pub to: SystemMode,
    pub command: Option<Command>,
    /// Error resolved during this step.
    pub error: Option<BadgeError>,
}

impl StepReport {
    fn quiet(mode: SystemMode) -> Self {
        Self {
            event: None,
            from: mode,
            to: mode,
            command: None,
            error: None,
        }
    }

    pub fn mode_changed(&self) -> bool {
        self.from != self.to
    }
}

type Outcome = Result<Option<Command>, BadgeError>;

pub struct StateMachine<'r, L, A, B> {
    mode: SystemMode,
    ctx: ActiveRenderContext<'r>,
    /// Time accumulated from ticks since the last mode change.
    mode_elapsed_ms: u32,
    registry: Registry<'r>,
    outputs: Outputs<L, A, B>,
    settings: Settings,
    settings_dirty: bool,
    last_error: Option<BadgeError>,
}

impl<'r, L: LedDriver, A: AudioDriver, B: BleLink> StateMachine<'r, L, A, B> {
    /// New machine in `Idle` with default settings.
    pub fn new(registry: Registry<'r>, outputs: Outputs<L, A, B>) -> Self {
        Self {
            mode: SystemMode::Idle,
            ctx: ActiveRenderContext::default(),
            mode_elapsed_ms: 0,
            registry,
            outputs,
            settings: Settings::new(),
            settings_dirty: false,
            last_error: None,
        }
    }

    /// Start from previously persisted settings.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn mode(&self) -> SystemMode {
        self.mode
    }

    pub fn context(&self) -> &ActiveRenderContext<'r> {
        &self.ctx
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn last_error(&self) -> Option<BadgeError> {
        self.last_error
    }

    pub fn outputs(&self) -> &Outputs<L, A, B> {
        &self.outputs
    }

    pub fn outputs_mut(&mut self) -> &mut Outputs<L, A, B> {
        &mut self.outputs
    }

    /// Settings changed over BLE since the last call, if any.
    pub fn take_settings_update(&mut self) -> Option<Settings> {
        if core::mem::take(&mut self.settings_dirty) {
            Some(self.settings)
        } else {
            None
        }
    }

    /// Consume at most one event from `queue` and act on it.
    pub fn step<const N: usize>(&mut self, queue: &EventQueue<N>) -> StepReport {
        match queue.pop() {
            Some(event) => self.dispatch(event),
            None => StepReport::quiet(self.mode),
        }
    }

    /// Apply one event directly, bypassing the queue.
    pub fn dispatch(&mut self, event: Event) -> StepReport {
        let from = self.mode;
        let kind = event.kind();
        trace!("{:?} in {:?}", kind, from);

        let (command, error) = match self.transition(event) {
            Ok(command) => (command, None),
            Err(e) => self.resolve(e),
        };

        StepReport {
            event: Some(kind),
            from,
            to: self.mode,
            command,
            error,
        }
    }

    fn transition(&mut self, event: Event) -> Outcome {
        match event {
            Event::BleCommand(cmd) => {
                let request = cmd.decode()?;
                self.on_request(request)
            }
            Event::TouchPress(zone) => self.on_touch(zone),
            Event::TouchRelease(_) => Ok(None),
            Event::TimerTick(ms) => self.on_tick(ms),
            Event::SubsystemDone(subsystem) => self.on_done(subsystem),
        }
    }

    fn on_request(&mut self, request: BleRequest) -> Outcome {
        use SystemMode::*;

        match (self.mode, request) {
            (_, BleRequest::Disconnect) => {
                let cmd = self.outputs.stop_all()?;
                self.enter(Idle);
                Ok(Some(cmd))
            }
            (Idle | LowPower, BleRequest::Connect) => {
                let cmd = self.outputs.begin_handshake()?;
                self.enter(Connecting);
                Ok(Some(cmd))
            }
            (Connected | PlayingPattern, BleRequest::SetPattern(id)) => self.start_pattern(id),
            (Connected | PlayingPattern, BleRequest::ResumePattern) => {
                match self.settings.pattern {
                    Some(id) => self.start_pattern(id),
                    None => {
                        debug!("no remembered pattern");
                        Ok(None)
                    }
                }
            }
            (Connected | PlayingSong, BleRequest::PlaySong(id)) => {
                self.start_song(DescriptorId::Song(id))
            }
            (PlayingPattern, BleRequest::Stop) => {
                let cmd = self.outputs.stop_led()?;
                self.enter(Connected);
                Ok(Some(cmd))
            }
            (PlayingSong, BleRequest::Stop) => {
                let cmd = self.outputs.stop_audio()?;
                self.enter(Connected);
                Ok(Some(cmd))
            }
            (mode, BleRequest::SetSound(enabled)) => {
                self.update_settings(Settings {
                    sound_enabled: enabled,
                    ..self.settings
                });
                if !enabled && mode == PlayingSong {
                    let cmd = self.outputs.stop_audio()?;
                    self.enter(Connected);
                    return Ok(Some(cmd));
                }
                Ok(None)
            }
            (_, BleRequest::SetBrightness(level)) => {
                self.update_settings(Settings {
                    brightness: level,
                    ..self.settings
                });
                Ok(None)
            }
            (mode, request) => {
                debug!("{:?} ignored in {:?}", request, mode);
                Ok(None)
            }
        }
    }

    fn on_touch(&mut self, zone: Zone) -> Outcome {
        match self.mode {
            SystemMode::Connected | SystemMode::PlayingSong => {
                self.start_song(DescriptorId::ZoneSong(zone))
            }
            SystemMode::Idle => {
                self.mode_elapsed_ms = 0;
                Ok(None)
            }
            SystemMode::LowPower => {
                self.enter(SystemMode::Idle);
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn on_tick(&mut self, elapsed_ms: u32) -> Outcome {
        self.mode_elapsed_ms = self.mode_elapsed_ms.saturating_add(elapsed_ms);

        match self.mode {
            SystemMode::Connecting if self.mode_elapsed_ms >= HANDSHAKE_TIMEOUT_MS => {
                warn!("BLE handshake timed out");
                Err(BadgeError::AdapterFailure(SubsystemId::Ble))
            }
            SystemMode::Idle if self.mode_elapsed_ms >= LOW_POWER_TIMEOUT_MS => {
                let cmd = self.outputs.stop_all()?;
                self.enter(SystemMode::LowPower);
                Ok(Some(cmd))
            }
            SystemMode::Error if self.mode_elapsed_ms >= ERROR_BACKOFF_MS => {
                self.enter(SystemMode::Idle);
                Ok(None)
            }
            SystemMode::PlayingPattern => self.advance_pattern(elapsed_ms),
            SystemMode::PlayingSong => self.advance_song(elapsed_ms),
            _ => Ok(None),
        }
    }

    fn on_done(&mut self, subsystem: SubsystemId) -> Outcome {
        match (self.mode, subsystem) {
            (SystemMode::Connecting, SubsystemId::Ble) => {
                self.enter(SystemMode::Connected);
                Ok(None)
            }
            (SystemMode::PlayingPattern, SubsystemId::Led) => {
                self.enter(SystemMode::Connected);
                Ok(None)
            }
            (SystemMode::PlayingSong, SubsystemId::Audio) => {
                let Some(Descriptor::Song(song)) = self.ctx.target else {
                    self.enter(SystemMode::Connected);
                    return Ok(None);
                };
                let early = self.ctx.elapsed_ms.saturating_add(SONG_COMPLETION_GRACE_MS);
                if early < song.total_duration_ms() {
                    debug!("stale audio completion at {} ms of {}", self.ctx.elapsed_ms, song.name);
                    return Ok(None);
                }
                self.finish_song(song, false)
            }
            _ => Ok(None),
        }
    }

    fn start_pattern(&mut self, id: PatternId) -> Outcome {
        let pattern: &'r PatternDescriptor = self
            .registry
            .pattern(id)
            .ok_or(BadgeError::UnknownDescriptorId(DescriptorId::Pattern(id)))?;

        let cmd = self
            .outputs
            .start_frame(pattern.frame(0, self.settings.brightness))?;
        self.enter(SystemMode::PlayingPattern);
        self.ctx = ActiveRenderContext::start(Descriptor::Pattern(pattern), pattern.looping);
        self.update_settings(Settings {
            pattern: Some(id),
            ..self.settings
        });
        info!("pattern {} ({})", pattern.id.0, pattern.name);
        Ok(Some(cmd))
    }

    fn start_song(&mut self, id: DescriptorId) -> Outcome {
        if !self.settings.sound_enabled {
            debug!("sound disabled - {:?} ignored", id);
            return Ok(None);
        }

        let song: &'r SongDescriptor = match self.registry.lookup(id) {
            Some(Descriptor::Song(song)) => song,
            _ => return Err(BadgeError::UnknownDescriptorId(id)),
        };

        let cmd = self.outputs.start_playback(song)?;
        self.enter(SystemMode::PlayingSong);
        self.ctx = ActiveRenderContext::start(Descriptor::Song(song), song.looping);
        info!("song {} ({})", song.id.0, song.name);
        Ok(Some(cmd))
    }

    fn advance_pattern(&mut self, elapsed_ms: u32) -> Outcome {
        let Some(Descriptor::Pattern(pattern)) = self.ctx.target else {
            return Ok(None);
        };

        let period = pattern.frame_period_ms.max(1);
        let count = u32::from(pattern.frame_count.max(1));
        let before = self.ctx.elapsed_ms / period;
        self.ctx.elapsed_ms = self.ctx.elapsed_ms.saturating_add(elapsed_ms);
        let now = self.ctx.elapsed_ms / period;

        if now == before {
            return Ok(None);
        }

        if now >= count {
            if !self.ctx.looping {
                let cmd = self.outputs.stop_led()?;
                self.enter(SystemMode::Connected);
                return Ok(Some(cmd));
            }
            self.ctx.elapsed_ms %= count * period;
        }

        let index = (now % count) as u16;
        self.ctx.index = index;
        let cmd = self
            .outputs
            .start_frame(pattern.frame(index, self.settings.brightness))?;
        Ok(Some(cmd))
    }

    fn advance_song(&mut self, elapsed_ms: u32) -> Outcome {
        let Some(Descriptor::Song(song)) = self.ctx.target else {
            return Ok(None);
        };

        self.ctx.elapsed_ms = self.ctx.elapsed_ms.saturating_add(elapsed_ms);
        // Past the end the index parks on `notes.len()` until the player
        // reports completion.
        let index = song
            .note_index_at(self.ctx.elapsed_ms)
            .unwrap_or(song.notes.len());
        self.ctx.index = index as u16;

        let overdue_at = song.total_duration_ms().saturating_add(SONG_COMPLETION_GRACE_MS);
        if self.ctx.elapsed_ms >= overdue_at {
            warn!("no completion for {} - ending it", song.name);
            return self.finish_song(song, true);
        }
        Ok(None)
    }

    /// End of one pass through `song`. Looping songs start over. `overdue`
    /// means the player never reported, so it is told to stop.
    fn finish_song(&mut self, song: &'r SongDescriptor, overdue: bool) -> Outcome {
        if self.ctx.looping {
            let cmd = self.outputs.start_playback(song)?;
            self.ctx = ActiveRenderContext::start(Descriptor::Song(song), true);
            return Ok(Some(cmd));
        }

        let cmd = if overdue {
            Some(self.outputs.stop_audio()?)
        } else {
            None
        };
        self.enter(SystemMode::Connected);
        Ok(cmd)
    }

    fn update_settings(&mut self, settings: Settings) {
        if settings != self.settings {
            info!("settings {:?}", settings);
            self.settings = settings;
            self.settings_dirty = true;
        }
    }

    /// Record `error`. Errors that force `Error` stop every output first.
    fn resolve(&mut self, error: BadgeError) -> (Option<Command>, Option<BadgeError>) {
        self.last_error = Some(error);

        if !error.forces_error_mode() {
            warn!("{:?} - event ignored", error);
            return (None, Some(error));
        }

        error!("{:?} in {:?} - stopping outputs", error, self.mode);
        let command = match self.outputs.stop_all() {
            Ok(cmd) => Some(cmd),
            Err(e) => {
                error!("stop failed: {:?}", e);
                None
            }
        };
        self.enter(SystemMode::Error);
        (command, Some(error))
    }

    fn enter(&mut self, next: SystemMode) {
        if next == self.mode {
            return;
        }
        info!("mode {:?} -> {:?}", self.mode, next);
        self.mode = next;
        self.mode_elapsed_ms = 0;
        self.ctx = ActiveRenderContext::default();
    }
}
