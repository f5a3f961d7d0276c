//! Piezo buzzer on PWM0.
//!
//! The state machine side (`Buzzer`) only hands requests to
//! `buzzer_task`, which owns the PWM peripheral and walks the notes with
//! `embassy_time`. A new request preempts whatever is playing. A song that
//! runs to the end posts `SubsystemDone(Audio)`; looping is the state
//! machine's business.

use super::post;
use badge::config::NOTE_ARTICULATION_MS;
use badge::{AdapterFault, AudioDriver, Event, Note, SongDescriptor, SubsystemId};
use defmt::{debug, info};
use embassy_futures::select::{select, Either};
use embassy_nrf::pwm::{Prescaler, SimplePwm};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};

/// PWM counter clock with `Prescaler::Div16`.
const PWM_CLOCK_HZ: u32 = 1_000_000;

#[derive(Clone, Copy)]
enum AudioRequest {
    Play(SongDescriptor),
    Stop,
}

static REQUESTS: Signal<CriticalSectionRawMutex, AudioRequest> = Signal::new();

/// `AudioDriver` handed to the state machine.
pub struct Buzzer;

impl AudioDriver for Buzzer {
    fn start_playback(&mut self, song: &SongDescriptor) -> Result<(), AdapterFault> {
        REQUESTS.signal(AudioRequest::Play(*song));
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AdapterFault> {
        REQUESTS.signal(AudioRequest::Stop);
        Ok(())
    }
}

struct Tone {
    pwm: SimplePwm<'static, embassy_nrf::peripherals::PWM0>,
}

impl Tone {
    fn new(mut pwm: SimplePwm<'static, embassy_nrf::peripherals::PWM0>) -> Self {
        pwm.set_prescaler(Prescaler::Div16);
        pwm.disable();
        Self { pwm }
    }

    fn on(&mut self, hz: u16) {
        let top = (PWM_CLOCK_HZ / u32::from(hz.max(16))).min(u32::from(u16::MAX)) as u16;
        self.pwm.set_max_duty(top);
        self.pwm.set_duty(0, top / 2);
        self.pwm.enable();
    }

    fn off(&mut self) {
        self.pwm.disable();
    }

    async fn note(&mut self, song: &SongDescriptor, note: &Note) {
        let total = song.note_duration_ms(note);
        let gap = if note.tie || note.is_rest() {
            0
        } else {
            NOTE_ARTICULATION_MS.min(total)
        };

        if note.is_rest() {
            self.off();
        } else {
            self.on(note.pitch_hz);
        }
        Timer::after(Duration::from_millis(u64::from(total - gap))).await;

        if gap > 0 {
            self.off();
            Timer::after(Duration::from_millis(u64::from(gap))).await;
        }
    }

    async fn play(&mut self, song: &SongDescriptor) {
        for note in song.notes {
            self.note(song, note).await;
        }
        self.off();
    }
}

pub async fn buzzer_task(pwm: SimplePwm<'static, embassy_nrf::peripherals::PWM0>) -> ! {
    let mut tone = Tone::new(pwm);
    let mut next = None;

    loop {
        let request = match next.take() {
            Some(request) => request,
            None => REQUESTS.wait().await,
        };

        let song = match request {
            AudioRequest::Play(song) => song,
            AudioRequest::Stop => {
                tone.off();
                continue;
            }
        };

        info!("Buzzer: {}", song.name);
        match select(tone.play(&song), REQUESTS.wait()).await {
            Either::First(()) => {
                post(Event::SubsystemDone(SubsystemId::Audio));
            }
            Either::Second(preempt) => {
                debug!("Buzzer: {} preempted", song.name);
                tone.off();
                next = Some(preempt);
            }
        }
    }
}
