//! Integration tests for the badge's host-testable core, driven through the
//! public API with the built-in catalog.

use badge::catalog::{
    BUILTIN, CHEST_SOUND_ID, ERROR_PATTERN, RAINBOW_PATTERN, SUCCESS_PATTERN, SUCCESS_SOUND_ID,
    ZONE_TONE_BASE,
};
use badge::config::{EVENT_QUEUE_CAPACITY, LOW_POWER_TIMEOUT_MS, TICK_PERIOD_MS};
use badge::settings::SETTINGS_RECORD_SIZE;
use badge::{
    AdapterFault, AudioDriver, BleCommand, BleLink, Command, Event, EventQueue, Frame, LedDriver,
    Opcode, Outputs, Settings, SongDescriptor, SongId, StateMachine, SubsystemId, SystemMode, Zone,
};

#[derive(Default)]
struct Leds(Vec<Frame>);

impl LedDriver for Leds {
    fn start_frame(&mut self, frame: Frame) -> Result<(), AdapterFault> {
        self.0.push(frame);
        Ok(())
    }
    fn stop(&mut self) -> Result<(), AdapterFault> {
        Ok(())
    }
}

#[derive(Default)]
struct Speaker(Vec<SongId>);

impl AudioDriver for Speaker {
    fn start_playback(&mut self, song: &SongDescriptor) -> Result<(), AdapterFault> {
        self.0.push(song.id);
        Ok(())
    }
    fn stop(&mut self) -> Result<(), AdapterFault> {
        Ok(())
    }
}

struct Radio;

impl BleLink for Radio {
    fn begin_handshake(&mut self) -> Result<(), AdapterFault> {
        Ok(())
    }
}

type Badge = StateMachine<'static, Leds, Speaker, Radio>;

fn badge() -> Badge {
    StateMachine::new(BUILTIN, Outputs::new(Leds::default(), Speaker::default(), Radio))
}

fn write(bytes: &[u8]) -> Event {
    Event::BleCommand(BleCommand::from_write(bytes).expect("valid write"))
}

/// Drain the queue, returning every command issued along the way.
fn run<const N: usize>(m: &mut Badge, queue: &EventQueue<N>) -> Vec<Command> {
    let mut commands = Vec::new();
    while !queue.is_empty() {
        commands.extend(m.step(queue).command);
    }
    commands
}

fn connect(m: &mut Badge, queue: &EventQueue<EVENT_QUEUE_CAPACITY>) {
    queue.push(write(&[Opcode::Connect as u8]));
    queue.push(Event::SubsystemDone(SubsystemId::Ble));
    run(m, queue);
    assert_eq!(m.mode(), SystemMode::Connected);
}

#[test]
fn phone_session_pattern_then_song() {
    let queue = EventQueue::<EVENT_QUEUE_CAPACITY>::new();
    let mut m = badge();
    connect(&mut m, &queue);

    queue.push(write(&[0x10, RAINBOW_PATTERN.0]));
    queue.push(Event::TimerTick(60));
    queue.push(Event::TimerTick(60));
    let commands = run(&mut m, &queue);
    assert_eq!(commands.len(), 3);
    assert_eq!(m.mode(), SystemMode::PlayingPattern);
    assert_eq!(m.context().index, 2);

    queue.push(write(&[0x12]));
    queue.push(write(&[0x11, CHEST_SOUND_ID.0]));
    let commands = run(&mut m, &queue);
    assert_eq!(
        commands,
        vec![Command::StopLed, Command::StartPlayback(CHEST_SOUND_ID)]
    );
    assert_eq!(m.mode(), SystemMode::PlayingSong);

    let chest = BUILTIN.song(CHEST_SOUND_ID).expect("chest sound");
    queue.push(Event::TimerTick(chest.total_duration_ms()));
    queue.push(Event::SubsystemDone(SubsystemId::Audio));
    run(&mut m, &queue);
    assert_eq!(m.mode(), SystemMode::Connected);
    assert!(m.context().is_clear());
}

#[test]
fn finished_song_report_racing_a_new_song_is_dropped() {
    let queue = EventQueue::<EVENT_QUEUE_CAPACITY>::new();
    let mut m = badge();
    connect(&mut m, &queue);

    let chest = BUILTIN.song(CHEST_SOUND_ID).expect("chest sound");
    queue.push(write(&[0x11, CHEST_SOUND_ID.0]));
    queue.push(Event::TimerTick(chest.total_duration_ms()));
    // Phone picks the next song before the player's report is handled.
    queue.push(write(&[0x11, SUCCESS_SOUND_ID.0]));
    queue.push(Event::SubsystemDone(SubsystemId::Audio));
    run(&mut m, &queue);

    assert_eq!(m.mode(), SystemMode::PlayingSong);
    assert_eq!(m.context().song_id(), Some(SUCCESS_SOUND_ID));
}

#[test]
fn resumed_pattern_comes_from_saved_settings() {
    let queue = EventQueue::<EVENT_QUEUE_CAPACITY>::new();
    let mut m = badge();
    connect(&mut m, &queue);
    queue.push(write(&[0x10, RAINBOW_PATTERN.0]));
    run(&mut m, &queue);
    let saved = m.take_settings_update().expect("pattern recorded");

    let mut buf = [0u8; SETTINGS_RECORD_SIZE];
    saved.serialize(&mut buf);
    let restored = Settings::deserialize(&buf).expect("record readable");

    let mut m = badge().with_settings(restored);
    connect(&mut m, &queue);
    queue.push(write(&[0x13]));
    run(&mut m, &queue);
    assert_eq!(m.mode(), SystemMode::PlayingPattern);
    assert_eq!(m.context().pattern_id(), Some(RAINBOW_PATTERN));
}

#[test]
fn non_looping_pattern_runs_out_on_ticks() {
    let queue = EventQueue::<EVENT_QUEUE_CAPACITY>::new();
    let mut m = badge();
    connect(&mut m, &queue);

    // Success: one 1000 ms frame.
    queue.push(write(&[0x10, SUCCESS_PATTERN.0]));
    let mut commands = run(&mut m, &queue);
    for _ in 0..(1000 / TICK_PERIOD_MS) {
        queue.push(Event::TimerTick(TICK_PERIOD_MS));
        commands.extend(run(&mut m, &queue));
    }
    assert_eq!(commands.len(), 2);
    assert_eq!(commands.last(), Some(&Command::StopLed));
    assert_eq!(m.mode(), SystemMode::Connected);
}

#[test]
fn error_pattern_blinks() {
    let queue = EventQueue::<EVENT_QUEUE_CAPACITY>::new();
    let mut m = badge();
    connect(&mut m, &queue);

    queue.push(write(&[0x10, ERROR_PATTERN.0]));
    queue.push(Event::TimerTick(150));
    run(&mut m, &queue);

    let frames = &m.outputs().led.0;
    assert_eq!(frames.len(), 2);
    assert_ne!(frames[0].lit_mask, 0);
    assert_eq!(frames[1].lit_mask, 0);
}

#[test]
fn touch_pads_play_their_tones() {
    let queue = EventQueue::<EVENT_QUEUE_CAPACITY>::new();
    let mut m = badge();
    connect(&mut m, &queue);

    for i in [0u8, 4, 8] {
        let zone = Zone::new(i).unwrap();
        queue.push(Event::TouchPress(zone));
        queue.push(Event::TouchRelease(zone));
    }
    run(&mut m, &queue);

    assert_eq!(
        m.outputs().audio.0,
        vec![
            SongId(ZONE_TONE_BASE),
            SongId(ZONE_TONE_BASE + 4),
            SongId(ZONE_TONE_BASE + 8)
        ]
    );
    assert_eq!(m.context().song_id(), Some(SongId(ZONE_TONE_BASE + 8)));
}

#[test]
fn unknown_song_sends_badge_to_error_until_backoff() {
    let queue = EventQueue::<EVENT_QUEUE_CAPACITY>::new();
    let mut m = badge();
    connect(&mut m, &queue);

    queue.push(write(&[0x11, 200]));
    let commands = run(&mut m, &queue);
    assert_eq!(commands, vec![Command::StopAll]);
    assert_eq!(m.mode(), SystemMode::Error);

    for _ in 0..150 {
        queue.push(Event::TimerTick(TICK_PERIOD_MS));
        run(&mut m, &queue);
    }
    assert_eq!(m.mode(), SystemMode::Idle);
}

#[test]
fn muted_badge_ignores_songs_and_reports_new_settings() {
    let queue = EventQueue::<EVENT_QUEUE_CAPACITY>::new();
    let mut m = badge();
    connect(&mut m, &queue);

    queue.push(write(&[0x20, 0]));
    queue.push(write(&[0x21, 10]));
    queue.push(write(&[0x11, SUCCESS_SOUND_ID.0]));
    run(&mut m, &queue);

    assert_eq!(m.mode(), SystemMode::Connected);
    assert!(m.outputs().audio.0.is_empty());
    assert_eq!(
        m.take_settings_update(),
        Some(Settings {
            sound_enabled: false,
            brightness: 10,
            pattern: None,
        })
    );
    assert_eq!(m.take_settings_update(), None);
}

#[test]
fn idle_badge_sleeps_and_wakes_on_touch() {
    let queue = EventQueue::<EVENT_QUEUE_CAPACITY>::new();
    let mut m = badge();

    queue.push(Event::TimerTick(LOW_POWER_TIMEOUT_MS));
    assert_eq!(run(&mut m, &queue), vec![Command::StopAll]);
    assert_eq!(m.mode(), SystemMode::LowPower);

    queue.push(Event::TouchPress(Zone::new(3).unwrap()));
    run(&mut m, &queue);
    assert_eq!(m.mode(), SystemMode::Idle);
}

#[test]
fn burst_beyond_capacity_is_dropped_not_blocked() {
    let queue = EventQueue::<EVENT_QUEUE_CAPACITY>::new();
    let accepted = (0..EVENT_QUEUE_CAPACITY + 8)
        .filter(|_| queue.push(Event::TimerTick(1)))
        .count();
    assert_eq!(accepted, EVENT_QUEUE_CAPACITY);
    assert_eq!(queue.dropped(), 8);

    let mut m = badge();
    run(&mut m, &queue);
    assert!(queue.is_empty());
}

#[test]
fn identical_inputs_give_identical_outputs() {
    let script = [
        write(&[0x01]),
        Event::SubsystemDone(SubsystemId::Ble),
        write(&[0x10, RAINBOW_PATTERN.0]),
        Event::TimerTick(130),
        Event::TouchPress(Zone::new(1).unwrap()),
        write(&[0x12]),
        Event::TouchPress(Zone::new(2).unwrap()),
        Event::TimerTick(40),
        write(&[0x02]),
    ];

    let replay = || {
        let queue = EventQueue::<EVENT_QUEUE_CAPACITY>::new();
        let mut m = badge();
        let mut trace = Vec::new();
        for event in script.iter().cloned() {
            queue.push(event);
            let report = m.step(&queue);
            trace.push((report.to, report.command));
        }
        trace
    };

    let first = replay();
    assert_eq!(first, replay());
    assert_eq!(first.last().map(|t| t.0), Some(SystemMode::Idle));
}
