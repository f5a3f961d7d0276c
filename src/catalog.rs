//! Built-in descriptor catalog flashed with the firmware.
//!
//! Song ids:
//!   0..=5   melodies
//!   10..=12 short status jingles
//!   20..=28 one-note synth tones bound to touch zones 0..=8
//!
//! Pattern ids 0..=4 cover the BLE status animations plus a showcase.

use crate::config::TOUCH_ZONE_COUNT;
use crate::pattern::{PatternDescriptor, PatternId, PatternKind, Rgb};
use crate::registry::Registry;
use crate::song::pitch::*;
use crate::song::NoteValue::*;
use crate::song::{Note, SongDescriptor, SongId};

pub const EPONAS_SONG_ID: SongId = SongId(0);
pub const SONG_OF_STORMS_ID: SongId = SongId(1);
pub const ZELDAS_LULLABY_ID: SongId = SongId(2);
pub const SARIAS_SONG_ID: SongId = SongId(3);
pub const SONG_OF_TIME_ID: SongId = SongId(4);
pub const SUNS_SONG_ID: SongId = SongId(5);
pub const SUCCESS_SOUND_ID: SongId = SongId(10);
pub const SECRET_SOUND_ID: SongId = SongId(11);
pub const CHEST_SOUND_ID: SongId = SongId(12);
/// First zone tone; zone `n` plays `SongId(ZONE_TONE_BASE + n)`.
pub const ZONE_TONE_BASE: u8 = 20;

pub const BLE_ENABLE_PATTERN: PatternId = PatternId(0);
pub const BLE_TRANSFER_PATTERN: PatternId = PatternId(1);
pub const RAINBOW_PATTERN: PatternId = PatternId(2);
pub const ERROR_PATTERN: PatternId = PatternId(3);
pub const SUCCESS_PATTERN: PatternId = PatternId(4);

// Epona's Song
static EPONAS_SONG: [Note; 42] = [
    Note::new(D4, Eighth),
    Note::new(B3, Eighth),
    Note::tied(A3, Half),
    Note::new(A3, Sixteenth),
    Note::new(D4, Eighth),
    Note::new(B3, Eighth),
    Note::tied(A3, Half),
    Note::new(A3, Sixteenth),
    Note::new(D4, Eighth),
    Note::new(B3, Eighth),
    Note::tied(A3, Quarter),
    Note::new(B3, Quarter),
    Note::tied(A3, Half),
    Note::new(A3, Sixteenth),
    Note::rest(Quarter),
    Note::new(FS3, Quarter),
    Note::new(F3, Quarter),
    Note::new(FS3, Quarter),
    Note::new(CS4, Eighth),
    Note::new(D4, Eighth),
    Note::tied(B3, Half),
    Note::new(B3, Sixteenth),
    Note::new(D4, Half),
    Note::new(D4, Quarter),
    Note::new(CS4, Eighth),
    Note::new(B3, Eighth),
    Note::tied(A3, Half),
    Note::new(A3, Sixteenth),
    Note::new(D4, Eighth),
    Note::new(B3, Eighth),
    Note::tied(A3, Half),
    Note::new(A3, Sixteenth),
    Note::new(D4, Eighth),
    Note::new(B3, Eighth),
    Note::tied(A3, Half),
    Note::new(A3, Sixteenth),
    Note::new(D4, Eighth),
    Note::new(B3, Eighth),
    Note::tied(A3, Quarter),
    Note::new(B3, Quarter),
    Note::tied(A3, Half),
    Note::new(A3, Sixteenth),
];

// Song of Storms
static SONG_OF_STORMS: [Note; 43] = [
    Note::new(D3, Eighth),
    Note::new(F3, Eighth),
    Note::new(D4, Half),
    Note::new(D3, Eighth),
    Note::new(F3, Eighth),
    Note::new(D4, Half),
    Note::new(E4, QuarterDot),
    Note::new(F4, Eighth),
    Note::new(E4, Eighth),
    Note::new(F4, Eighth),
    Note::new(E4, Eighth),
    Note::new(C4, Eighth),
    Note::new(A3, Half),
    Note::new(A3, Quarter),
    Note::new(D3, Quarter),
    Note::new(F3, Eighth),
    Note::new(G3, Eighth),
    Note::new(A3, HalfDot),
    Note::new(A3, Quarter),
    Note::new(D3, Quarter),
    Note::new(F3, Eighth),
    Note::new(G3, Eighth),
    Note::new(E3, HalfDot),
    Note::new(D3, Eighth),
    Note::new(F3, Eighth),
    Note::new(D4, Half),
    Note::new(D3, Eighth),
    Note::new(F3, Eighth),
    Note::new(D4, Half),
    Note::new(E4, QuarterDot),
    Note::new(F4, Eighth),
    Note::new(E4, Eighth),
    Note::new(F4, Eighth),
    Note::new(E4, Eighth),
    Note::new(C4, Eighth),
    Note::new(A3, Half),
    Note::new(A3, Quarter),
    Note::new(D3, Quarter),
    Note::new(F3, Eighth),
    Note::new(G3, Eighth),
    Note::new(A3, Half),
    Note::new(A3, Quarter),
    Note::new(D3, HalfDot),
];

// Zelda's Lullaby
static ZELDAS_LULLABY: [Note; 28] = [
    Note::new(B3, Half),
    Note::new(D4, Quarter),
    Note::new(A3, HalfDot),
    Note::new(B3, Half),
    Note::new(D4, Quarter),
    Note::new(A3, HalfDot),
    Note::new(B3, Half),
    Note::new(D4, Quarter),
    Note::new(A4, Half),
    Note::new(G4, Quarter),
    Note::new(D4, Half),
    Note::new(C4, Eighth),
    Note::new(B3, Eighth),
    Note::new(A3, Half),
    Note::new(G3, Eighth),
    Note::new(A3, Eighth),
    Note::new(B3, Half),
    Note::new(D4, Quarter),
    Note::new(A3, HalfDot),
    Note::new(B3, Half),
    Note::new(D4, Quarter),
    Note::new(A3, HalfDot),
    Note::new(B3, Half),
    Note::new(D4, Quarter),
    Note::new(A4, Half),
    Note::new(G4, Quarter),
    Note::tied(D5, HalfDot),
    Note::new(D5, Half),
];

// Saria's Song
static SARIAS_SONG: [Note; 88] = [
    Note::new(F3, Eighth),
    Note::new(A3, Eighth),
    Note::new(B3, Quarter),
    Note::new(F3, Eighth),
    Note::new(A3, Eighth),
    Note::new(B3, Quarter),
    Note::new(F3, Eighth),
    Note::new(A3, Eighth),
    Note::new(B3, Eighth),
    Note::new(E4, Eighth),
    Note::new(D4, Quarter),
    Note::new(B3, Eighth),
    Note::new(C4, Eighth),
    Note::new(B3, Eighth),
    Note::new(G3, Eighth),
    Note::tied(E3, Quarter),
    Note::new(E3, QuarterDot),
    Note::new(D3, Eighth),
    Note::new(E3, Eighth),
    Note::new(G3, Eighth),
    Note::new(E3, HalfDot),
    Note::new(F3, Eighth),
    Note::new(A3, Eighth),
    Note::new(B3, Quarter),
    Note::new(F3, Eighth),
    Note::new(A3, Eighth),
    Note::new(B3, Quarter),
    Note::new(F3, Eighth),
    Note::new(A3, Eighth),
    Note::new(B3, Eighth),
    Note::new(E4, Eighth),
    Note::new(D4, Quarter),
    Note::new(B3, Eighth),
    Note::new(C4, Eighth),
    Note::new(E4, Eighth),
    Note::new(C4, Eighth),
    Note::tied(G3, Quarter),
    Note::new(G3, QuarterDot),
    Note::new(B3, Eighth),
    Note::new(G3, Eighth),
    Note::new(D3, Eighth),
    Note::new(E3, HalfDot),
    Note::new(D3, Eighth),
    Note::new(E3, Eighth),
    Note::new(F3, Quarter),
    Note::new(G3, Eighth),
    Note::new(A3, Eighth),
    Note::new(B3, Quarter),
    Note::new(C4, Eighth),
    Note::new(B3, Eighth),
    Note::new(E3, HalfDot),
    Note::new(F3, Eighth),
    Note::new(G3, Eighth),
    Note::new(A3, Quarter),
    Note::new(B3, Eighth),
    Note::new(C4, Eighth),
    Note::new(D4, Quarter),
    Note::new(E4, Eighth),
    Note::new(F4, Eighth),
    Note::new(G4, HalfDot),
    Note::new(D3, Eighth),
    Note::new(E3, Eighth),
    Note::new(F3, Quarter),
    Note::new(G3, Eighth),
    Note::new(A3, Eighth),
    Note::new(B3, Quarter),
    Note::new(C4, Eighth),
    Note::new(B3, Eighth),
    Note::new(E3, HalfDot),
    Note::new(F3, Eighth),
    Note::new(E3, Eighth),
    Note::new(G3, Eighth),
    Note::new(F3, Eighth),
    Note::new(A3, Eighth),
    Note::new(G3, Eighth),
    Note::new(B3, Eighth),
    Note::new(A3, Eighth),
    Note::new(C4, Eighth),
    Note::new(B3, Eighth),
    Note::new(D4, Eighth),
    Note::new(C4, Eighth),
    Note::new(E4, Eighth),
    Note::new(D4, Eighth),
    Note::new(E4, Sixteenth),
    Note::new(F4, Eighth),
    Note::new(D4, Sixteenth),
    Note::tied(E4, Whole),
    Note::new(E4, Half),
];

// Song of Time
static SONG_OF_TIME: [Note; 18] = [
    Note::new(A4, Quarter),
    Note::new(D4, Half),
    Note::new(F4, Quarter),
    Note::new(A4, Quarter),
    Note::new(D4, Half),
    Note::new(F4, Quarter),
    Note::new(A4, Eighth),
    Note::new(C5, Eighth),
    Note::new(B4, Quarter),
    Note::new(G4, Quarter),
    Note::new(F4, Eighth),
    Note::new(G4, Eighth),
    Note::new(A4, Quarter),
    Note::new(D4, Quarter),
    Note::new(C4, Eighth),
    Note::new(E4, Eighth),
    Note::tied(D4, Quarter),
    Note::new(D4, Half),
];

// Sun's Song
static SUNS_SONG: [Note; 14] = [
    Note::new(A3, Eighth),
    Note::new(F3, Eighth),
    Note::new(D4, QuarterDot),
    Note::rest(Eighth),
    Note::new(A3, Eighth),
    Note::new(F3, Eighth),
    Note::new(D4, QuarterDot),
    Note::rest(Eighth),
    Note::new(C4, Sixteenth),
    Note::new(D4, Sixteenth),
    Note::new(E4, Sixteenth),
    Note::new(F4, Sixteenth),
    Note::tied(G4, Half),
    Note::new(G4, HalfDot),
];

// Success Sound
static SUCCESS_SOUND: [Note; 6] = [
    Note::tied(A5, Eighth),
    Note::tied(B5, Eighth),
    Note::tied(D6, Eighth),
    Note::tied(E6, Eighth),
    Note::tied(A6, Quarter),
    Note::rest(Quarter),
];

// Secret Sound
static SECRET_SOUND: [Note; 8] = [
    Note::new(GF6, Sixteenth),
    Note::new(F6, Sixteenth),
    Note::new(D6, Sixteenth),
    Note::new(AF5, Sixteenth),
    Note::new(G5, Sixteenth),
    Note::new(EF6, Sixteenth),
    Note::new(G6, Sixteenth),
    Note::new(B6, Sixteenth),
];

// Chest Sound
static CHEST_SOUND: [Note; 4] = [
    Note::tied(G4, QuarterTriplet),
    Note::tied(AS4, QuarterTriplet),
    Note::tied(B4, QuarterTriplet),
    Note::tied(C5, Quarter),
];

// Synth tones, C major from middle C.
static ZONE_TONES: [[Note; 1]; TOUCH_ZONE_COUNT as usize] = [
    [Note::new(C4, Quarter)],
    [Note::new(D4, Quarter)],
    [Note::new(E4, Quarter)],
    [Note::new(F4, Quarter)],
    [Note::new(G4, Quarter)],
    [Note::new(A4, Quarter)],
    [Note::new(B4, Quarter)],
    [Note::new(C5, Quarter)],
    [Note::new(D5, Quarter)],
];

const fn song(
    id: SongId,
    name: &'static str,
    tempo_bpm: u16,
    notes: &'static [Note],
) -> SongDescriptor {
    SongDescriptor {
        id,
        name,
        tempo_bpm,
        notes,
        looping: false,
    }
}

pub static SONGS: [SongDescriptor; 18] = [
    song(EPONAS_SONG_ID, "Epona's Song", 100, &EPONAS_SONG),
    song(SONG_OF_STORMS_ID, "Song of Storms", 180, &SONG_OF_STORMS),
    song(ZELDAS_LULLABY_ID, "Zelda's Lullaby", 104, &ZELDAS_LULLABY),
    song(SARIAS_SONG_ID, "Saria's Song", 150, &SARIAS_SONG),
    song(SONG_OF_TIME_ID, "Song of Time", 104, &SONG_OF_TIME),
    song(SUNS_SONG_ID, "Sun's Song", 100, &SUNS_SONG),
    song(SUCCESS_SOUND_ID, "Success Sound", 240, &SUCCESS_SOUND),
    song(SECRET_SOUND_ID, "Secret Sound", 120, &SECRET_SOUND),
    song(CHEST_SOUND_ID, "Chest Sound", 140, &CHEST_SOUND),
    song(SongId(ZONE_TONE_BASE), "Tone C4", 120, &ZONE_TONES[0]),
    song(SongId(ZONE_TONE_BASE + 1), "Tone D4", 120, &ZONE_TONES[1]),
    song(SongId(ZONE_TONE_BASE + 2), "Tone E4", 120, &ZONE_TONES[2]),
    song(SongId(ZONE_TONE_BASE + 3), "Tone F4", 120, &ZONE_TONES[3]),
    song(SongId(ZONE_TONE_BASE + 4), "Tone G4", 120, &ZONE_TONES[4]),
    song(SongId(ZONE_TONE_BASE + 5), "Tone A4", 120, &ZONE_TONES[5]),
    song(SongId(ZONE_TONE_BASE + 6), "Tone B4", 120, &ZONE_TONES[6]),
    song(SongId(ZONE_TONE_BASE + 7), "Tone C5", 120, &ZONE_TONES[7]),
    song(SongId(ZONE_TONE_BASE + 8), "Tone D5", 120, &ZONE_TONES[8]),
];

pub static ZONE_SONGS: [SongId; TOUCH_ZONE_COUNT as usize] = [
    SongId(ZONE_TONE_BASE),
    SongId(ZONE_TONE_BASE + 1),
    SongId(ZONE_TONE_BASE + 2),
    SongId(ZONE_TONE_BASE + 3),
    SongId(ZONE_TONE_BASE + 4),
    SongId(ZONE_TONE_BASE + 5),
    SongId(ZONE_TONE_BASE + 6),
    SongId(ZONE_TONE_BASE + 7),
    SongId(ZONE_TONE_BASE + 8),
];

const BLE_BLUE: Rgb = Rgb::new(0, 64, 255);

pub static PATTERNS: [PatternDescriptor; 5] = [
    PatternDescriptor {
        id: BLE_ENABLE_PATTERN,
        name: "BLE enable",
        kind: PatternKind::Pulse,
        color: BLE_BLUE,
        frame_count: 50,
        frame_period_ms: 40,
        looping: true,
    },
    PatternDescriptor {
        id: BLE_TRANSFER_PATTERN,
        name: "BLE transfer",
        kind: PatternKind::Chase,
        color: BLE_BLUE,
        frame_count: 3,
        frame_period_ms: 120,
        looping: true,
    },
    PatternDescriptor {
        id: RAINBOW_PATTERN,
        name: "Rainbow",
        kind: PatternKind::Rainbow,
        color: Rgb::OFF,
        frame_count: 64,
        frame_period_ms: 60,
        looping: true,
    },
    PatternDescriptor {
        id: ERROR_PATTERN,
        name: "Error",
        kind: PatternKind::Blink,
        color: Rgb::new(255, 0, 0),
        frame_count: 6,
        frame_period_ms: 150,
        looping: false,
    },
    PatternDescriptor {
        id: SUCCESS_PATTERN,
        name: "Success",
        kind: PatternKind::Solid,
        color: Rgb::new(0, 255, 0),
        frame_count: 1,
        frame_period_ms: 1000,
        looping: false,
    },
];

/// The registry the firmware runs with.
pub static BUILTIN: Registry<'static> = Registry::new(&PATTERNS, &SONGS, &ZONE_SONGS);
