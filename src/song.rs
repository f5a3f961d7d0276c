//! Song descriptors: note sequences played on the piezo buzzer.
//!
//! Durations are computed on a 1/192 whole-note grid so dotted values and
//! triplets divide exactly:
//!
//! ```text
//! ms = 240_000 * units / (192 * tempo_bpm) = 1250 * units / tempo_bpm
//! ```

/// Registry key for a song.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SongId(pub u8);

/// Equal-tempered pitches (Hz), rounded. `REST` is silence.
pub mod pitch {
    pub const REST: u16 = 0;

    pub const D3: u16 = 147;
    pub const E3: u16 = 165;
    pub const F3: u16 = 175;
    pub const FS3: u16 = 185;
    pub const G3: u16 = 196;
    pub const A3: u16 = 220;
    pub const B3: u16 = 247;

    pub const C4: u16 = 262;
    pub const CS4: u16 = 277;
    pub const D4: u16 = 294;
    pub const E4: u16 = 330;
    pub const F4: u16 = 349;
    pub const G4: u16 = 392;
    pub const A4: u16 = 440;
    pub const AS4: u16 = 466;
    pub const B4: u16 = 494;

    pub const C5: u16 = 523;
    pub const D5: u16 = 587;
    pub const G5: u16 = 784;
    pub const AF5: u16 = 831;
    pub const A5: u16 = 880;
    pub const B5: u16 = 988;

    pub const D6: u16 = 1175;
    pub const EF6: u16 = 1245;
    pub const E6: u16 = 1319;
    pub const F6: u16 = 1397;
    pub const GF6: u16 = 1480;
    pub const G6: u16 = 1568;
    pub const A6: u16 = 1760;
    pub const B6: u16 = 1976;
}

/// Rhythmic value of a note.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NoteValue {
    Whole,
    Half,
    HalfDot,
    Quarter,
    QuarterDot,
    QuarterTriplet,
    Eighth,
    EighthDot,
    EighthTriplet,
    Sixteenth,
    ThirtySecond,
}

impl NoteValue {
    /// Length in 1/192 whole-note units.
    pub const fn units(self) -> u32 {
        match self {
            NoteValue::Whole => 192,
            NoteValue::Half => 96,
            NoteValue::HalfDot => 144,
            NoteValue::Quarter => 48,
            NoteValue::QuarterDot => 72,
            NoteValue::QuarterTriplet => 32,
            NoteValue::Eighth => 24,
            NoteValue::EighthDot => 36,
            NoteValue::EighthTriplet => 16,
            NoteValue::Sixteenth => 12,
            NoteValue::ThirtySecond => 6,
        }
    }

    /// Duration at `tempo_bpm` quarter notes per minute.
    pub const fn duration_ms(self, tempo_bpm: u16) -> u32 {
        if tempo_bpm == 0 {
            return 0;
        }
        1250 * self.units() / tempo_bpm as u32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Note {
    /// Frequency in Hz, `pitch::REST` for silence.
    pub pitch_hz: u16,
    pub value: NoteValue,
    /// Slur into the next note without an articulation gap.
    pub tie: bool,
}

impl Note {
    pub const fn new(pitch_hz: u16, value: NoteValue) -> Self {
        Self {
            pitch_hz,
            value,
            tie: false,
        }
    }

    pub const fn tied(pitch_hz: u16, value: NoteValue) -> Self {
        Self {
            pitch_hz,
            value,
            tie: true,
        }
    }

    pub const fn rest(value: NoteValue) -> Self {
        Self::new(pitch::REST, value)
    }

    pub const fn is_rest(&self) -> bool {
        self.pitch_hz == pitch::REST
    }
}

/// Immutable, statically registered song.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SongDescriptor {
    pub id: SongId,
    pub name: &'static str,
    pub tempo_bpm: u16,
    pub notes: &'static [Note],
    /// Restart from the first note when playback completes.
    pub looping: bool,
}

impl SongDescriptor {
    pub fn note_duration_ms(&self, note: &Note) -> u32 {
        note.value.duration_ms(self.tempo_bpm)
    }

    pub fn total_duration_ms(&self) -> u32 {
        self.notes
            .iter()
            .map(|n| self.note_duration_ms(n))
            .sum()
    }

    /// Index of the note sounding `elapsed_ms` after playback started,
    /// or `None` once the song is over.
    pub fn note_index_at(&self, elapsed_ms: u32) -> Option<usize> {
        let mut start = 0u32;
        for (i, note) in self.notes.iter().enumerate() {
            let end = start + self.note_duration_ms(note);
            if elapsed_ms < end {
                return Some(i);
            }
            start = end;
        }
        None
    }
}
