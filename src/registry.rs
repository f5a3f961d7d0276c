//! Pattern/song registry.
//!
//! A [`Registry`] is a read-only view over static descriptor tables. It is
//! built once (usually as a `static`) before the event loop starts and is
//! never mutated. The state machine borrows descriptors out of it for the
//! length of a playback episode.

use crate::error::{BadgeError, DescriptorId};
use crate::event::Zone;
use crate::pattern::{PatternDescriptor, PatternId};
use crate::song::{SongDescriptor, SongId};

/// Resolved descriptor returned by [`Registry::lookup`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Descriptor<'r> {
    Pattern(&'r PatternDescriptor),
    Song(&'r SongDescriptor),
}

#[derive(Clone, Copy, Debug)]
pub struct Registry<'r> {
    patterns: &'r [PatternDescriptor],
    songs: &'r [SongDescriptor],
    /// `zone_songs[zone]` is the song a touch on that zone plays.
    zone_songs: &'r [SongId],
}

impl<'r> Registry<'r> {
    pub const fn new(
        patterns: &'r [PatternDescriptor],
        songs: &'r [SongDescriptor],
        zone_songs: &'r [SongId],
    ) -> Self {
        Self {
            patterns,
            songs,
            zone_songs,
        }
    }

    pub const fn empty() -> Self {
        Self::new(&[], &[], &[])
    }

    pub fn lookup(&self, id: DescriptorId) -> Option<Descriptor<'r>> {
        match id {
            DescriptorId::Pattern(id) => self.pattern(id).map(Descriptor::Pattern),
            DescriptorId::Song(id) => self.song(id).map(Descriptor::Song),
            DescriptorId::ZoneSong(zone) => self.song_for_zone(zone).map(Descriptor::Song),
        }
    }

    pub fn pattern(&self, id: PatternId) -> Option<&'r PatternDescriptor> {
        self.patterns.iter().find(|p| p.id == id)
    }

    pub fn song(&self, id: SongId) -> Option<&'r SongDescriptor> {
        self.songs.iter().find(|s| s.id == id)
    }

    /// Default song for a touch zone. `None` if the zone is unbound or its
    /// binding names an unregistered song.
    pub fn song_for_zone(&self, zone: Zone) -> Option<&'r SongDescriptor> {
        self.zone_songs
            .get(zone.index())
            .and_then(|&id| self.song(id))
    }

    /// Check the tables for problems a lookup by id would hide: duplicate
    /// ids, descriptors that cannot render, and dangling zone bindings.
    pub fn validate(&self) -> Result<(), BadgeError> {
        for (i, p) in self.patterns.iter().enumerate() {
            if p.frame_count == 0 || p.frame_period_ms == 0 {
                error!("pattern {} cannot render", p.id.0);
                return Err(BadgeError::InvalidRegistry);
            }
            if self.patterns[..i].iter().any(|q| q.id == p.id) {
                error!("duplicate pattern id {}", p.id.0);
                return Err(BadgeError::InvalidRegistry);
            }
        }

        for (i, s) in self.songs.iter().enumerate() {
            if s.notes.is_empty() || s.tempo_bpm == 0 {
                error!("song {} cannot play", s.id.0);
                return Err(BadgeError::InvalidRegistry);
            }
            if self.songs[..i].iter().any(|t| t.id == s.id) {
                error!("duplicate song id {}", s.id.0);
                return Err(BadgeError::InvalidRegistry);
            }
        }

        if let Some(id) = self.zone_songs.iter().find(|&&id| self.song(id).is_none()) {
            error!("zone bound to unknown song {}", id.0);
            return Err(BadgeError::InvalidRegistry);
        }

        Ok(())
    }
}
