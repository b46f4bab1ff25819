//! Music theory: note names, lattice-to-pitch mapping, and tuning systems.
//!
//! The lattice is a Tonnetz: moving along `q` steps by one fixed interval
//! (default a major third), moving along `r` by another (default a perfect
//! fifth). Pitch class comes straight from this linear map; the octave is
//! derived from absolute position and wrapped into a configured span.

mod note;
mod tuning;

pub use note::{midi_to_note_name, midi_to_pitch_class_name, parse_note_name, InvalidNoteFormat};
pub use tuning::{
    cents_to_pitch_bend, TuningSystem, BEND_CENTER, DEFAULT_BEND_RANGE_CENTS, EQUAL_TEMPERAMENT,
    JUST_INTONATION, MEANTONE, PYTHAGOREAN,
};

use crate::config::MusicConfig;
use crate::grid::Coord;

/// Absolute (unwrapped) MIDI position of a lattice coordinate.
///
/// A plain linear map: `base + q*incr_q + r*incr_r`. The result can fall far
/// outside the playable MIDI range; callers wrap it with [`wrap_octave`].
pub fn coord_to_midi(coord: Coord, base_midi: i32, incr_q: i32, incr_r: i32) -> i32 {
    base_midi + coord.q * incr_q + coord.r * incr_r
}

/// Wraps an absolute MIDI position into the configured octave span.
///
/// The pitch class is preserved; only the octave digit cycles through
/// `[min_octave, max_octave]`. Returns the playable MIDI note and the octave
/// it landed in.
pub fn wrap_octave(absolute_midi: i32, min_octave: i32, max_octave: i32) -> (u8, i32) {
    let pitch_class = absolute_midi.rem_euclid(12);
    let octave = absolute_midi.div_euclid(12) - 1;
    let span = (max_octave - min_octave + 1).max(1);
    let wrapped = (octave - min_octave).rem_euclid(span) + min_octave;
    ((12 * (wrapped + 1) + pitch_class) as u8, wrapped)
}

/// Translates lattice coordinates into pitches under one fixed configuration.
///
/// Built once at session start from the parsed origin note and the interval
/// coefficients; holds no mutable state.
#[derive(Debug, Clone, Copy)]
pub struct PitchMapper {
    base_midi: i32,
    incr_q: i32,
    incr_r: i32,
    min_octave: i32,
    max_octave: i32,
}

impl PitchMapper {
    /// Builds a mapper from the music configuration.
    ///
    /// Fails with [`InvalidNoteFormat`] when the configured origin note does
    /// not parse; this is a fatal startup error.
    pub fn from_config(config: &MusicConfig) -> Result<Self, InvalidNoteFormat> {
        let base_midi = i32::from(parse_note_name(&config.origin_note)?);
        Ok(Self {
            base_midi,
            incr_q: config.pitch_incr_q,
            incr_r: config.pitch_incr_r,
            min_octave: config.min_octave,
            max_octave: config.max_octave,
        })
    }

    /// Absolute MIDI position of a coordinate (unwrapped).
    pub fn absolute_midi(&self, coord: Coord) -> i32 {
        coord_to_midi(coord, self.base_midi, self.incr_q, self.incr_r)
    }

    /// Playable MIDI note for a coordinate, with its derived octave.
    pub fn midi_note(&self, coord: Coord) -> (u8, i32) {
        wrap_octave(self.absolute_midi(coord), self.min_octave, self.max_octave)
    }

    /// Pitch-class name of a coordinate, e.g. `F#` or `Gb`.
    pub fn pitch_class_name(&self, coord: Coord, use_sharps: bool) -> &'static str {
        midi_to_pitch_class_name(self.absolute_midi(coord), use_sharps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> PitchMapper {
        PitchMapper::from_config(&MusicConfig::default()).unwrap()
    }

    #[test]
    fn test_linear_map_defaults() {
        // Origin C4 = 60; +4 per q step, +7 per r step.
        let m = mapper();
        assert_eq!(m.absolute_midi(Coord::new(0, 0)), 60);
        assert_eq!(m.absolute_midi(Coord::new(1, 0)), 64);
        assert_eq!(m.absolute_midi(Coord::new(0, 1)), 67);
        assert_eq!(m.absolute_midi(Coord::new(-2, 3)), 60 - 8 + 21);
    }

    #[test]
    fn test_wrap_octave_in_span() {
        // C4 stays put inside a 2..=6 span.
        assert_eq!(wrap_octave(60, 2, 6), (60, 4));
        // C7 (96) is one past the top; wraps to C2.
        assert_eq!(wrap_octave(96, 2, 6), (12 * 3, 2));
        // C1 (24) is one below the bottom; wraps to C6.
        assert_eq!(wrap_octave(24, 2, 6), (12 * 7, 6));
    }

    #[test]
    fn test_wrap_octave_preserves_pitch_class() {
        for abs in (-60..200).step_by(7) {
            let (midi, octave) = wrap_octave(abs, 2, 6);
            assert_eq!(i32::from(midi).rem_euclid(12), abs.rem_euclid(12));
            assert!((2..=6).contains(&octave));
        }
    }

    #[test]
    fn test_midi_note_always_playable() {
        let m = mapper();
        for q in -20..=20 {
            for r in -20..=20 {
                let (midi, octave) = m.midi_note(Coord::new(q, r));
                assert!(midi <= 127);
                assert!((2..=6).contains(&octave));
            }
        }
    }

    #[test]
    fn test_pitch_class_name_spelling() {
        let m = mapper();
        // One q step above C is E; one r step is G.
        assert_eq!(m.pitch_class_name(Coord::new(0, 0), true), "C");
        assert_eq!(m.pitch_class_name(Coord::new(1, 0), true), "E");
        assert_eq!(m.pitch_class_name(Coord::new(0, 1), true), "G");
        // C# vs Db spelling follows the preference.
        assert_eq!(m.pitch_class_name(Coord::new(-2, 3), true), "C#");
        assert_eq!(m.pitch_class_name(Coord::new(-2, 3), false), "Db");
    }

    #[test]
    fn test_bad_origin_note_is_an_error() {
        let config = MusicConfig {
            origin_note: "H4".to_string(),
            ..MusicConfig::default()
        };
        assert!(PitchMapper::from_config(&config).is_err());
    }
}
