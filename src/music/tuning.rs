//! Tuning systems and microtonal pitch-bend computation.
//!
//! A tuning system maps each pitch class to its deviation in cents from
//! 12-tone equal temperament. The deviation is rendered as a per-channel
//! MIDI pitch-bend message; the note number itself never changes.

/// Default pitch-bend range of a General MIDI channel: ±200 cents.
pub const DEFAULT_BEND_RANGE_CENTS: f64 = 200.0;

/// Pitch-bend value meaning "no deviation".
pub const BEND_CENTER: u16 = 8192;

/// A named mapping from pitch class (0-11) to cents deviation from 12-TET.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TuningSystem {
    pub name: &'static str,
    cents: [f64; 12],
}

impl TuningSystem {
    /// Cents deviation for a pitch class derived from a MIDI note number.
    pub fn cents_for(&self, midi: i32) -> f64 {
        self.cents[midi.rem_euclid(12) as usize]
    }

    /// All built-in tuning systems, in cycling order.
    pub fn all() -> &'static [TuningSystem] {
        &BUILT_IN_TUNINGS
    }
}

/// 12-tone equal temperament: every deviation is zero.
pub const EQUAL_TEMPERAMENT: TuningSystem = TuningSystem {
    name: "12-TET",
    cents: [0.0; 12],
};

/// 5-limit just intonation, relative to the lattice origin as 1/1.
pub const JUST_INTONATION: TuningSystem = TuningSystem {
    name: "Just (5-limit)",
    cents: [
        0.0,   // 1/1
        -29.3, // 16/15
        3.9,   // 9/8
        15.6,  // 6/5
        -13.7, // 5/4
        -2.0,  // 4/3
        -17.6, // 45/32
        2.0,   // 3/2
        17.6,  // 8/5
        -15.6, // 5/3
        19.6,  // 9/5
        -11.7, // 15/8
    ],
};

/// Pythagorean tuning: a stack of pure fifths.
pub const PYTHAGOREAN: TuningSystem = TuningSystem {
    name: "Pythagorean",
    cents: [
        0.0,   // 1/1
        -23.5, // 256/243
        3.9,   // 9/8
        -19.6, // 32/27
        7.8,   // 81/64
        -2.0,  // 4/3
        11.7,  // 729/512
        2.0,   // 3/2
        -21.5, // 128/81
        5.9,   // 27/16
        -17.6, // 16/9
        9.8,   // 243/128
    ],
};

/// Quarter-comma meantone. The tritone is the wolf interval.
pub const MEANTONE: TuningSystem = TuningSystem {
    name: "1/4-comma meantone",
    cents: [
        0.0, 19.6, -5.9, 13.7, -13.7, 5.9, 25.5, -3.9, 15.6, -9.8, 9.8, -19.6,
    ],
};

static BUILT_IN_TUNINGS: [TuningSystem; 4] =
    [EQUAL_TEMPERAMENT, JUST_INTONATION, PYTHAGOREAN, MEANTONE];

/// Converts a cents deviation to a 14-bit MIDI pitch-bend value.
///
/// `8192` is center (no bend); the full positive range `8191` maps to
/// `bend_range_cents`. The result is clamped to `[0, 16383]`.
pub fn cents_to_pitch_bend(cents: f64, bend_range_cents: f64) -> u16 {
    let value = (8192.0 + (cents / bend_range_cents) * 8191.0).round();
    value.clamp(0.0, 16383.0) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bend_center() {
        assert_eq!(cents_to_pitch_bend(0.0, DEFAULT_BEND_RANGE_CENTS), 8192);
    }

    #[test]
    fn test_bend_extremes() {
        assert_eq!(cents_to_pitch_bend(200.0, DEFAULT_BEND_RANGE_CENTS), 16383);
        assert_eq!(cents_to_pitch_bend(-200.0, DEFAULT_BEND_RANGE_CENTS), 1);
    }

    #[test]
    fn test_bend_clamped_out_of_range() {
        assert_eq!(cents_to_pitch_bend(500.0, DEFAULT_BEND_RANGE_CENTS), 16383);
        assert_eq!(cents_to_pitch_bend(-500.0, DEFAULT_BEND_RANGE_CENTS), 0);
    }

    #[test]
    fn test_bend_small_deviation() {
        // +3.9 cents (Pythagorean major second) bends slightly sharp.
        let bend = cents_to_pitch_bend(3.9, DEFAULT_BEND_RANGE_CENTS);
        assert!(bend > BEND_CENTER);
        assert!(bend < BEND_CENTER + 200);
    }

    #[test]
    fn test_equal_temperament_is_flat_zero() {
        for midi in -12..=127 {
            assert_eq!(EQUAL_TEMPERAMENT.cents_for(midi), 0.0);
        }
    }

    #[test]
    fn test_tuning_lookup_by_pitch_class() {
        // The fifth above the origin (pitch class 7) is +2.0 cents in both
        // just intonation and Pythagorean tuning.
        assert_eq!(JUST_INTONATION.cents_for(67), 2.0);
        assert_eq!(PYTHAGOREAN.cents_for(7), 2.0);
        // Pitch class repeats across octaves.
        assert_eq!(MEANTONE.cents_for(6), MEANTONE.cents_for(18));
    }

    #[test]
    fn test_built_in_count() {
        assert_eq!(TuningSystem::all().len(), 4);
    }
}
