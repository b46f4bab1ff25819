//! Note-name parsing and enharmonic pitch-class naming.

use thiserror::Error;

/// Enharmonic name pairs for the twelve pitch classes. The first spelling is
/// preferred for sharps, the second (when present) for flats.
const PITCH_CLASS_NAMES: [(&str, Option<&str>); 12] = [
    ("C", None),
    ("C#", Some("Db")),
    ("D", None),
    ("D#", Some("Eb")),
    ("E", None),
    ("F", None),
    ("F#", Some("Gb")),
    ("G", None),
    ("G#", Some("Ab")),
    ("A", None),
    ("A#", Some("Bb")),
    ("B", None),
];

/// A note name could not be parsed.
///
/// Origin-note parsing happens once at startup, so these surface as fatal
/// configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidNoteFormat {
    /// The trailing octave digit is missing.
    #[error("invalid note format, missing octave: {0:?}")]
    MissingOctave(String),
    /// Nothing remains before the octave digit.
    #[error("invalid note format, missing pitch name: {0:?}")]
    MissingPitch(String),
    /// The pitch name is not a recognized letter/accidental combination.
    #[error("cannot parse note name: {0:?}")]
    UnknownPitch(String),
}

/// Parses a note name like `C4`, `F#3`, or `Db5` into a MIDI note number.
///
/// The octave is a single trailing digit. Sharp and flat spellings are both
/// accepted, including edge names such as `B#` and `Cb`, which wrap around
/// the pitch-class circle.
pub fn parse_note_name(text: &str) -> Result<u8, InvalidNoteFormat> {
    let text = text.trim();
    let Some(octave_char) = text.chars().last().filter(char::is_ascii_digit) else {
        return Err(InvalidNoteFormat::MissingOctave(text.to_string()));
    };
    let octave = octave_char as i32 - '0' as i32;

    let raw_pitch = &text[..text.len() - 1];
    if raw_pitch.is_empty() {
        return Err(InvalidNoteFormat::MissingPitch(text.to_string()));
    }

    // Normalize to an uppercase letter with an optional lowercase accidental.
    let mut pitch = String::with_capacity(raw_pitch.len());
    for (i, c) in raw_pitch.chars().enumerate() {
        if i == 0 {
            pitch.extend(c.to_uppercase());
        } else {
            pitch.push(c);
        }
    }

    let pitch_class = lookup_pitch_class(&pitch)
        .ok_or_else(|| InvalidNoteFormat::UnknownPitch(text.to_string()))?;

    Ok((12 * (octave + 1) + pitch_class) as u8)
}

/// Resolves a normalized pitch name to its pitch class (0-11).
///
/// Spellings outside the table (B#, Cb, E#, Fb) shift the base letter's
/// class one step around the circle, wrapping modulo 12; the octave digit
/// of the full name is never adjusted.
fn lookup_pitch_class(pitch: &str) -> Option<i32> {
    for (i, (sharp, flat)) in PITCH_CLASS_NAMES.iter().enumerate() {
        if *sharp == pitch || *flat == Some(pitch) {
            return Some(i as i32);
        }
    }

    let shift = if pitch.ends_with('#') {
        1
    } else if pitch.ends_with('b') {
        -1
    } else {
        return None;
    };
    let base = &pitch[..pitch.len() - 1];
    for (i, (sharp, flat)) in PITCH_CLASS_NAMES.iter().enumerate() {
        if *sharp == base || *flat == Some(base) {
            return Some((i as i32 + shift).rem_euclid(12));
        }
    }
    None
}

/// Returns the pitch-class name for a MIDI note, e.g. `C#` or `Db`.
///
/// When `use_sharps` is false and a flat spelling exists, the flat spelling
/// is preferred.
pub fn midi_to_pitch_class_name(midi: i32, use_sharps: bool) -> &'static str {
    let (sharp, flat) = PITCH_CLASS_NAMES[midi.rem_euclid(12) as usize];
    match flat {
        Some(name) if !use_sharps => name,
        _ => sharp,
    }
}

/// Full note name with octave, e.g. `C#4`.
pub fn midi_to_note_name(midi: i32, use_sharps: bool) -> String {
    let octave = midi.div_euclid(12) - 1;
    format!("{}{}", midi_to_pitch_class_name(midi, use_sharps), octave)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_naturals() {
        assert_eq!(parse_note_name("C4"), Ok(60));
        assert_eq!(parse_note_name("A4"), Ok(69));
        assert_eq!(parse_note_name("B3"), Ok(59));
        assert_eq!(parse_note_name("C0"), Ok(12));
    }

    #[test]
    fn test_parse_enharmonic_equivalents() {
        assert_eq!(parse_note_name("Db5"), parse_note_name("C#5"));
        assert_eq!(parse_note_name("Gb2"), parse_note_name("F#2"));
    }

    #[test]
    fn test_parse_wrapping_spellings() {
        // The pitch class wraps around the circle; the octave digit stays,
        // so B#3 resolves to pitch class C in octave 3.
        assert_eq!(parse_note_name("B#3"), parse_note_name("C3"));
        assert_eq!(parse_note_name("Cb4"), parse_note_name("B4"));
        assert_eq!(parse_note_name("E#4"), Ok(65));
        assert_eq!(parse_note_name("Fb4"), Ok(64));
    }

    #[test]
    fn test_parse_case_and_whitespace() {
        assert_eq!(parse_note_name(" c4 "), Ok(60));
        assert_eq!(parse_note_name("db5"), parse_note_name("Db5"));
    }

    #[test]
    fn test_parse_failures() {
        assert_eq!(
            parse_note_name("C"),
            Err(InvalidNoteFormat::MissingOctave("C".to_string()))
        );
        assert_eq!(
            parse_note_name("4"),
            Err(InvalidNoteFormat::MissingPitch("4".to_string()))
        );
        assert_eq!(
            parse_note_name("H4"),
            Err(InvalidNoteFormat::UnknownPitch("H4".to_string()))
        );
        assert!(parse_note_name("").is_err());
    }

    #[test]
    fn test_pitch_class_names() {
        assert_eq!(midi_to_pitch_class_name(60, true), "C");
        assert_eq!(midi_to_pitch_class_name(61, true), "C#");
        assert_eq!(midi_to_pitch_class_name(61, false), "Db");
        // Naturals have no flat spelling to prefer.
        assert_eq!(midi_to_pitch_class_name(62, false), "D");
        // Negative MIDI values still resolve a pitch class.
        assert_eq!(midi_to_pitch_class_name(-1, true), "B");
    }

    #[test]
    fn test_full_note_name() {
        assert_eq!(midi_to_note_name(60, true), "C4");
        assert_eq!(midi_to_note_name(61, false), "Db4");
        assert_eq!(midi_to_note_name(0, true), "C-1");
    }
}
