//! The sound adapter: turns selection events into MIDI messages.
//!
//! Each sounding tile gets its own channel so its microtonal pitch bend is
//! independent of every other tile. Channels come from a round-robin pool
//! that skips the General MIDI percussion channel. The bend for a note is
//! always sent before its note-on.

use crate::audio::engine::MidiOut;
use crate::grid::{Coord, ModelEvent};
use crate::music::{cents_to_pitch_bend, PitchMapper, TuningSystem, DEFAULT_BEND_RANGE_CENTS};
use std::collections::HashMap;

/// General MIDI reserves channel 9 for percussion; melodic notes must not
/// land there.
const PERCUSSION_CHANNEL: u8 = 9;

/// Round-robin allocator over the 15 melodic MIDI channels.
#[derive(Debug, Default)]
pub struct ChannelPool {
    next: u8,
}

impl ChannelPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out the next channel, wrapping past 15 and skipping the
    /// percussion channel.
    pub fn allocate(&mut self) -> u8 {
        if self.next == PERCUSSION_CHANNEL {
            self.next += 1;
        }
        let channel = self.next;
        self.next = (self.next + 1) % 16;
        channel
    }
}

/// A sounding note keyed by the tile that triggered it.
#[derive(Debug, Clone, Copy)]
struct Voice {
    channel: u8,
    note: u8,
}

/// Subscribes to [`ModelEvent`]s and drives a [`MidiOut`] sink.
pub struct SoundRouter<S: MidiOut> {
    sink: S,
    pool: ChannelPool,
    voices: HashMap<Coord, Voice>,
    mapper: PitchMapper,
    tuning: TuningSystem,
    velocity: u8,
}

impl<S: MidiOut> SoundRouter<S> {
    pub fn new(sink: S, mapper: PitchMapper, tuning: TuningSystem, velocity: u8) -> Self {
        Self {
            sink,
            pool: ChannelPool::new(),
            voices: HashMap::new(),
            mapper,
            tuning,
            velocity,
        }
    }

    /// Switches the active tuning system. Only future note-ons are affected;
    /// already-sounding notes keep their bend.
    pub fn set_tuning(&mut self, tuning: TuningSystem) {
        self.tuning = tuning;
    }

    pub fn tuning(&self) -> TuningSystem {
        self.tuning
    }

    /// Number of currently sounding voices.
    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Synchronous event handler registered on the selection model's bus.
    pub fn handle_event(&mut self, event: &ModelEvent) {
        match event {
            ModelEvent::TileSelected { coord } => self.start_voice(*coord),
            ModelEvent::TileDeselected { coord } => self.stop_voice(*coord),
            ModelEvent::SelectionCleared { cleared } => {
                // Release from the snapshot, not from current model state:
                // by the time this handler runs the model is already empty.
                for coord in cleared {
                    self.stop_voice(*coord);
                }
            }
        }
    }

    fn start_voice(&mut self, coord: Coord) {
        if self.voices.contains_key(&coord) {
            return;
        }
        let (note, _) = self.mapper.midi_note(coord);
        let cents = self.tuning.cents_for(i32::from(note));
        let bend = cents_to_pitch_bend(cents, DEFAULT_BEND_RANGE_CENTS);
        let channel = self.pool.allocate();

        // Bend must land before the note-on so the attack is already in tune.
        self.sink.pitch_bend(channel, bend);
        self.sink.note_on(channel, note, self.velocity);
        self.voices.insert(coord, Voice { channel, note });
    }

    fn stop_voice(&mut self, coord: Coord) {
        // A note-off for a tile with no voice is a no-op, never an error.
        if let Some(voice) = self.voices.remove(&coord) {
            self.sink.note_off(voice.channel, voice.note);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MusicConfig;
    use crate::music::{EQUAL_TEMPERAMENT, JUST_INTONATION};

    /// Records every message instead of synthesizing.
    #[derive(Debug, Default)]
    struct RecordingSink {
        messages: Vec<String>,
    }

    impl MidiOut for RecordingSink {
        fn note_on(&mut self, channel: u8, note: u8, velocity: u8) {
            self.messages.push(format!("on {channel} {note} {velocity}"));
        }
        fn note_off(&mut self, channel: u8, note: u8) {
            self.messages.push(format!("off {channel} {note}"));
        }
        fn pitch_bend(&mut self, channel: u8, value: u16) {
            self.messages.push(format!("bend {channel} {value}"));
        }
        fn all_notes_off(&mut self) {
            self.messages.push("all-off".to_string());
        }
    }

    fn router(tuning: TuningSystem) -> SoundRouter<RecordingSink> {
        let mapper = PitchMapper::from_config(&MusicConfig::default()).unwrap();
        SoundRouter::new(RecordingSink::default(), mapper, tuning, 100)
    }

    #[test]
    fn test_channel_pool_skips_percussion() {
        let mut pool = ChannelPool::new();
        let channels: Vec<u8> = (0..30).map(|_| pool.allocate()).collect();
        assert!(!channels.contains(&PERCUSSION_CHANNEL));
        // 15 usable channels, then the cycle repeats.
        assert_eq!(channels[0], 0);
        assert_eq!(channels[8], 8);
        assert_eq!(channels[9], 10);
        assert_eq!(channels[15], 0);
    }

    #[test]
    fn test_bend_sent_before_note_on() {
        let mut router = router(JUST_INTONATION);
        router.handle_event(&ModelEvent::TileSelected {
            coord: Coord::new(0, 1), // G, +2.0 cents in just intonation
        });
        let msgs = &router.sink.messages;
        assert_eq!(msgs.len(), 2);
        assert!(msgs[0].starts_with("bend 0 "), "got {:?}", msgs);
        assert_eq!(msgs[1], "on 0 67 100");
        // +2 cents of a 200-cent range is about 82 bend units sharp.
        let bend: u16 = msgs[0].rsplit(' ').next().unwrap().parse().unwrap();
        assert_eq!(bend, 8274);
    }

    #[test]
    fn test_equal_temperament_bend_is_center() {
        let mut router = router(EQUAL_TEMPERAMENT);
        router.handle_event(&ModelEvent::TileSelected {
            coord: Coord::new(2, -1),
        });
        assert!(router.sink.messages[0].ends_with(" 8192"));
    }

    #[test]
    fn test_deselect_releases_same_note_and_channel() {
        let mut router = router(EQUAL_TEMPERAMENT);
        let coord = Coord::new(1, 1);
        router.handle_event(&ModelEvent::TileSelected { coord });
        router.handle_event(&ModelEvent::TileDeselected { coord });
        assert_eq!(router.active_voices(), 0);
        // C4 + 4 + 7 = 71 (B4).
        assert_eq!(router.sink.messages[2], "off 0 71");
    }

    #[test]
    fn test_unknown_note_off_is_noop() {
        let mut router = router(EQUAL_TEMPERAMENT);
        router.handle_event(&ModelEvent::TileDeselected {
            coord: Coord::new(9, 9),
        });
        assert!(router.sink.messages.is_empty());
    }

    #[test]
    fn test_cleared_snapshot_releases_all() {
        let mut router = router(EQUAL_TEMPERAMENT);
        let a = Coord::new(0, 0);
        let b = Coord::new(1, 0);
        router.handle_event(&ModelEvent::TileSelected { coord: a });
        router.handle_event(&ModelEvent::TileSelected { coord: b });
        router.handle_event(&ModelEvent::SelectionCleared {
            cleared: vec![a, b],
        });
        assert_eq!(router.active_voices(), 0);
        let offs = router
            .sink
            .messages
            .iter()
            .filter(|m| m.starts_with("off"))
            .count();
        assert_eq!(offs, 2);
    }

    #[test]
    fn test_tuning_switch_affects_future_notes_only() {
        let mut router = router(EQUAL_TEMPERAMENT);
        router.handle_event(&ModelEvent::TileSelected {
            coord: Coord::new(0, 0),
        });
        router.set_tuning(JUST_INTONATION);
        router.handle_event(&ModelEvent::TileSelected {
            coord: Coord::new(0, 1),
        });
        assert!(router.sink.messages[0].ends_with(" 8192"));
        assert_eq!(router.sink.messages[2], "bend 1 8274");
    }
}
