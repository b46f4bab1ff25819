//! Real-time synthesis backend.
//!
//! Wraps rustysynth for SoundFont synthesis and rodio for audio output. The
//! rest of the app talks to it only through the narrow [`MidiOut`] interface:
//! note-on, note-off, and per-channel pitch bend.

use anyhow::{Context, Result};
use rodio::{OutputStream, OutputStreamHandle, Source};
use rustysynth::{SoundFont, Synthesizer, SynthesizerSettings};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Sample rate for audio synthesis (44.1 kHz standard).
pub const SAMPLE_RATE: u32 = 44100;

/// Audio buffer size for low-latency playback.
/// Smaller = lower latency but higher CPU usage.
const BUFFER_SIZE: usize = 256;

/// The message sink the sound router writes to.
///
/// Implemented by [`AudioEngine`] for real playback and by a recording stub
/// in tests. Pitch bend values are raw 14-bit (0..=16383, center 8192).
pub trait MidiOut {
    fn note_on(&mut self, channel: u8, note: u8, velocity: u8);
    fn note_off(&mut self, channel: u8, note: u8);
    fn pitch_bend(&mut self, channel: u8, value: u16);
    fn all_notes_off(&mut self);
}

/// Audio source that pulls samples from the synthesizer.
/// Implements rodio's Source trait for playback.
struct SynthSource {
    synth: Arc<Mutex<Synthesizer>>,
    left_buf: Vec<f32>,
    right_buf: Vec<f32>,
    buf_pos: usize,
    /// Current channel (0 = left, 1 = right).
    channel: usize,
}

impl SynthSource {
    fn new(synth: Arc<Mutex<Synthesizer>>) -> Self {
        Self {
            synth,
            left_buf: vec![0.0; BUFFER_SIZE],
            right_buf: vec![0.0; BUFFER_SIZE],
            buf_pos: BUFFER_SIZE, // Start at end to trigger first render
            channel: 0,
        }
    }
}

impl Iterator for SynthSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        // Render a new buffer when the current one is exhausted. The synth
        // outputs silence when no notes are held.
        if self.buf_pos >= BUFFER_SIZE {
            if let Ok(mut synth) = self.synth.lock() {
                synth.render(&mut self.left_buf, &mut self.right_buf);
            } else {
                self.left_buf.fill(0.0);
                self.right_buf.fill(0.0);
            }
            self.buf_pos = 0;
        }

        // Interleave stereo samples: L, R, L, R, ...
        let sample = if self.channel == 0 {
            self.left_buf[self.buf_pos]
        } else {
            self.right_buf[self.buf_pos]
        };

        self.channel = 1 - self.channel;
        if self.channel == 0 {
            self.buf_pos += 1;
        }

        Some(sample)
    }
}

impl Source for SynthSource {
    fn current_frame_len(&self) -> Option<usize> {
        None // Continuous stream
    }

    fn channels(&self) -> u16 {
        2 // Stereo
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        None // Infinite stream
    }
}

/// SoundFont synthesizer with a live rodio output stream.
pub struct AudioEngine {
    /// The synthesizer (shared with the audio thread).
    synth: Arc<Mutex<Synthesizer>>,
    /// Audio output stream (must be kept alive).
    _stream: OutputStream,
    _stream_handle: OutputStreamHandle,
}

impl AudioEngine {
    /// Creates an engine playing through the default audio output.
    ///
    /// # Errors
    ///
    /// Returns an error if the SoundFont cannot be read or parsed, or the
    /// audio output cannot be opened.
    pub fn new<P: AsRef<Path>>(soundfont_path: P) -> Result<Self> {
        let mut file = BufReader::new(File::open(soundfont_path.as_ref()).with_context(|| {
            format!(
                "Failed to open SoundFont: {}",
                soundfont_path.as_ref().display()
            )
        })?);
        let soundfont = Arc::new(
            SoundFont::new(&mut file)
                .map_err(|e| anyhow::anyhow!("Failed to load SoundFont: {:?}", e))?,
        );

        let settings = SynthesizerSettings::new(SAMPLE_RATE as i32);
        let synth = Synthesizer::new(&soundfont, &settings)
            .map_err(|e| anyhow::anyhow!("Failed to create synthesizer: {:?}", e))?;
        let synth = Arc::new(Mutex::new(synth));

        let (stream, stream_handle) =
            OutputStream::try_default().context("Failed to open audio output")?;

        let source = SynthSource::new(Arc::clone(&synth));
        stream_handle
            .play_raw(source)
            .context("Failed to start audio playback")?;

        Ok(Self {
            synth,
            _stream: stream,
            _stream_handle: stream_handle,
        })
    }

    /// Sets the instrument (program) for a channel.
    pub fn set_program(&self, channel: u8, program: u8) {
        if let Ok(mut synth) = self.synth.lock() {
            // Program change is MIDI command 0xC0.
            synth.process_midi_message(i32::from(channel), 0xC0, i32::from(program), 0);
        }
    }
}

impl MidiOut for AudioEngine {
    fn note_on(&mut self, channel: u8, note: u8, velocity: u8) {
        if let Ok(mut synth) = self.synth.lock() {
            synth.note_on(
                i32::from(channel),
                i32::from(note),
                i32::from(velocity.min(127)),
            );
        }
    }

    fn note_off(&mut self, channel: u8, note: u8) {
        if let Ok(mut synth) = self.synth.lock() {
            synth.note_off(i32::from(channel), i32::from(note));
        }
    }

    fn pitch_bend(&mut self, channel: u8, value: u16) {
        if let Ok(mut synth) = self.synth.lock() {
            // Pitch bend is 0xE0 with the 14-bit value split into two
            // 7-bit data bytes, LSB first.
            let value = value.min(16383);
            let lsb = i32::from(value & 0x7F);
            let msb = i32::from(value >> 7);
            synth.process_midi_message(i32::from(channel), 0xE0, lsb, msb);
        }
    }

    fn all_notes_off(&mut self) {
        if let Ok(mut synth) = self.synth.lock() {
            synth.note_off_all(false);
        }
    }
}
