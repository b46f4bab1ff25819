//! Sound output: SoundFont synthesis and the event-driven note router.

pub mod engine;
pub mod router;

pub use engine::{AudioEngine, MidiOut};
pub use router::SoundRouter;
