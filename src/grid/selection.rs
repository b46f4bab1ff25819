//! Selection state and diff-based change notification.
//!
//! The model owns the set of selected tiles and is the only place selection
//! changes. Every mutation updates internal state first and only then
//! notifies subscribers, in a fixed order, so a handler that reads back into
//! the model always observes the final state.
//!
//! Octaves are derived from lattice position (see [`crate::music`]); the
//! selection itself is a plain sparse set of coordinates.

use super::Coord;
use crate::music::PitchMapper;
use std::collections::{HashMap, HashSet};

/// A change to the selection, delivered to subscribers in mutation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent {
    /// A tile joined the selection.
    TileSelected { coord: Coord },
    /// A tile left the selection.
    TileDeselected { coord: Coord },
    /// The whole selection was emptied at once. Carries a snapshot of the
    /// removed tiles so subscribers can stop per-tile resources (sounding
    /// notes) keyed by them.
    SelectionCleared { cleared: Vec<Coord> },
}

/// Subscriber callback. Handlers run synchronously on the mutating thread.
type EventHandler = Box<dyn FnMut(&ModelEvent)>;

/// The selected-tile set, its subscribers, and the display-name cache.
pub struct SelectionModel {
    selected: HashSet<Coord>,
    mapper: PitchMapper,
    use_sharps: bool,
    /// Pitch-class names are pure in the coordinate and the enharmonic
    /// preference; cached here and dropped wholesale when the preference
    /// flips.
    name_cache: HashMap<Coord, &'static str>,
    subscribers: Vec<EventHandler>,
}

impl SelectionModel {
    pub fn new(mapper: PitchMapper, use_sharps: bool) -> Self {
        Self {
            selected: HashSet::new(),
            mapper,
            use_sharps,
            name_cache: HashMap::new(),
            subscribers: Vec::new(),
        }
    }

    /// Registers a handler for all future events. Handlers are invoked in
    /// subscription order.
    pub fn subscribe(&mut self, handler: impl FnMut(&ModelEvent) + 'static) {
        self.subscribers.push(Box::new(handler));
    }

    fn notify(&mut self, event: &ModelEvent) {
        for handler in &mut self.subscribers {
            handler(event);
        }
    }

    pub fn is_selected(&self, coord: Coord) -> bool {
        self.selected.contains(&coord)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// The current live set, cloned for callers that feed the simulation.
    pub fn selected(&self) -> HashSet<Coord> {
        self.selected.clone()
    }

    pub fn mapper(&self) -> &PitchMapper {
        &self.mapper
    }

    pub fn use_sharps(&self) -> bool {
        self.use_sharps
    }

    /// Flips the sharps/flats display preference, invalidating every cached
    /// name.
    pub fn set_enharmonic_preference(&mut self, use_sharps: bool) {
        if self.use_sharps != use_sharps {
            self.use_sharps = use_sharps;
            self.name_cache.clear();
        }
    }

    /// Flips membership of one tile, emitting `TileSelected` or
    /// `TileDeselected` accordingly.
    pub fn toggle(&mut self, coord: Coord) {
        if self.selected.remove(&coord) {
            self.notify(&ModelEvent::TileDeselected { coord });
        } else {
            self.selected.insert(coord);
            self.notify(&ModelEvent::TileSelected { coord });
        }
    }

    /// Empties the selection, emitting one `SelectionCleared` with a snapshot
    /// of the removed tiles. No-op (and no event) when already empty.
    pub fn clear(&mut self) {
        if self.selected.is_empty() {
            return;
        }
        let mut cleared: Vec<Coord> = self.selected.drain().collect();
        cleared.sort_unstable();
        self.notify(&ModelEvent::SelectionCleared { cleared });
    }

    /// Replaces the selection wholesale, emitting the symmetric difference.
    ///
    /// All deselections are notified before any selection, and internal state
    /// is fully updated before the first handler runs. Tiles present in both
    /// the old and new selection emit nothing.
    pub fn set_selection(&mut self, new_state: HashSet<Coord>) {
        let mut removed: Vec<Coord> = self.selected.difference(&new_state).copied().collect();
        let mut added: Vec<Coord> = new_state.difference(&self.selected).copied().collect();
        removed.sort_unstable();
        added.sort_unstable();

        self.selected = new_state;

        for coord in removed {
            self.notify(&ModelEvent::TileDeselected { coord });
        }
        for coord in added {
            self.notify(&ModelEvent::TileSelected { coord });
        }
    }

    /// Pitch-class name of a tile, cached per coordinate.
    pub fn pitch_class_name(&mut self, coord: Coord) -> &'static str {
        if let Some(name) = self.name_cache.get(&coord) {
            return name;
        }
        let name = self.mapper.pitch_class_name(coord, self.use_sharps);
        self.name_cache.insert(coord, name);
        name
    }

    /// Display label for a tile: the pitch class, with the derived octave
    /// digit appended only while the tile is selected.
    pub fn display_name(&mut self, coord: Coord) -> String {
        let name = self.pitch_class_name(coord);
        if self.is_selected(coord) {
            let (_, octave) = self.mapper.midi_note(coord);
            format!("{name}{octave}")
        } else {
            name.to_string()
        }
    }
}
