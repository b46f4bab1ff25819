//! Application state and event handling.
//!
//! The `App` wires the selection model, viewport, life clock, and sound
//! router together and translates raw pointer/keyboard input into model and
//! viewport calls. It owns all mutable session state; nothing here touches
//! the terminal directly.

use crate::audio::{AudioEngine, SoundRouter};
use crate::config::Config;
use crate::grid::{
    bresenham_line, next_generation, Coord, LifeClock, RenderMode, SelectionModel, Viewport,
};
use crate::music::{PitchMapper, TuningSystem};
use anyhow::{Context, Result};
use ratatui::layout::Rect;
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// How long a status message stays visible.
const STATUS_TTL: Duration = Duration::from_secs(4);

/// What the current pointer drag, if any, is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DragMode {
    #[default]
    None,
    Select,
    Pan,
}

/// The main application state.
pub struct App {
    pub config: Config,
    model: SelectionModel,
    viewport: Viewport,
    clock: LifeClock,
    router: Option<Rc<RefCell<SoundRouter<AudioEngine>>>>,
    tuning_index: usize,

    /// Screen region the grid was last rendered into; pointer coordinates
    /// are translated into this region before hitting the viewport.
    grid_area: Rect,

    drag_mode: DragMode,
    drag_start: (u16, u16),
    drag_last: (u16, u16),
    drag_last_coord: Option<Coord>,
    /// Cells already toggled during the current drag gesture; each cell is
    /// toggled at most once per gesture.
    drag_affected: HashSet<Coord>,

    status: Option<(String, Instant)>,
    pub show_help: bool,
    pub should_quit: bool,
}

impl App {
    /// Builds the session from the configuration.
    ///
    /// Parsing the origin note happens here, once; a bad origin is fatal.
    /// A missing or unloadable SoundFont is not: the app runs silent.
    pub fn new(config: Config, soundfont: Option<PathBuf>, width: u16, height: u16) -> Result<Self> {
        let mapper =
            PitchMapper::from_config(&config.music).context("Invalid music configuration")?;
        let mut model = SelectionModel::new(mapper, config.music.use_sharps);

        let router = match soundfont {
            Some(path) => match AudioEngine::new(&path) {
                Ok(engine) => {
                    let router = Rc::new(RefCell::new(SoundRouter::new(
                        engine,
                        mapper,
                        crate::music::EQUAL_TEMPERAMENT,
                        config.midi.velocity,
                    )));
                    let subscriber = Rc::clone(&router);
                    model.subscribe(move |event| subscriber.borrow_mut().handle_event(event));
                    Some(router)
                }
                Err(e) => {
                    tracing::warn!("audio disabled: {e:#}");
                    None
                }
            },
            None => None,
        };

        let viewport = Viewport::new(
            width,
            height,
            config.view.initial_tiles_on_screen,
            RenderMode::default(),
        );
        let clock = LifeClock::new(Duration::from_millis(config.life.tick_interval_ms));

        Ok(Self {
            config,
            model,
            viewport,
            clock,
            router,
            tuning_index: 0,
            grid_area: Rect::new(0, 0, width, height),
            drag_mode: DragMode::None,
            drag_start: (0, 0),
            drag_last: (0, 0),
            drag_last_coord: None,
            drag_affected: HashSet::new(),
            status: None,
            show_help: false,
            should_quit: false,
        })
    }

    pub fn model(&mut self) -> &mut SelectionModel {
        &mut self.model
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Split borrow for the renderer: it reads the viewport and writes the
    /// model's name cache in the same pass.
    pub fn grid_parts(&mut self) -> (&Viewport, &mut SelectionModel) {
        (&self.viewport, &mut self.model)
    }

    pub fn selection_count(&self) -> usize {
        self.model.len()
    }

    pub fn use_sharps(&self) -> bool {
        self.model.use_sharps()
    }

    pub fn audio_enabled(&self) -> bool {
        self.router.is_some()
    }

    pub fn life_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn life_interval(&self) -> Duration {
        self.clock.interval()
    }

    pub fn tuning(&self) -> &'static TuningSystem {
        &TuningSystem::all()[self.tuning_index]
    }

    // --- per-frame bookkeeping -------------------------------------------

    /// Records where the grid is being drawn and refreshes zoom limits when
    /// the region size changed. Called by the renderer each frame.
    pub fn set_grid_area(&mut self, area: Rect) {
        if area.width != self.grid_area.width || area.height != self.grid_area.height {
            self.viewport.update_zoom_limits(
                area.width,
                area.height,
                self.config.view.min_tiles_on_screen,
                self.config.view.max_tiles_on_screen,
            );
        }
        self.grid_area = area;
    }

    /// Drives the life clock and expires old status messages. Called once
    /// per event-loop iteration.
    pub fn update(&mut self, now: Instant) {
        if self.clock.tick_due(now) {
            self.advance_generation();
        }
        if let Some((_, shown_at)) = self.status {
            if now.duration_since(shown_at) > STATUS_TTL {
                self.status = None;
            }
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some((message.into(), Instant::now()));
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().map(|(m, _)| m.as_str())
    }

    // --- pointer input ---------------------------------------------------

    /// Converts global terminal coordinates to grid-local pixel space.
    /// Returns None when the pointer is outside the grid region.
    fn to_grid_pixel(&self, column: u16, row: u16) -> Option<(f64, f64)> {
        if column < self.grid_area.x
            || row < self.grid_area.y
            || column >= self.grid_area.x + self.grid_area.width
            || row >= self.grid_area.y + self.grid_area.height
        {
            return None;
        }
        Some((
            f64::from(column - self.grid_area.x),
            f64::from(row - self.grid_area.y),
        ))
    }

    /// Left button press: begin a select gesture.
    pub fn on_select_press(&mut self, column: u16, row: u16) {
        let Some((x, y)) = self.to_grid_pixel(column, row) else {
            return;
        };
        self.drag_mode = DragMode::Select;
        self.drag_start = (column, row);
        self.drag_affected.clear();
        self.drag_last_coord = Some(self.viewport.screen_to_world_int(x, y));
    }

    /// Right button press: begin a pan gesture.
    pub fn on_pan_press(&mut self, column: u16, row: u16) {
        self.drag_mode = DragMode::Pan;
        self.drag_start = (column, row);
        self.drag_last = (column, row);
    }

    /// Pointer moved with a button held.
    pub fn on_drag(&mut self, column: u16, row: u16) {
        match self.drag_mode {
            DragMode::Pan => {
                let dx = f64::from(column) - f64::from(self.drag_last.0);
                let dy = f64::from(row) - f64::from(self.drag_last.1);
                self.drag_last = (column, row);
                self.viewport.pan(dx, dy);
            }
            DragMode::Select => {
                let Some((x, y)) = self.to_grid_pixel(column, row) else {
                    return;
                };
                let Some(last) = self.drag_last_coord else {
                    return;
                };
                let current = self.viewport.screen_to_world_int(x, y);
                if current == last {
                    return;
                }
                // Toggle every cell on the pointer's path, once per gesture,
                // even when motion events skip cells.
                for coord in bresenham_line(last, current) {
                    if self.drag_affected.insert(coord) {
                        self.model.toggle(coord);
                    }
                }
                self.drag_last_coord = Some(current);
            }
            DragMode::None => {}
        }
    }

    /// Button released: a short gesture counts as a click.
    pub fn on_release(&mut self, column: u16, row: u16) {
        let dx = i64::from(column) - i64::from(self.drag_start.0);
        let dy = i64::from(row) - i64::from(self.drag_start.1);
        let is_click = dx * dx + dy * dy < self.config.interaction.click_vs_drag_threshold_sq;

        if self.drag_mode == DragMode::Select && is_click && self.drag_affected.is_empty() {
            if let Some((x, y)) = self.to_grid_pixel(column, row) {
                let coord = self.viewport.screen_to_world_int(x, y);
                self.model.toggle(coord);
            }
        }

        self.drag_mode = DragMode::None;
        self.drag_last_coord = None;
        self.drag_affected.clear();
    }

    /// Scroll wheel zoom anchored at the pointer.
    pub fn on_scroll(&mut self, column: u16, row: u16, zoom_in: bool) {
        let Some((x, y)) = self.to_grid_pixel(column, row) else {
            return;
        };
        let factor = self.config.interaction.zoom_factor;
        let scale = if zoom_in { factor } else { 1.0 / factor };
        // zoom_at reports whether anything changed; the next frame redraws
        // regardless, so the flag is only informative here.
        self.viewport.zoom_at(scale, x, y);
    }

    /// Keyboard pan, one tile-ish step per press.
    pub fn pan_by_key(&mut self, dx: f64, dy: f64) {
        let step = self.viewport.zoom().max(1.0);
        self.viewport.pan(dx * step, dy * step);
    }

    /// Keyboard zoom anchored at the grid center.
    pub fn zoom_by_key(&mut self, zoom_in: bool) {
        let cx = f64::from(self.grid_area.width) / 2.0;
        let cy = f64::from(self.grid_area.height) / 2.0;
        let factor = self.config.interaction.zoom_factor;
        let scale = if zoom_in { factor } else { 1.0 / factor };
        self.viewport.zoom_at(scale, cx, cy);
    }

    // --- commands --------------------------------------------------------

    /// Switches between the rectangular and hexagonal tilings.
    pub fn toggle_render_mode(&mut self) {
        let mode = match self.viewport.mode() {
            RenderMode::Rectangle => RenderMode::Hexagon,
            RenderMode::Hexagon => RenderMode::Rectangle,
        };
        self.viewport.set_mode(mode);
        self.set_status(format!("Tiling: {}", mode.label()));
    }

    /// Flips between sharp and flat note spellings.
    pub fn toggle_enharmonics(&mut self) {
        let use_sharps = !self.model.use_sharps();
        self.model.set_enharmonic_preference(use_sharps);
        self.set_status(if use_sharps {
            "Showing sharps"
        } else {
            "Showing flats"
        });
    }

    /// Cycles through the built-in tuning systems.
    pub fn cycle_tuning(&mut self) {
        self.tuning_index = (self.tuning_index + 1) % TuningSystem::all().len();
        let tuning = *self.tuning();
        if let Some(router) = &self.router {
            router.borrow_mut().set_tuning(tuning);
        }
        self.set_status(format!("Tuning: {}", tuning.name));
    }

    /// Clears the selection (stopping all sounding notes via the event bus).
    pub fn clear_selection(&mut self) {
        self.model.clear();
    }

    /// Clears everything and restores the initial view.
    pub fn clear_and_reset(&mut self) {
        self.model.clear();
        self.model
            .set_enharmonic_preference(self.config.music.use_sharps);
        let mode = self.viewport.mode();
        self.viewport = Viewport::new(
            self.grid_area.width,
            self.grid_area.height,
            self.config.view.initial_tiles_on_screen,
            mode,
        );
        self.viewport.update_zoom_limits(
            self.grid_area.width,
            self.grid_area.height,
            self.config.view.min_tiles_on_screen,
            self.config.view.max_tiles_on_screen,
        );
        self.set_status("Cleared and reset view");
    }

    // --- Game of Life ----------------------------------------------------

    /// Starts or stops the simulation loop.
    pub fn life_toggle(&mut self) {
        if self.clock.is_running() {
            self.clock.stop();
            self.set_status("Life stopped");
        } else {
            self.clock.start(Instant::now());
            self.set_status("Life running");
        }
    }

    /// Advances one generation, only while the loop is stopped.
    pub fn life_step(&mut self) {
        if self.clock.can_step() {
            self.advance_generation();
            self.set_status("Life stepped");
        }
    }

    /// Scales the tick interval up or down by 25%.
    pub fn life_adjust_interval(&mut self, faster: bool) {
        let current = self.clock.interval();
        let next = if faster {
            current.mul_f64(0.8)
        } else {
            current.mul_f64(1.25)
        };
        self.clock.set_interval(next);
        self.set_status(format!(
            "Life interval: {} ms",
            self.clock.interval().as_millis()
        ));
    }

    /// One Conway generation, pushed back through the selection model so
    /// subscribers hear births and deaths like any other edit.
    fn advance_generation(&mut self) {
        let live = self.model.selected();
        self.model.set_selection(next_generation(&live));
    }
}
