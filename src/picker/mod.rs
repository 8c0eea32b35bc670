// src/picker/mod.rs
//! Image color picker: sample colors from an uploaded picture with draggable
//! swatches, a magnifier that follows the drag, and a palette of the results.
//!
//! [`ColorPicker`] holds all state and is free of DOM types. The Yew panel in
//! `view.rs` feeds it pointer positions and frame callbacks and renders what
//! it reports.

pub mod canvas;
pub mod color;
pub mod frame;
pub mod geometry;
pub mod listeners;
pub mod palette;
pub mod sampler;
pub mod swatch;
pub mod upload;
pub mod view;
pub mod zoom;

use std::rc::Rc;

use crate::config::PickerSettings;
use color::Rgb;
use frame::{FrameScheduler, FrameToken};
use geometry::{clamp_box, Point, Size};
use palette::{CopyFeedback, PaletteEntry};
use sampler::{BitmapError, ImageSource, LoadTicket, Sampler};
use swatch::{ColorMode, SwatchId, SwatchSet};
use zoom::{ZoomFrame, ZoomPreview, ZoomTarget};

/// Where the swatches go when an image loads, as fractions of the container.
/// Order: top-left, top-right, bottom-left, bottom-right.
pub const DEFAULT_SWATCHES: [(f64, f64); 4] = [(0.2, 0.2), (0.8, 0.2), (0.2, 0.8), (0.8, 0.8)];

#[derive(Debug, Clone, PartialEq)]
pub enum PickerEvent {
    DragStarted(SwatchId),
    ColorChanged { id: SwatchId, color: Rgb },
    DragEnded(SwatchId),
    Removed(SwatchId),
}

struct DragSession<H> {
    swatch: SwatchId,
    /// Pointer minus marker top-left at pointer-down.
    grab: Point,
    /// Latest pointer position not yet committed.
    pending: Option<Point>,
    token: FrameToken<H>,
}

pub struct ColorPicker<S: FrameScheduler> {
    settings: PickerSettings,
    container: Size,
    sampler: Sampler,
    swatches: SwatchSet,
    drag: Option<DragSession<S::Handle>>,
    scheduler: S,
    zoom: ZoomPreview,
    copy: CopyFeedback,
}

impl<S: FrameScheduler> ColorPicker<S> {
    pub fn new(scheduler: S, settings: PickerSettings) -> Self {
        Self {
            settings: settings.normalized(),
            container: Size::default(),
            sampler: Sampler::new(),
            swatches: SwatchSet::new(),
            drag: None,
            scheduler,
            zoom: ZoomPreview::new(),
            copy: CopyFeedback::default(),
        }
    }

    pub fn settings(&self) -> &PickerSettings {
        &self.settings
    }

    pub fn container(&self) -> Size {
        self.container
    }

    pub fn swatches(&self) -> &SwatchSet {
        &self.swatches
    }

    pub fn palette(&self) -> Vec<PaletteEntry> {
        palette::project(&self.swatches)
    }

    pub fn zoom(&self) -> &ZoomPreview {
        &self.zoom
    }

    pub fn has_image(&self) -> bool {
        self.sampler.is_ready()
    }

    pub fn is_loading(&self) -> bool {
        self.sampler.is_loading()
    }

    pub fn natural_size(&self) -> Option<(u32, u32)> {
        self.sampler.natural_size()
    }

    pub fn dragging(&self) -> Option<SwatchId> {
        self.drag.as_ref().map(|d| d.swatch)
    }

    pub fn copy_feedback(&self) -> &CopyFeedback {
        &self.copy
    }

    pub fn copy_feedback_mut(&mut self) -> &mut CopyFeedback {
        &mut self.copy
    }

    /// Applies new settings; markers are re-clamped if the diameter changed.
    pub fn set_settings(&mut self, settings: PickerSettings) -> Vec<PickerEvent> {
        self.settings = settings.normalized();
        self.reflow()
    }

    /// The displayed image size. Markers are re-clamped and sampled swatches
    /// re-read their pixel, since the same point now maps elsewhere.
    pub fn set_container(&mut self, size: Size) -> Vec<PickerEvent> {
        if size == self.container {
            return Vec::new();
        }
        self.container = size;
        self.reflow()
    }

    fn reflow(&mut self) -> Vec<PickerEvent> {
        let diameter = self.settings.swatch_diameter;
        let container = self.container;
        let mut events = Vec::new();
        for s in self.swatches.iter_mut() {
            s.position = clamp_box(s.position, diameter, container);
            if s.mode != ColorMode::Sampled {
                continue;
            }
            if let Some(color) = self.sampler.sample(s.center(diameter), container) {
                if color != s.color {
                    s.color = color;
                    events.push(PickerEvent::ColorChanged { id: s.id, color });
                }
            }
        }
        events
    }

    /// Starts replacing the image. The old pixels are gone from here on, and
    /// any drag in progress is abandoned.
    pub fn begin_image_load(&mut self) -> LoadTicket {
        self.abandon_drag();
        self.sampler.begin_load()
    }

    /// Installs a decoded image displayed at `container` and resets the
    /// swatches to the default corners. A superseded ticket changes nothing;
    /// a rasterization failure leaves the container and swatches as they were.
    pub fn finish_image_load(
        &mut self,
        ticket: LoadTicket,
        source: Rc<dyn ImageSource>,
        container: Size,
    ) -> Result<Vec<PickerEvent>, BitmapError> {
        if !self.sampler.finish_load(ticket, source) {
            return Ok(Vec::new());
        }
        self.sampler.bitmap()?;
        self.container = container;

        let mut events: Vec<PickerEvent> = self
            .swatches
            .iter()
            .map(|s| PickerEvent::Removed(s.id))
            .collect();
        self.swatches.clear();
        self.copy = CopyFeedback::default();

        for (fx, fy) in DEFAULT_SWATCHES {
            if let Some(id) = self.add_swatch_at(self.container.at_fraction(fx, fy)) {
                let color = self.swatches.get(id).map(|s| s.color).unwrap_or_default();
                events.push(PickerEvent::ColorChanged { id, color });
            }
        }
        Ok(events)
    }

    pub fn fail_image_load(&mut self, ticket: LoadTicket) {
        self.sampler.fail_load(ticket);
    }

    /// Drops the image and every swatch.
    pub fn clear(&mut self) -> Vec<PickerEvent> {
        self.abandon_drag();
        self.sampler.clear();
        self.copy = CopyFeedback::default();
        let events = self
            .swatches
            .iter()
            .map(|s| PickerEvent::Removed(s.id))
            .collect();
        self.swatches.clear();
        events
    }

    /// Adds a swatch centered on `center` (e.g. a click on the image).
    /// Needs a loaded image.
    pub fn add_swatch_at(&mut self, center: Point) -> Option<SwatchId> {
        if !self.sampler.is_ready() || !center.is_finite() {
            return None;
        }
        let diameter = self.settings.swatch_diameter;
        let radius = diameter / 2.0;
        let position = clamp_box(center.offset(-radius, -radius), diameter, self.container);
        let color = self
            .sampler
            .sample(position.offset(radius, radius), self.container)
            .unwrap_or(Rgb::NEUTRAL);
        Some(self.swatches.insert(position, color))
    }

    /// Pointer went down on a marker.
    pub fn pointer_down(&mut self, id: SwatchId, pointer: Point) -> Option<PickerEvent> {
        let swatch = self.swatches.get(id)?;
        let grab = if pointer.is_finite() {
            pointer.minus(swatch.position)
        } else {
            Point::default()
        };
        // a second pointer-down replaces the session and cancels its frame
        self.drag = Some(DragSession {
            swatch: id,
            grab,
            pending: None,
            token: FrameToken::default(),
        });
        Some(PickerEvent::DragStarted(id))
    }

    /// Records the newest pointer position and (re)schedules one frame for it.
    /// Returns `false` when no drag is active.
    pub fn pointer_move(&mut self, pointer: Point) -> bool {
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        if !pointer.is_finite() {
            return true;
        }
        drag.pending = Some(pointer);
        drag.token.replace(&mut self.scheduler, drag.swatch);
        true
    }

    /// Frame callback: commits the latest pending move of `id`.
    pub fn run_frame(&mut self, id: SwatchId) -> Vec<PickerEvent> {
        let pending = match self.drag.as_mut() {
            Some(drag) if drag.swatch == id => {
                drag.token.fired();
                drag.pending.take().map(|pointer| (drag.grab, pointer))
            }
            _ => None,
        };
        match pending {
            Some((grab, pointer)) => self.commit(id, grab, pointer).into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// Pointer released. A move still waiting for its frame is committed now
    /// so the marker ends exactly where the pointer left it.
    pub fn pointer_up(&mut self) -> Vec<PickerEvent> {
        let Some(drag) = self.drag.take() else {
            return Vec::new();
        };
        let (id, grab, pending) = (drag.swatch, drag.grab, drag.pending);
        drop(drag);

        let mut events: Vec<PickerEvent> = pending
            .and_then(|pointer| self.commit(id, grab, pointer))
            .into_iter()
            .collect();
        self.zoom.hide();
        events.push(PickerEvent::DragEnded(id));
        events
    }

    fn commit(&mut self, id: SwatchId, grab: Point, pointer: Point) -> Option<PickerEvent> {
        let diameter = self.settings.swatch_diameter;
        let position = clamp_box(pointer.minus(grab), diameter, self.container);
        let sample = position.offset(diameter / 2.0, diameter / 2.0);
        let sampled = self.sampler.sample(sample, self.container);

        let swatch = self.swatches.get_mut(id)?;
        swatch.position = position;
        swatch.mode = ColorMode::Sampled;
        let changed = match sampled {
            Some(color) if color != swatch.color => {
                swatch.color = color;
                true
            }
            _ => false,
        };
        let color = swatch.color;

        self.zoom.update(ZoomTarget {
            swatch: id,
            marker: position,
            sample,
        });
        changed.then_some(PickerEvent::ColorChanged { id, color })
    }

    /// Ends any drag without committing pending work. Used on unmount and
    /// when the image changes underneath the drag.
    pub fn abandon_drag(&mut self) {
        self.drag = None;
        self.zoom.hide();
    }

    /// Manual color override. The marker does not move.
    pub fn set_manual_color(&mut self, id: SwatchId, color: Rgb) -> Option<PickerEvent> {
        let swatch = self.swatches.get_mut(id)?;
        swatch.color = color;
        swatch.mode = ColorMode::Manual;
        Some(PickerEvent::ColorChanged { id, color })
    }

    /// Removes the swatch, its palette entry, its copy feedback and any frame
    /// work still scheduled for it.
    pub fn remove(&mut self, id: SwatchId) -> Option<PickerEvent> {
        if self.dragging() == Some(id) {
            self.abandon_drag();
        }
        self.copy.forget(id);
        self.swatches.remove(id).map(|s| PickerEvent::Removed(s.id))
    }

    /// Pixels for the magnifier, if it is showing.
    pub fn zoom_frame(&mut self) -> Option<ZoomFrame> {
        if !self.zoom.is_visible() {
            return None;
        }
        let bitmap = self.sampler.bitmap().ok().flatten()?;
        self.zoom.frame(
            &bitmap,
            self.container,
            self.container,
            self.settings.swatch_diameter,
            self.settings.preview_size,
            self.settings.zoom,
        )
    }
}
