use crate::config::GlobeConfig;
use crate::engine::{Globe, GlobeFrame, GlobeOptions, LandMask};
use crate::events::{InputEvent, ResizeBus, Subscription};
use crate::hit_test::{hit_test, Bounds};
use crate::markers::Marker;
use crate::rotation::RotationController;
use crate::ui::screen_layout;
use ratatui::layout::{Position, Rect};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, info};

/// Pixels rotated per arrow-key press
const NUDGE_PIXELS: f64 = 20.0;

/// The marker currently under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    /// Index into the marker list
    pub marker: usize,
    /// Pointer cell the tooltip anchors to
    pub column: u16,
    pub row: u16,
}

/// Braille-pixel center of a terminal cell. Columns are 2 pixels wide,
/// rows 4 pixels tall.
#[inline]
fn cell_to_pixel(column: u16, row: u16) -> (f64, f64) {
    (column as f64 * 2.0 + 1.0, row as f64 * 4.0 + 2.0)
}

/// Globe surface in braille pixels, for hit-testing.
fn surface_bounds(rect: Rect) -> Bounds {
    Bounds {
        left: rect.x as f64 * 2.0,
        top: rect.y as f64 * 4.0,
        width: rect.width as f64 * 2.0,
        height: rect.height as f64 * 4.0,
    }
}

/// Resources held while the globe is mounted: the renderer and the resize
/// listener. Dropping it destroys the renderer and deregisters the listener.
struct GlobeComponent {
    globe: Globe,
    _resize: Subscription,
}

impl Drop for GlobeComponent {
    fn drop(&mut self) {
        self.globe.destroy();
        info!("globe unmounted");
    }
}

/// Application state
pub struct App {
    config: GlobeConfig,
    /// Fixed for the lifetime of the mounted globe
    markers: Rc<[Marker]>,
    /// Shared with the renderer's frame callback
    rotation: Rc<RefCell<RotationController>>,
    /// On-screen globe surface; `None` while the terminal is too small
    surface: Rc<Cell<Option<Rect>>>,
    component: Option<GlobeComponent>,
    resize_bus: ResizeBus,
    highlight: Option<Highlight>,
    /// Last pointer cell, for the status bar
    cursor: Option<(u16, u16)>,
    pub should_quit: bool,
}

impl App {
    /// Mount the globe for a terminal of `width` x `height` cells.
    pub fn new(config: GlobeConfig, land: &LandMask, width: u16, height: u16) -> Self {
        let markers: Rc<[Marker]> = config.markers.clone().into();
        let rotation = Rc::new(RefCell::new(RotationController::new(config.phi, &config.controls)));
        let surface = Rc::new(Cell::new(None));
        let resize_bus = ResizeBus::new();

        let listener_surface = surface.clone();
        let subscription = resize_bus.subscribe(move |w, h| apply_resize(&listener_surface, w, h));
        apply_resize(&surface, width, height);

        let frame_rotation = rotation.clone();
        let frame_surface = surface.clone();
        let ratio = config.device_pixel_ratio.max(1);
        let globe = Globe::create(
            GlobeOptions::from_config(&config),
            land,
            Box::new(move |state| {
                state.phi = frame_rotation.borrow_mut().advance_frame();
                let logical = frame_surface.get().map_or(0, |r: Rect| r.width as usize * 2);
                state.width = logical * ratio;
                state.height = logical * ratio;
            }),
        );

        info!(width, height, markers = markers.len(), "globe mounted");

        Self {
            config,
            markers,
            rotation,
            surface,
            component: Some(GlobeComponent { globe, _resize: subscription }),
            resize_bus,
            highlight: None,
            cursor: None,
            should_quit: false,
        }
    }

    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn surface(&self) -> Option<Rect> {
        self.surface.get()
    }

    pub fn highlight(&self) -> Option<Highlight> {
        self.highlight
    }

    pub fn highlighted_marker(&self) -> Option<(&Marker, u16, u16)> {
        self.highlight
            .and_then(|h| self.markers.get(h.marker).map(|m| (m, h.column, h.row)))
    }

    pub fn rotation_angle(&self) -> f64 {
        self.rotation.borrow().angle()
    }

    pub fn is_dragging(&self) -> bool {
        self.rotation.borrow().is_dragging()
    }

    pub fn is_mounted(&self) -> bool {
        self.component.is_some()
    }

    /// Route one input event.
    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { column, row } => self.pointer_down(column, row),
            InputEvent::PointerMove { column, row } => self.pointer_move(column, row),
            InputEvent::PointerUp => self.rotation.borrow_mut().release(),
            InputEvent::TouchMove { column } => self.touch_move(column),
            InputEvent::Resize { width, height } => self.resize(width, height),
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        let before = self.surface.get();
        self.resize_bus.emit(width, height);
        // The tooltip is anchored to a cell of the old layout
        if self.surface.get() != before {
            self.set_highlight(None);
        }
    }

    fn pointer_down(&mut self, column: u16, row: u16) {
        self.cursor = Some((column, row));
        let Some(rect) = self.surface.get() else {
            return;
        };
        if !rect.contains(Position::new(column, row)) {
            return;
        }
        let (x, _) = cell_to_pixel(column, row);
        self.rotation.borrow_mut().pointer_down(x);
        self.set_highlight(None);
    }

    fn pointer_move(&mut self, column: u16, row: u16) {
        self.cursor = Some((column, row));
        let Some(rect) = self.surface.get() else {
            return;
        };

        if !rect.contains(Position::new(column, row)) {
            // Pointer left the surface: drop any drag and the tooltip
            self.rotation.borrow_mut().release();
            self.set_highlight(None);
            return;
        }

        let (x, _) = cell_to_pixel(column, row);
        let dragged = self.rotation.borrow_mut().drag_to(x);
        if !dragged {
            self.check_marker_hover(rect, column, row);
        }
    }

    fn touch_move(&mut self, column: u16) {
        if self.surface.get().is_none() {
            return;
        }
        let (x, _) = cell_to_pixel(column, 0);
        self.rotation.borrow_mut().touch_move(x);
    }

    fn check_marker_hover(&mut self, rect: Rect, column: u16, row: u16) {
        let (x, y) = cell_to_pixel(column, row);
        let angle = self.rotation.borrow().angle();
        let hit = hit_test(
            &self.markers,
            &surface_bounds(rect),
            x,
            y,
            angle,
            self.config.controls.hover_threshold,
        );
        self.set_highlight(hit.map(|hit| Highlight { marker: hit.index, column, row }));
    }

    fn set_highlight(&mut self, highlight: Option<Highlight>) {
        let before = self.highlight.map(|h| h.marker);
        let after = highlight.map(|h| h.marker);
        if before != after {
            match after.and_then(|i| self.markers.get(i)) {
                Some(marker) => debug!(marker = %marker.name, "hover"),
                None => debug!("hover cleared"),
            }
        }
        self.highlight = highlight;
    }

    /// Let the renderer draw a frame; this is where the idle spin advances.
    pub fn render_frame(&mut self) {
        if let Some(component) = self.component.as_mut() {
            component.globe.render();
        }
    }

    pub fn frame(&self) -> Option<&GlobeFrame> {
        self.component.as_ref().and_then(|c| c.globe.frame())
    }

    /// Geographic position under the pointer in the last rendered frame.
    pub fn cursor_lonlat(&self) -> Option<(f64, f64)> {
        let (column, row) = self.cursor?;
        let rect = self.surface.get()?;
        if !rect.contains(Position::new(column, row)) {
            return None;
        }
        let (x, y) = cell_to_pixel(column - rect.x, row - rect.y);
        self.frame()?.view.unproject(x, y)
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Back to the configured starting orientation.
    pub fn reset_rotation(&mut self) {
        self.rotation.borrow_mut().reset(self.config.phi);
        self.set_highlight(None);
    }

    pub fn nudge_left(&mut self) {
        self.rotation.borrow_mut().nudge(-NUDGE_PIXELS);
    }

    pub fn nudge_right(&mut self) {
        self.rotation.borrow_mut().nudge(NUDGE_PIXELS);
    }

    pub fn toggle_dark(&mut self) {
        self.config.dark = if self.config.is_dark() { 0.0 } else { 1.0 };
        if let Some(component) = self.component.as_mut() {
            component.globe.set_dark(self.config.dark);
        }
    }

    /// Tear down the globe: destroy the renderer and stop listening for resizes.
    pub fn unmount(&mut self) {
        self.component = None;
        self.highlight = None;
    }

    /// Test helper: orient the globe so marker `index` sits under a pointer
    /// to the right of the disc center, and return that pointer cell.
    #[cfg(test)]
    pub(crate) fn aim_at_marker(&mut self, index: usize) -> (u16, u16) {
        let marker = self.markers[index].clone();
        let rect = self.surface.get().expect("surface attached");
        let bounds = surface_bounds(rect);
        let (cx, cy) = bounds.center();

        self.rotation.borrow_mut().reset((marker.lon() + 180.0).to_radians());

        let distance = (90.0 - marker.lat()) / 90.0;
        let x = cx + distance * bounds.width / 2.0;
        let column = ((x - 1.0) / 2.0).round() as u16;
        let row = ((cy - 2.0) / 4.0).round() as u16;
        (column, row)
    }
}

/// Recompute the globe surface for a new terminal size.
fn apply_resize(surface: &Cell<Option<Rect>>, width: u16, height: u16) {
    let globe = screen_layout(Rect::new(0, 0, width, height)).globe;
    surface.set(globe);
    debug!(width, height, ?globe, "resize");
}
