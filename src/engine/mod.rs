//! Dotted-globe renderer.
//!
//! The rest of the crate only uses the lifecycle: [`Globe::create`] with a
//! per-frame callback, [`Globe::render`] once per frame, and
//! [`Globe::destroy`] (also run on drop). The callback receives a mutable
//! [`FrameState`] and writes the rotation and surface size for that frame.

mod geometry;
pub mod land;
mod samples;
mod view;

pub use land::LandMask;
pub use view::GlobeView;

use crate::braille::BrailleCanvas;
use crate::config::{GlobeConfig, Rgb};
use geometry::{draw_circle, draw_ring};
use glam::DVec3;
use tracing::{debug, info};

/// Per-frame values the callback may overwrite before rasterizing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    pub phi: f64,
    pub theta: f64,
    /// Device pixels (logical size × device pixel ratio)
    pub width: usize,
    pub height: usize,
}

pub type OnRender = Box<dyn FnMut(&mut FrameState)>;

/// A marker as the renderer sees it: where and how big.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerSpot {
    /// `[latitude, longitude]` in degrees
    pub location: [f64; 2],
    pub size: f64,
}

/// Renderer configuration record.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobeOptions {
    pub width: usize,
    pub height: usize,
    pub device_pixel_ratio: usize,
    pub phi: f64,
    pub theta: f64,
    pub dark: f32,
    pub diffuse: f32,
    pub map_samples: usize,
    pub map_brightness: f32,
    pub base_color: Rgb,
    pub marker_color: Rgb,
    pub glow_color: Rgb,
    pub markers: Vec<MarkerSpot>,
}

impl GlobeOptions {
    pub fn from_config(config: &GlobeConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            device_pixel_ratio: config.device_pixel_ratio.max(1),
            phi: config.phi,
            theta: config.theta,
            dark: config.dark,
            diffuse: config.diffuse,
            map_samples: config.map_samples,
            map_brightness: config.map_brightness,
            base_color: config.base_color,
            marker_color: config.marker_color,
            glow_color: config.glow_color,
            markers: config
                .markers
                .iter()
                .map(|m| MarkerSpot { location: m.location, size: m.size })
                .collect(),
        }
    }
}

/// Dot brightness bands, darkest first.
pub const SHADE_LEVELS: usize = 3;

/// One rasterized frame, split into layers the UI colors separately.
pub struct GlobeFrame {
    pub state: FrameState,
    /// Land dots by brightness band
    pub dots: [BrailleCanvas; SHADE_LEVELS],
    pub markers: BrailleCanvas,
    pub glow: BrailleCanvas,
    /// Orientation used for this frame, in canvas pixel coordinates
    pub view: GlobeView,
    pub dark: bool,
}

impl GlobeFrame {
    /// Canvas size in character cells
    pub fn cells(&self) -> (usize, usize) {
        (self.glow.width(), self.glow.height())
    }
}

/// Handle to a live renderer.
pub struct Globe {
    options: GlobeOptions,
    samples: Vec<DVec3>,
    on_render: Option<OnRender>,
    frame: Option<GlobeFrame>,
    frames_rendered: u64,
    destroyed: bool,
}

impl Globe {
    /// Initialize the renderer: sample the sphere and keep the callback.
    pub fn create(options: GlobeOptions, land: &LandMask, on_render: OnRender) -> Self {
        let samples = samples::land_samples(options.map_samples, land);
        info!(
            samples = options.map_samples,
            land_dots = samples.len(),
            markers = options.markers.len(),
            "globe created"
        );
        Self {
            options,
            samples,
            on_render: Some(on_render),
            frame: None,
            frames_rendered: 0,
            destroyed: false,
        }
    }

    pub fn land_dots(&self) -> usize {
        self.samples.len()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn set_dark(&mut self, dark: f32) {
        self.options.dark = dark;
    }

    /// Most recently rendered frame.
    pub fn frame(&self) -> Option<&GlobeFrame> {
        self.frame.as_ref()
    }

    /// Run the callback and rasterize. Does nothing once destroyed.
    pub fn render(&mut self) -> Option<&GlobeFrame> {
        let on_render = self.on_render.as_mut()?;

        let mut state = FrameState {
            phi: self.options.phi,
            theta: self.options.theta,
            width: self.options.width,
            height: self.options.height,
        };
        on_render(&mut state);

        self.frame = Some(rasterize(&self.options, &self.samples, state));
        self.frames_rendered += 1;
        self.frame.as_ref()
    }

    /// Release the callback, samples and frame buffers. Safe to call twice;
    /// only the first call does anything.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.on_render = None;
        self.frame = None;
        self.samples = Vec::new();
        info!(frames = self.frames_rendered, "globe destroyed");
    }
}

impl Drop for Globe {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Brightness band for a dot at the given depth (1 = facing the camera).
#[inline]
fn shade_level(depth: f64, diffuse: f32, brightness: f32) -> usize {
    let lit = (1.0 - diffuse as f64) + diffuse as f64 * depth;
    let value = lit * brightness as f64;
    if value < 0.55 {
        0
    } else if value < 0.9 {
        1
    } else {
        2
    }
}

fn rasterize(options: &GlobeOptions, samples: &[DVec3], state: FrameState) -> GlobeFrame {
    let ratio = options.device_pixel_ratio.max(1);
    // Square surface in braille pixels; cells are 2 wide and 4 tall
    let side = (state.width.min(state.height) / ratio) / 4 * 4;
    let (cols, rows) = (side / 2, side / 4);

    // Leave one pixel for the glow rim
    let radius = (side as f64 / 2.0 - 1.5).max(0.0);
    let view = GlobeView::from_angles(state.phi, state.theta, radius, side, side);

    let mut dots: [BrailleCanvas; SHADE_LEVELS] =
        std::array::from_fn(|_| BrailleCanvas::new(cols, rows));
    let mut markers = BrailleCanvas::new(cols, rows);
    let mut glow = BrailleCanvas::new(cols, rows);

    if side > 0 {
        for &p in samples {
            if let Some((x, y, depth)) = view.project_vec(p) {
                let level = shade_level(depth, options.diffuse, options.map_brightness);
                dots[level].set_pixel_signed(x, y);
            }
        }

        for spot in &options.markers {
            let [lat, lon] = spot.location;
            if let Some((x, y)) = view.project(lon, lat) {
                let r = (spot.size * radius * 0.5).round().max(1.0) as i32;
                draw_circle(&mut markers, x, y, r);
            }
        }

        let c = (side / 2) as i32;
        draw_ring(&mut glow, c, c, radius.round() as i32 + 1);
    }

    debug!(phi = state.phi, side, "frame rasterized");

    GlobeFrame {
        state,
        dots,
        markers,
        glow,
        view,
        dark: options.dark >= 0.5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn options() -> GlobeOptions {
        let mut options = GlobeOptions::from_config(&GlobeConfig::default());
        options.map_samples = 4000;
        options.width = 160;
        options.height = 160;
        options
    }

    #[test]
    fn test_callback_drives_each_frame() {
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let mut globe = Globe::create(
            options(),
            &LandMask::builtin(),
            Box::new(move |state| {
                seen.set(seen.get() + 1);
                state.phi = 1.25;
                state.width = 96;
                state.height = 96;
            }),
        );

        let frame = globe.render().unwrap();
        assert_eq!(frame.state.phi, 1.25);
        // 96 device px / ratio 2 = 48 braille px = 24x12 cells
        assert_eq!(frame.cells(), (24, 12));

        globe.render();
        assert_eq!(calls.get(), 2);
        assert_eq!(globe.frames_rendered(), 2);
    }

    #[test]
    fn test_frame_has_land_markers_and_rim() {
        let mut globe = Globe::create(options(), &LandMask::builtin(), Box::new(|_| {}));
        let frame = globe.render().unwrap();
        let land: usize = frame.dots.iter().map(|c| c.dot_count()).sum();
        assert!(land > 0);
        assert!(frame.glow.dot_count() > 0);
        assert!(frame.markers.dot_count() > 0);
        assert!(!frame.dark);
    }

    #[test]
    fn test_zero_surface_renders_empty() {
        let mut globe = Globe::create(
            options(),
            &LandMask::builtin(),
            Box::new(|state| {
                state.width = 0;
                state.height = 0;
            }),
        );
        let frame = globe.render().unwrap();
        assert_eq!(frame.cells(), (0, 0));
    }

    #[test]
    fn test_destroy_releases_callback_once() {
        let owner = Rc::new(Cell::new(0.0));
        let captured = owner.clone();
        let mut globe = Globe::create(
            options(),
            &LandMask::builtin(),
            Box::new(move |state| state.phi = captured.get()),
        );
        assert_eq!(Rc::strong_count(&owner), 2);

        globe.destroy();
        assert!(globe.is_destroyed());
        assert_eq!(Rc::strong_count(&owner), 1);
        assert_eq!(globe.land_dots(), 0);
        assert!(globe.render().is_none());

        // Second destroy is a no-op
        globe.destroy();
        assert!(globe.is_destroyed());
    }

    #[test]
    fn test_drop_releases_callback() {
        let owner = Rc::new(Cell::new(0.5));
        let captured = owner.clone();
        let globe = Globe::create(
            options(),
            &LandMask::builtin(),
            Box::new(move |state| state.theta = captured.get()),
        );
        assert_eq!(Rc::strong_count(&owner), 2);
        drop(globe);
        assert_eq!(Rc::strong_count(&owner), 1);
    }

    #[test]
    fn test_shade_bands() {
        assert_eq!(shade_level(1.0, 0.4, 1.2), 2);
        assert_eq!(shade_level(0.0, 0.4, 1.2), 1);
        assert_eq!(shade_level(0.0, 1.0, 1.2), 0);
        // No diffuse means flat shading everywhere
        assert_eq!(shade_level(0.0, 0.0, 1.2), shade_level(1.0, 0.0, 1.2));
    }
}
