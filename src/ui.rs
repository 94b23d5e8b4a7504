use crate::app::App;
use crate::braille::BrailleCanvas;
use crate::config::Rgb;
use crate::engine::GlobeFrame;
use crate::markers::Marker;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
    Frame,
};

/// Widest tooltip, in cells, before the description wraps
const TOOLTIP_MAX_WIDTH: u16 = 34;

/// Brightness scale per dot band, darkest first
const SHADE_SCALE: [f32; 3] = [0.45, 0.7, 1.0];

/// Where everything goes on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    /// Bordered globe panel
    pub panel: Rect,
    /// Square globe surface inside the panel; `None` if the terminal is too small
    pub globe: Option<Rect>,
    pub status: Rect,
}

/// Split the terminal into the globe panel and the status bar, and fit the
/// largest square (in braille pixels) inside the panel.
pub fn screen_layout(area: Rect) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Globe
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let panel = chunks[0];
    let inner = Block::default().borders(Borders::ALL).inner(panel);

    // Braille gives 2x4 resolution per character; keep the side a multiple of 4
    let side = (inner.width as usize * 2).min(inner.height as usize * 4) / 4 * 4;
    let globe = (side > 0).then(|| {
        let cols = (side / 2) as u16;
        let rows = (side / 4) as u16;
        Rect::new(
            inner.x + (inner.width - cols) / 2,
            inner.y + (inner.height - rows) / 2,
            cols,
            rows,
        )
    });

    ScreenLayout { panel, globe, status: chunks[1] }
}

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let layout = screen_layout(frame.area());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Globe ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    frame.render_widget(block, layout.panel);

    if let (Some(surface), Some(globe_frame)) = (layout.globe, app.frame()) {
        let config = app.config();
        let widget = GlobeWidget {
            frame: globe_frame,
            base_color: config.base_color,
            marker_color: config.marker_color,
            glow_color: config.glow_color,
        };
        frame.render_widget(widget, surface);
    }

    if let Some((marker, column, row)) = app.highlighted_marker() {
        let area = tooltip_area(marker, column, row, layout.panel);
        frame.render_widget(Clear, area);
        frame.render_widget(Tooltip { marker, color: app.config().marker_color }, area);
    }

    render_status_bar(frame, app, layout.status);
}

/// Convert a normalized color to a terminal color, scaled by `brightness`
pub fn to_color(rgb: Rgb, brightness: f32) -> Color {
    let channel = |c: f32| ((c * brightness).clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb(channel(rgb[0]), channel(rgb[1]), channel(rgb[2]))
}

/// Renders a rasterized globe frame, layer by layer
struct GlobeWidget<'a> {
    frame: &'a GlobeFrame,
    base_color: Rgb,
    marker_color: Rgb,
    glow_color: Rgb,
}

impl GlobeWidget<'_> {
    /// Render a braille canvas layer with a specific color
    fn render_layer(&self, canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
        let rows = canvas.height().min(area.height as usize);
        let cols = canvas.width().min(area.width as usize);
        for row in 0..rows {
            for col in 0..cols {
                if let Some(ch) = canvas.cell(col, row) {
                    let x = area.x + col as u16;
                    let y = area.y + row as u16;
                    buf[(x, y)].set_char(ch).set_fg(color);
                }
            }
        }
    }

    /// Dark backdrop behind the sphere
    fn render_disc(&self, area: Rect, buf: &mut Buffer) {
        let view = &self.frame.view;
        let (cx, cy) = (view.width as f64 / 2.0, view.height as f64 / 2.0);
        let r2 = view.radius * view.radius;
        let (cols, rows) = self.frame.cells();

        for row in 0..rows.min(area.height as usize) {
            for col in 0..cols.min(area.width as usize) {
                let dx = col as f64 * 2.0 + 1.0 - cx;
                let dy = row as f64 * 4.0 + 2.0 - cy;
                if dx * dx + dy * dy <= r2 {
                    buf[(area.x + col as u16, area.y + row as u16)].set_bg(Color::Rgb(18, 20, 28));
                }
            }
        }
    }
}

impl Widget for GlobeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.frame.dark {
            self.render_disc(area, buf);
        }

        // Back to front: rim, land from dim to bright, markers on top
        self.render_layer(&self.frame.glow, to_color(self.glow_color, 0.5), area, buf);
        for (canvas, scale) in self.frame.dots.iter().zip(SHADE_SCALE) {
            self.render_layer(canvas, to_color(self.base_color, scale), area, buf);
        }
        self.render_layer(&self.frame.markers, to_color(self.marker_color, 1.0), area, buf);
    }
}

/// Tooltip box: anchored above the pointer and horizontally centered on it,
/// pushed back inside `bounds` when it would overflow.
pub fn tooltip_area(marker: &Marker, column: u16, row: u16, bounds: Rect) -> Rect {
    let text_width = marker
        .name
        .chars()
        .count()
        .max(marker.description.chars().count()) as u16;
    let width = (text_width + 2).min(TOOLTIP_MAX_WIDTH).min(bounds.width);
    let inner_width = width.saturating_sub(2).max(1);
    let desc_lines = (marker.description.chars().count() as u16).div_ceil(inner_width).max(1);
    let height = (desc_lines + 3).min(bounds.height);

    let max_x = bounds.x + bounds.width - width;
    let max_y = bounds.y + bounds.height - height;
    let x = column.saturating_sub(width / 2).clamp(bounds.x, max_x);
    let y = row.saturating_sub(height).clamp(bounds.y, max_y);

    Rect::new(x, y, width, height)
}

struct Tooltip<'a> {
    marker: &'a Marker,
    color: Rgb,
}

impl Widget for Tooltip<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(to_color(self.color, 1.0)));
        let text = vec![
            Line::from(Span::styled(
                self.marker.name.as_str(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                self.marker.description.as_str(),
                Style::default().fg(Color::Gray),
            )),
        ];
        Paragraph::new(text)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (state, state_color) = if app.is_dragging() {
        ("dragging", Color::Yellow)
    } else {
        ("spinning", Color::Green)
    };

    let position = match app.cursor_lonlat() {
        Some((lon, lat)) => format!(
            "{:.1}°{}, {:.1}°{}",
            lat.abs(),
            if lat >= 0.0 { "N" } else { "S" },
            lon.abs(),
            if lon >= 0.0 { "E" } else { "W" }
        ),
        None => "--".to_string(),
    };

    let status = Line::from(vec![
        Span::styled(" Rotation: ", Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{:.2} rad ", app.rotation_angle()), Style::default().fg(Color::Yellow)),
        Span::styled(state, Style::default().fg(state_color)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(position, Style::default().fg(Color::Cyan)),
        Span::styled(
            " | drag:spin ←/→:nudge d:dark r:reset q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(status), area);
}
