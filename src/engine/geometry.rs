use crate::braille::BrailleCanvas;

/// Draw a filled circle (for marker dots)
pub fn draw_circle(canvas: &mut BrailleCanvas, cx: i32, cy: i32, radius: i32) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                canvas.set_pixel_signed(cx + dx, cy + dy);
            }
        }
    }
}

/// Draw a circle outline using the midpoint algorithm (for the glow rim)
pub fn draw_ring(canvas: &mut BrailleCanvas, cx: i32, cy: i32, radius: i32) {
    if radius <= 0 {
        canvas.set_pixel_signed(cx, cy);
        return;
    }

    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;

    while x >= y {
        for (px, py) in [
            (x, y), (y, x), (-y, x), (-x, y),
            (-x, -y), (-y, -x), (y, -x), (x, -y),
        ] {
            canvas.set_pixel_signed(cx + px, cy + py);
        }

        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_circle() {
        let mut canvas = BrailleCanvas::new(5, 3);
        draw_circle(&mut canvas, 4, 4, 2);
        // 13 lattice points inside r=2
        assert_eq!(canvas.dot_count(), 13);
    }

    #[test]
    fn test_ring_is_hollow() {
        let mut filled = BrailleCanvas::new(20, 10);
        let mut ring = BrailleCanvas::new(20, 10);
        draw_circle(&mut filled, 20, 20, 12);
        draw_ring(&mut ring, 20, 20, 12);
        assert!(ring.dot_count() > 0);
        assert!(ring.dot_count() < filled.dot_count() / 4);
        // Center cell stays empty
        assert_eq!(ring.cell(10, 5), None);
    }

    #[test]
    fn test_ring_clipped_at_edges() {
        let mut canvas = BrailleCanvas::new(2, 1);
        draw_ring(&mut canvas, 0, 0, 10);
        assert_eq!(canvas.dot_count(), 0);
    }
}
