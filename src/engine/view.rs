use glam::DVec3;

/// Orthographic view of the unit sphere.
/// Orientation stored as a rotation matrix (3 column vectors) so every dot
/// projects with three dot products.
#[derive(Clone, Debug)]
pub struct GlobeView {
    /// Forward direction (what points at the camera)
    forward: DVec3,
    /// Right direction
    right: DVec3,
    /// Up direction
    up: DVec3,
    /// Sphere radius in braille pixels
    pub radius: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

impl GlobeView {
    /// Build a view centered on (lon, lat) with given radius.
    pub fn new(center_lon: f64, center_lat: f64, radius: f64, width: usize, height: usize) -> Self {
        let lon_rad = center_lon.to_radians();
        let lat_rad = center_lat.to_radians();

        // Forward = direction from origin to (lon, lat) on unit sphere
        let forward = lonlat_to_vec3(center_lon, center_lat);

        // Up = derivative of forward w.r.t. latitude (points north on sphere)
        let raw_up = DVec3::new(
            -lat_rad.sin() * lon_rad.cos(),
            -lat_rad.sin() * lon_rad.sin(),
            lat_rad.cos(),
        );

        // Right = up × forward (points east as seen from outside the sphere)
        let right = raw_up.cross(forward).normalize();
        let up = forward.cross(right).normalize();

        Self { forward, right, up, radius, width, height }
    }

    /// View for a rotation angle `phi` (spin about the polar axis) and a
    /// camera tilt `theta`, both in radians. Increasing `phi` turns the
    /// surface towards screen-right, so a rightward drag drags the globe along.
    pub fn from_angles(phi: f64, theta: f64, radius: f64, width: usize, height: usize) -> Self {
        Self::new(-phi.to_degrees(), theta.to_degrees(), radius, width, height)
    }

    /// Screen position of a unit-sphere point plus its depth towards the
    /// camera (1 at the disc center, 0 on the limb).
    /// Returns `None` for back-face points (behind the visible hemisphere).
    #[inline(always)]
    pub fn project_vec(&self, p: DVec3) -> Option<(i32, i32, f64)> {
        let depth = p.dot(self.forward);
        if depth < 0.0 {
            return None;
        }

        // Orthographic: project onto right/up plane
        let sx = p.dot(self.right);
        let sy = p.dot(self.up);

        let px = (self.width as f64 / 2.0 + sx * self.radius).round() as i32;
        let py = (self.height as f64 / 2.0 - sy * self.radius).round() as i32;

        Some((px, py, depth))
    }

    /// Project a geographic point to screen pixels.
    pub fn project(&self, lon: f64, lat: f64) -> Option<(i32, i32)> {
        self.project_vec(lonlat_to_vec3(lon, lat)).map(|(x, y, _)| (x, y))
    }

    /// Unproject screen pixels back to lon/lat.
    /// Returns `None` if the point is outside the sphere disk.
    pub fn unproject(&self, px: f64, py: f64) -> Option<(f64, f64)> {
        let sx = (px - self.width as f64 / 2.0) / self.radius;
        let sy = -(py - self.height as f64 / 2.0) / self.radius;

        let r2 = sx * sx + sy * sy;
        if r2 > 1.0 {
            return None;
        }

        // Reconstruct 3D point on unit sphere
        let sz = (1.0 - r2).sqrt();
        let p = self.right * sx + self.up * sy + self.forward * sz;

        let lat = p.z.clamp(-1.0, 1.0).asin().to_degrees();
        let lon = p.y.atan2(p.x).to_degrees();

        Some((lon, lat))
    }

    /// Extract the center lon/lat that the view is looking at.
    pub fn center_lonlat(&self) -> (f64, f64) {
        let lat = self.forward.z.asin().to_degrees();
        let lon = self.forward.y.atan2(self.forward.x).to_degrees();
        (lon, lat)
    }
}

/// Convert lon/lat (degrees) to a unit sphere vector.
#[inline(always)]
pub fn lonlat_to_vec3(lon: f64, lat: f64) -> DVec3 {
    let lon_rad = lon.to_radians();
    let lat_rad = lat.to_radians();
    DVec3::new(
        lat_rad.cos() * lon_rad.cos(),
        lat_rad.cos() * lon_rad.sin(),
        lat_rad.sin(),
    )
}
