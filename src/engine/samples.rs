use super::land::LandMask;
use super::view::lonlat_to_vec3;
use glam::DVec3;
use rayon::prelude::*;

/// Golden angle in degrees, the azimuth step of the Fibonacci lattice.
const GOLDEN_ANGLE_DEG: f64 = 137.507_764_050_037_85;

/// `i`-th of `n` evenly spread sphere points as (lon, lat) degrees.
#[inline(always)]
pub fn fibonacci_lonlat(i: usize, n: usize) -> (f64, f64) {
    let z = 1.0 - 2.0 * (i as f64 + 0.5) / n as f64;
    let lat = z.clamp(-1.0, 1.0).asin().to_degrees();
    let lon = (i as f64 * GOLDEN_ANGLE_DEG).rem_euclid(360.0) - 180.0;
    (lon, lat)
}

/// Unit vectors of the lattice points that fall on land, in lattice order.
pub fn land_samples(n: usize, mask: &LandMask) -> Vec<DVec3> {
    (0..n)
        .into_par_iter()
        .filter_map(|i| {
            let (lon, lat) = fibonacci_lonlat(i, n);
            mask.contains(lon, lat).then(|| lonlat_to_vec3(lon, lat))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lattice_covers_sphere() {
        let n = 1000;
        let points: Vec<_> = (0..n).map(|i| fibonacci_lonlat(i, n)).collect();
        assert!(points.iter().all(|&(lon, lat)| (-180.0..180.0).contains(&lon) && lat.abs() <= 90.0));

        let north = points.iter().filter(|p| p.1 > 0.0).count();
        assert_eq!(north, n / 2);
    }

    #[test]
    fn test_land_fraction_is_plausible() {
        let n = 20_000;
        let samples = land_samples(n, &LandMask::builtin());
        let fraction = samples.len() as f64 / n as f64;
        // Earth is roughly 30% land; crude outlines land in the same ballpark
        assert!(fraction > 0.15 && fraction < 0.4, "land fraction {fraction}");
        assert!(samples.iter().all(|p| (p.length() - 1.0).abs() < 1e-9));
    }

    #[test]
    fn test_deterministic() {
        let mask = LandMask::builtin();
        assert_eq!(land_samples(5000, &mask), land_samples(5000, &mask));
    }
}
