//! Coordinate axes and row-major `(lat, lon)` value grids for fixtures.

/// Evenly spaced coordinate axis: `start, start + step, ...` (`n` points).
///
/// ```
/// use test_utils::axis;
///
/// assert_eq!(axis(-10.0, 5.0, 3), vec![-10.0, -5.0, 0.0]);
/// ```
pub fn axis(start: f64, step: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `lon_index * 1000 + lat_index`
///
/// A subset can be checked cell by cell: `grid[lat * nlon + lon]` is always
/// `lon * 1000 + lat` of the original indices.
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(5, 10);
/// assert_eq!(grid.len(), 50);
/// assert_eq!(grid[1], 1000.0); // lat=0, lon=1
/// assert_eq!(grid[10], 1.0);   // lat=1, lon=0
/// ```
pub fn create_test_grid(nlat: usize, nlon: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(nlat * nlon);
    for lat in 0..nlat {
        for lon in 0..nlon {
            data.push((lon * 1000 + lat) as f32);
        }
    }
    data
}

/// Grid filled with a single value.
pub fn constant_grid(nlat: usize, nlon: usize, value: f32) -> Vec<f32> {
    vec![value; nlat * nlon]
}

/// Temperature-like field in Kelvin (roughly 250K to 310K), warmest at the
/// equator-most row.
pub fn create_temperature_grid(latitudes: &[f64], nlon: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(latitudes.len() * nlon);
    for lat in latitudes {
        let base = 310.0 - 60.0 * (lat.abs() / 90.0);
        for lon in 0..nlon {
            data.push((base + (lon % 3) as f64 * 0.5) as f32);
        }
    }
    data
}
