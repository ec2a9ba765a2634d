use crate::datatypes::GridSpec;

/// Value substituted at index 0 of every axis so that no wavenumber
/// expression divides by zero frequency or velocity.
pub const ZERO_INDEX_VALUE: f64 = 1.0;

/// Builds `steps + 1` evenly spaced values from 0 to `limit`, with the
/// first entry replaced by [`ZERO_INDEX_VALUE`].
pub fn build_axis(limit: f64, steps: usize) -> Vec<f64> {
    let step = limit / steps as f64;

    let mut axis: Vec<f64> = (0..=steps).map(|i| step * i as f64).collect();
    axis[0] = ZERO_INDEX_VALUE;

    axis
}

/// Frequencies in kHz, one per grid column
pub fn frequency_axis(grid: &GridSpec) -> Vec<f64> {
    build_axis(grid.frequency_limit, grid.frequency_steps)
}

/// Phase velocities in m/s, one per grid row. The limit is configured in
/// m/ms and scaled here.
pub fn phase_velocity_axis(grid: &GridSpec) -> Vec<f64> {
    build_axis(grid.phase_velocity_limit * 1e3, grid.phase_velocity_steps)
}
