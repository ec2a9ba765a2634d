use log::info;

use crate::datatypes::{
    DispersionDiagram, DispersionField, GridSpec, MaterialProperties, ModeFamily, PlateGeometry,
};

/// Characters from darkest to brightest
const PREVIEW_RAMP: &[u8] = b"@%#*+=-:. ";

/// Value ranges of a dispersion field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSummary {
    pub rows: usize,
    pub cols: usize,
    /// Smallest finite dB value, if any
    pub min_finite: Option<f64>,
    /// Largest finite dB value, if any
    pub max_finite: Option<f64>,
    /// Points at an exact modal solution (negative infinity)
    pub modal_points: usize,
    /// Points at a pole of the equation (NaN or positive infinity)
    pub pole_points: usize,
}

impl FieldSummary {
    pub fn of(field: &DispersionField) -> FieldSummary {
        let (rows, cols) = field.shape();
        let mut summary = FieldSummary {
            rows,
            cols,
            min_finite: None,
            max_finite: None,
            modal_points: 0,
            pole_points: 0,
        };

        for &v in field.values.iter() {
            if v.is_finite() {
                summary.min_finite = Some(summary.min_finite.map_or(v, |m| m.min(v)));
                summary.max_finite = Some(summary.max_finite.map_or(v, |m| m.max(v)));
            } else if v == f64::NEG_INFINITY {
                summary.modal_points += 1;
            } else {
                summary.pole_points += 1;
            }
        }

        summary
    }
}

/// Axis extents in display units: frequency in kHz, phase velocity in m/ms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub frequency: (f64, f64),
    pub phase_velocity: (f64, f64),
}

impl Extent {
    pub fn of(grid: &GridSpec) -> Extent {
        Extent {
            frequency: (0.0, grid.frequency_limit),
            phase_velocity: (0.0, grid.phase_velocity_limit),
        }
    }
}

/// 8-bit grayscale raster of a dispersion field.
///
/// Pixel rows are stored top to bottom, so the first row holds the highest
/// phase velocity. Columns run with increasing frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
    pub extent: Extent,
}

impl Heatmap {
    /// Intensity at a pixel, (0, 0) being top left.
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} heatmap",
            self.width,
            self.height
        );
        self.pixels[y * self.width + x]
    }

    /// Downsamples the raster to a character grid for terminal display.
    ///
    /// Each character covers a block of pixels and shows the darkest one, so
    /// thin modal lines survive the reduction.
    pub fn preview(&self, cols: usize, rows: usize) -> String {
        let cols = cols.clamp(1, self.width);
        let rows = rows.clamp(1, self.height);

        let mut out = String::with_capacity((cols + 1) * rows);
        for r in 0..rows {
            let y0 = r * self.height / rows;
            let y1 = ((r + 1) * self.height / rows).max(y0 + 1);
            for c in 0..cols {
                let x0 = c * self.width / cols;
                let x1 = ((c + 1) * self.width / cols).max(x0 + 1);

                let mut darkest = u8::MAX;
                for y in y0..y1 {
                    for x in x0..x1 {
                        darkest = darkest.min(self.pixel(x, y));
                    }
                }

                let level = darkest as usize * (PREVIEW_RAMP.len() - 1) / u8::MAX as usize;
                out.push(PREVIEW_RAMP[level] as char);
            }
            out.push('\n');
        }

        out
    }
}

fn to_intensity(value: f64, min: f64, max: f64) -> u8 {
    if value.is_nan() || value == f64::INFINITY {
        return u8::MAX;
    }
    if value == f64::NEG_INFINITY {
        return 0;
    }
    let normalized = if max > min {
        (value - min) / (max - min)
    } else {
        0.5
    };
    (normalized.clamp(0.0, 1.0) * u8::MAX as f64).round() as u8
}

/// Maps a field to grayscale, linear in dB between its finite extremes
///
/// # Arguments
/// * `field` - The dispersion field to render
/// * `extent` - The axis extents the image covers
///
/// # Returns
/// A Heatmap with one pixel per grid point
pub fn render_grayscale(field: &DispersionField, extent: Extent) -> Heatmap {
    let summary = FieldSummary::of(field);
    let min = summary.min_finite.unwrap_or(0.0);
    let max = summary.max_finite.unwrap_or(0.0);

    let (rows, cols) = field.shape();
    let mut pixels = Vec::with_capacity(rows * cols);
    for row in (0..rows).rev() {
        for col in 0..cols {
            pixels.push(to_intensity(field.at(row, col), min, max));
        }
    }

    Heatmap {
        width: cols,
        height: rows,
        pixels,
        extent,
    }
}

/// Title used for a dispersion diagram, e.g.
/// "Symmetric mode dispersion diagram of 1 mm aluminum"
pub fn diagram_title(
    family: ModeFamily,
    material: &MaterialProperties,
    plate: &PlateGeometry,
) -> String {
    format!(
        "{} mode dispersion diagram of {} mm {}",
        family.label(),
        plate.thickness,
        material.name
    )
}

/// Renders one family of a diagram and logs its summary
pub fn render_family(diagram: &DispersionDiagram, family: ModeFamily) -> (String, Heatmap) {
    let field = diagram.field(family);
    let summary = FieldSummary::of(field);
    let title = diagram_title(family, &diagram.material, &diagram.plate);

    info!("{title}");
    match (summary.min_finite, summary.max_finite) {
        (Some(min), Some(max)) => info!("  amplitude range {:.1} to {:.1} dB", min, max),
        _ => info!("  no finite amplitudes"),
    }
    info!(
        "  {} modal points, {} poles on a {} x {} grid",
        summary.modal_points, summary.pole_points, summary.rows, summary.cols
    );

    (title, render_grayscale(field, Extent::of(&diagram.grid)))
}
