use nalgebra::DMatrix;

/// Bulk wave velocities of an isotropic plate material
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialProperties {
    pub name: String,
    /// Longitudinal (P) bulk wave velocity in m/s
    pub longitudinal_velocity: f64,
    /// Transverse (S) bulk wave velocity in m/s
    pub transverse_velocity: f64,
}

impl MaterialProperties {
    pub fn new(name: &str, longitudinal_velocity: f64, transverse_velocity: f64) -> Self {
        MaterialProperties {
            name: name.to_owned(),
            longitudinal_velocity,
            transverse_velocity,
        }
    }

    pub fn aluminum() -> Self {
        MaterialProperties::new("aluminum", 6320.0, 3130.0)
    }
}

impl Default for MaterialProperties {
    fn default() -> Self {
        MaterialProperties::aluminum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlateGeometry {
    /// Plate thickness in mm
    pub thickness: f64,
}

impl PlateGeometry {
    pub fn new(thickness: f64) -> Self {
        PlateGeometry { thickness }
    }

    /// Half of the thickness, in meters
    pub fn half_thickness(&self) -> f64 {
        self.thickness / 2e3
    }
}

impl Default for PlateGeometry {
    fn default() -> Self {
        PlateGeometry::new(1.0)
    }
}

/// Resolution and extent of the frequency / phase velocity grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    /// Highest frequency in kHz
    pub frequency_limit: f64,
    pub frequency_steps: usize,
    /// Highest phase velocity in m/ms
    pub phase_velocity_limit: f64,
    pub phase_velocity_steps: usize,
}

impl GridSpec {
    pub fn new(
        frequency_limit: f64,
        frequency_steps: usize,
        phase_velocity_limit: f64,
        phase_velocity_steps: usize,
    ) -> Self {
        GridSpec {
            frequency_limit,
            frequency_steps,
            phase_velocity_limit,
            phase_velocity_steps,
        }
    }

    /// (rows, columns) of every field evaluated on this grid
    pub fn shape(&self) -> (usize, usize) {
        (self.phase_velocity_steps + 1, self.frequency_steps + 1)
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        GridSpec::new(10000.0, 1000, 20.0, 1000)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeFamily {
    Symmetric,
    Antisymmetric,
}

impl ModeFamily {
    pub const ALL: [ModeFamily; 2] = [ModeFamily::Symmetric, ModeFamily::Antisymmetric];

    pub fn label(&self) -> &'static str {
        match self {
            ModeFamily::Symmetric => "Symmetric",
            ModeFamily::Antisymmetric => "Antisymmetric",
        }
    }
}

/// Rayleigh-Lamb equation magnitude in dB for one mode family.
///
/// Rows follow the phase velocity axis, columns the frequency axis.
/// Exact modal solutions hold `f64::NEG_INFINITY`.
#[derive(Debug, Clone, PartialEq)]
pub struct DispersionField {
    pub family: ModeFamily,
    pub values: DMatrix<f64>,
}

impl DispersionField {
    pub fn shape(&self) -> (usize, usize) {
        self.values.shape()
    }

    /// Value at a (phase velocity row, frequency column) grid point.
    ///
    /// Panics if either index is outside [`Self::shape`].
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.values[(row, col)]
    }
}

/// Output of one kernel run: both fields plus the axes they were built on
#[derive(Debug, Clone, PartialEq)]
pub struct DispersionDiagram {
    pub material: MaterialProperties,
    pub plate: PlateGeometry,
    pub grid: GridSpec,
    /// Frequencies in kHz, one per column
    pub frequency: Vec<f64>,
    /// Phase velocities in m/s, one per row
    pub phase_velocity: Vec<f64>,
    pub symmetric: DispersionField,
    pub antisymmetric: DispersionField,
}

impl DispersionDiagram {
    pub fn field(&self, family: ModeFamily) -> &DispersionField {
        match family {
            ModeFamily::Symmetric => &self.symmetric,
            ModeFamily::Antisymmetric => &self.antisymmetric,
        }
    }
}
