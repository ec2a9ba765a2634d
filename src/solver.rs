use crate::{
    datatypes::{
        DispersionDiagram, DispersionField, GridSpec, MaterialProperties, ModeFamily,
        PlateGeometry,
    },
    error::LambError,
    grid,
};
use indicatif::ProgressBar;
use log::{debug, info, warn};
use nalgebra::DMatrix;
use num_complex::Complex64;
use std::f64::consts::PI;

/// Beyond this |2 Im z| the hyperbolic terms of tan(z) overflow; the
/// limiting form is used instead.
pub const TAN_SATURATION: f64 = 40.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct SolverOptions {
    /// Draw a progress bar while sweeping the grid rows
    pub show_progress: bool,
}

fn check_positive(parameter: &'static str, value: f64) -> Result<(), LambError> {
    // written so that NaN is rejected too
    if !(value > 0.0) {
        return Err(LambError::Domain { parameter, value });
    }
    Ok(())
}

fn check_steps(parameter: &'static str, steps: usize) -> Result<(), LambError> {
    if steps == 0 {
        return Err(LambError::Domain {
            parameter,
            value: 0.0,
        });
    }
    Ok(())
}

/// Checks that every kernel input is strictly positive
///
/// # Arguments
/// * `material` - The plate material
/// * `plate` - The plate geometry
/// * `grid` - The evaluation grid
///
/// # Returns
/// The first offending parameter as a `LambError::Domain`
pub fn validate(
    material: &MaterialProperties,
    plate: &PlateGeometry,
    grid: &GridSpec,
) -> Result<(), LambError> {
    check_positive("longitudinal_velocity", material.longitudinal_velocity)?;
    check_positive("transverse_velocity", material.transverse_velocity)?;
    check_positive("thickness", plate.thickness)?;
    check_positive("frequency_limit", grid.frequency_limit)?;
    check_steps("frequency_steps", grid.frequency_steps)?;
    check_positive("phase_velocity_limit", grid.phase_velocity_limit)?;
    check_steps("phase_velocity_steps", grid.phase_velocity_steps)?;

    if material.transverse_velocity >= material.longitudinal_velocity {
        warn!(
            "transverse velocity {} m/s is not below longitudinal velocity {} m/s for {}",
            material.transverse_velocity, material.longitudinal_velocity, material.name
        );
    }

    Ok(())
}

/// Principal square root of a real number, returning an imaginary value
/// for negative input
pub fn principal_sqrt(radicand: f64) -> Complex64 {
    if radicand >= 0.0 {
        Complex64::new(radicand.sqrt(), 0.0)
    } else {
        Complex64::new(0.0, (-radicand).sqrt())
    }
}

/// Complex tangent that stays finite for large imaginary arguments.
///
/// Uses `tan(a + ib) = (sin 2a + i sinh 2b) / (cos 2a + cosh 2b)`. Once
/// `|2b|` exceeds [`TAN_SATURATION`] the result is `±i` up to a real part
/// that decays like `e^{-|2b|}`.
pub fn complex_tan(z: Complex64) -> Complex64 {
    let two_re = 2.0 * z.re;
    let two_im = 2.0 * z.im;

    if two_im.abs() > TAN_SATURATION {
        let decay = 2.0 * (-two_im.abs()).exp();
        return Complex64::new(two_re.sin() * decay, two_im.signum());
    }

    let denominator = two_re.cos() + two_im.cosh();
    Complex64::new(two_re.sin() / denominator, two_im.sinh() / denominator)
}

/// Intermediate terms of the Rayleigh-Lamb equations at one grid point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayleighLambTerms {
    /// Out-of-plane wavenumber of the longitudinal bulk wave
    pub x: Complex64,
    /// Out-of-plane wavenumber of the transverse bulk wave
    pub y: Complex64,
    pub a1: Complex64,
    pub a2: Complex64,
    pub a3: Complex64,
    pub a4: Complex64,
}

impl RayleighLambTerms {
    /// Evaluates the terms for one (frequency, phase velocity) pair
    ///
    /// # Arguments
    /// * `frequency` - Frequency in kHz
    /// * `phase_velocity` - Lamb wave phase velocity in m/s
    /// * `material` - The plate material
    /// * `half_thickness` - Half the plate thickness in m
    pub fn at(
        frequency: f64,
        phase_velocity: f64,
        material: &MaterialProperties,
        half_thickness: f64,
    ) -> RayleighLambTerms {
        let angular_frequency = 2.0 * PI * frequency * 1e3;

        let k2 = f64::powi(angular_frequency / phase_velocity, 2);
        let kl2 = f64::powi(angular_frequency / material.longitudinal_velocity, 2);
        let kt2 = f64::powi(angular_frequency / material.transverse_velocity, 2);

        let x = principal_sqrt(kl2 - k2);
        let y = principal_sqrt(kt2 - k2);

        let b = y * y - k2;

        RayleighLambTerms {
            x,
            y,
            a1: b * b,
            a2: x * (4.0 * k2),
            a3: complex_tan(x * half_thickness),
            a4: complex_tan(y * half_thickness),
        }
    }

    /// Left-hand side of the Rayleigh-Lamb equation for a mode family.
    ///
    /// Symmetric modes divide by the tangents, antisymmetric modes multiply.
    pub fn characteristic(&self, family: ModeFamily) -> Complex64 {
        match family {
            ModeFamily::Symmetric => self.a1 / self.a3 / self.y + self.a2 / self.a4,
            ModeFamily::Antisymmetric => self.a1 * self.a3 / self.y + self.a2 * self.a4,
        }
    }

    /// Absolute value of [`Self::characteristic`]
    pub fn magnitude(&self, family: ModeFamily) -> f64 {
        self.characteristic(family).norm()
    }
}

/// `20 log10(raw)`; a zero magnitude maps to negative infinity
pub fn to_decibels(raw: f64) -> f64 {
    20.0 * raw.log10()
}

/// Evaluates the Rayleigh-Lamb equations over the whole grid
///
/// # Arguments
/// * `material` - The plate material
/// * `plate` - The plate geometry
/// * `grid` - The evaluation grid
/// * `options` - Progress reporting options
///
/// # Returns
/// A DispersionDiagram holding the symmetric and antisymmetric fields in dB
pub fn run(
    material: &MaterialProperties,
    plate: &PlateGeometry,
    grid: &GridSpec,
    options: SolverOptions,
) -> Result<DispersionDiagram, LambError> {
    validate(material, plate, grid)?;

    let frequency = grid::frequency_axis(grid);
    let phase_velocity = grid::phase_velocity_axis(grid);
    let half_thickness = plate.half_thickness();

    let (rows, cols) = grid.shape();
    info!(
        "evaluating {} x {} grid for {} mm {}",
        rows, cols, plate.thickness, material.name
    );

    let mut symmetric: DMatrix<f64> = DMatrix::zeros(rows, cols);
    let mut antisymmetric: DMatrix<f64> = DMatrix::zeros(rows, cols);

    let bar = if options.show_progress {
        ProgressBar::new(rows as u64)
    } else {
        ProgressBar::hidden()
    };

    let start = std::time::Instant::now();
    for (row, &velocity) in phase_velocity.iter().enumerate() {
        for (col, &f) in frequency.iter().enumerate() {
            let terms = RayleighLambTerms::at(f, velocity, material, half_thickness);

            symmetric[(row, col)] = to_decibels(terms.magnitude(ModeFamily::Symmetric));
            antisymmetric[(row, col)] = to_decibels(terms.magnitude(ModeFamily::Antisymmetric));
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    let elapsed = start.elapsed().as_secs_f32();
    info!("evaluated {} grid points in {:.3} seconds", rows * cols, elapsed);
    debug!(
        "frequency axis 1..{} kHz, phase velocity axis 1..{} m/s",
        frequency[cols - 1],
        phase_velocity[rows - 1]
    );

    Ok(DispersionDiagram {
        material: material.clone(),
        plate: *plate,
        grid: *grid,
        frequency,
        phase_velocity,
        symmetric: DispersionField {
            family: ModeFamily::Symmetric,
            values: symmetric,
        },
        antisymmetric: DispersionField {
            family: ModeFamily::Antisymmetric,
            values: antisymmetric,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn aluminum_terms(frequency: f64, phase_velocity: f64) -> RayleighLambTerms {
        RayleighLambTerms::at(
            frequency,
            phase_velocity,
            &MaterialProperties::aluminum(),
            PlateGeometry::default().half_thickness(),
        )
    }

    #[test]
    fn sqrt_of_negative_is_positive_imaginary() {
        let root = principal_sqrt(-16.0);
        assert_eq!(root.re, 0.0);
        assert_relative_eq!(root.im, 4.0);

        let root = principal_sqrt(9.0);
        assert_relative_eq!(root.re, 3.0);
        assert_eq!(root.im, 0.0);
    }

    #[test]
    fn tan_matches_library_for_moderate_arguments() {
        for z in [
            Complex64::new(0.3, 0.0),
            Complex64::new(1.1, -0.7),
            Complex64::new(-2.4, 3.5),
            Complex64::new(0.0, 5.0),
        ] {
            let ours = complex_tan(z);
            let reference = z.tan();
            assert_relative_eq!(ours.re, reference.re, epsilon = 1e-12, max_relative = 1e-9);
            assert_relative_eq!(ours.im, reference.im, epsilon = 1e-12, max_relative = 1e-9);
        }
    }

    #[test]
    fn tan_of_imaginary_is_imaginary() {
        let t = complex_tan(Complex64::new(0.0, 0.8));
        assert_eq!(t.re, 0.0);
        assert_relative_eq!(t.im, f64::tanh(0.8), max_relative = 1e-12);
    }

    #[test]
    fn tan_saturates_for_large_imaginary_arguments() {
        let t = complex_tan(Complex64::new(0.0, 3.0e4));
        assert_eq!(t.re, 0.0);
        assert_eq!(t.im, 1.0);

        let t = complex_tan(Complex64::new(1.3, -800.0));
        assert!(t.re.is_finite());
        assert_eq!(t.im, -1.0);
    }

    #[test]
    fn evanescent_point_stays_finite() {
        // 5000 m/s is below the longitudinal velocity, so x is imaginary
        let terms = aluminum_terms(500.0, 5000.0);

        assert_eq!(terms.x.re, 0.0);
        assert!(terms.x.im > 0.0);
        assert_eq!(terms.a3.re, 0.0);
        assert!(terms.a3.im != 0.0);

        for family in ModeFamily::ALL {
            let raw = terms.magnitude(family);
            assert!(raw.is_finite());
            assert!(raw >= 0.0);
        }
    }

    #[test]
    fn strongly_evanescent_point_stays_finite() {
        // 1 m/s at 10 MHz puts both tangent arguments deep into saturation
        let terms = aluminum_terms(10000.0, 1.0);

        assert_eq!(terms.a3.im, 1.0);
        assert_eq!(terms.a4.im, 1.0);
        for family in ModeFamily::ALL {
            assert!(terms.magnitude(family).is_finite());
        }
    }

    #[test]
    fn families_differ_only_in_tangent_placement() {
        let terms = aluminum_terms(1500.0, 7300.0);
        let swapped = RayleighLambTerms {
            a3: terms.a3.inv(),
            a4: terms.a4.inv(),
            ..terms
        };

        let symmetric_of_swapped = swapped.characteristic(ModeFamily::Symmetric);
        let antisymmetric = terms.characteristic(ModeFamily::Antisymmetric);

        assert!((symmetric_of_swapped - antisymmetric).norm() <= 1e-9 * antisymmetric.norm());
    }

    #[test]
    fn reference_point_values() {
        let terms = aluminum_terms(1.0, 1.0);
        assert_relative_eq!(
            to_decibels(terms.magnitude(ModeFamily::Symmetric)),
            91.87930305666023,
            max_relative = 1e-6
        );
        assert_relative_eq!(
            to_decibels(terms.magnitude(ModeFamily::Antisymmetric)),
            91.40668199249589,
            max_relative = 1e-6
        );

        let terms = aluminum_terms(10000.0, 20000.0);
        assert_relative_eq!(
            to_decibels(terms.magnitude(ModeFamily::Symmetric)),
            236.55466203558544,
            max_relative = 1e-6
        );
        assert_relative_eq!(
            to_decibels(terms.magnitude(ModeFamily::Antisymmetric)),
            305.8567494152545,
            max_relative = 1e-6
        );
    }

    #[test]
    fn zero_magnitude_is_negative_infinity() {
        assert_eq!(to_decibels(0.0), f64::NEG_INFINITY);
        assert_abs_diff_eq!(to_decibels(1000.0), 60.0, epsilon = 1e-12);
    }

    #[test]
    fn validation_names_offending_parameter() {
        let material = MaterialProperties::aluminum();
        let plate = PlateGeometry::default();
        let grid = GridSpec::default();

        let err = run(&material, &PlateGeometry::new(0.0), &grid, SolverOptions::default())
            .unwrap_err();
        assert_eq!(err.parameter(), Some("thickness"));

        let bad_grid = GridSpec {
            frequency_limit: -5.0,
            ..grid
        };
        let err = run(&material, &plate, &bad_grid, SolverOptions::default()).unwrap_err();
        assert_eq!(
            err,
            LambError::Domain {
                parameter: "frequency_limit",
                value: -5.0
            }
        );

        let bad_grid = GridSpec {
            phase_velocity_steps: 0,
            ..grid
        };
        let err = run(&material, &plate, &bad_grid, SolverOptions::default()).unwrap_err();
        assert_eq!(err.parameter(), Some("phase_velocity_steps"));

        let bad_material = MaterialProperties::new("void", f64::NAN, 3130.0);
        let err = validate(&bad_material, &plate, &grid).unwrap_err();
        assert_eq!(err.parameter(), Some("longitudinal_velocity"));
    }

    #[test]
    fn inverted_velocities_are_not_rejected() {
        let material = MaterialProperties::new("odd", 3000.0, 6000.0);
        assert!(validate(&material, &PlateGeometry::default(), &GridSpec::default()).is_ok());
    }

    #[test]
    fn fields_have_grid_shape() {
        let grid = GridSpec::new(2000.0, 7, 12.0, 4);
        let diagram = run(
            &MaterialProperties::aluminum(),
            &PlateGeometry::new(2.0),
            &grid,
            SolverOptions::default(),
        )
        .unwrap();

        assert_eq!(diagram.symmetric.shape(), (5, 8));
        assert_eq!(diagram.antisymmetric.shape(), (5, 8));
        assert_eq!(diagram.frequency.len(), 8);
        assert_eq!(diagram.phase_velocity.len(), 5);
        assert_eq!(diagram.frequency[0], 1.0);
        assert_eq!(diagram.phase_velocity[0], 1.0);
    }

    #[test]
    fn grid_values_match_pointwise_evaluation() {
        let material = MaterialProperties::aluminum();
        let plate = PlateGeometry::new(1.5);
        let grid = GridSpec::new(3000.0, 6, 15.0, 5);
        let diagram = run(&material, &plate, &grid, SolverOptions::default()).unwrap();

        for (row, &velocity) in diagram.phase_velocity.iter().enumerate() {
            for (col, &f) in diagram.frequency.iter().enumerate() {
                let terms = RayleighLambTerms::at(f, velocity, &material, plate.half_thickness());
                let expected_s = to_decibels(terms.magnitude(ModeFamily::Symmetric));
                let expected_a = to_decibels(terms.magnitude(ModeFamily::Antisymmetric));

                assert_eq!(diagram.symmetric.at(row, col).to_bits(), expected_s.to_bits());
                assert_eq!(
                    diagram.antisymmetric.at(row, col).to_bits(),
                    expected_a.to_bits()
                );
            }
        }
    }

    #[test]
    fn raw_magnitudes_are_non_negative() {
        let material = MaterialProperties::aluminum();
        let half = PlateGeometry::default().half_thickness();
        let grid = GridSpec::new(10000.0, 40, 20.0, 40);

        for velocity in grid::phase_velocity_axis(&grid) {
            for f in grid::frequency_axis(&grid) {
                let terms = RayleighLambTerms::at(f, velocity, &material, half);
                for family in ModeFamily::ALL {
                    let raw = terms.magnitude(family);
                    assert!(raw.is_nan() || raw >= 0.0);
                }
            }
        }
    }

    #[test]
    fn longitudinal_velocity_row_is_antisymmetric_zero() {
        // 20 m/s velocity steps land exactly on 6320 m/s at row 316
        let grid = GridSpec::new(1000.0, 10, 20.0, 1000);
        let diagram = run(
            &MaterialProperties::aluminum(),
            &PlateGeometry::default(),
            &grid,
            SolverOptions::default(),
        )
        .unwrap();

        assert_eq!(diagram.phase_velocity[316], 6320.0);
        for col in 0..diagram.frequency.len() {
            assert_eq!(diagram.antisymmetric.at(316, col), f64::NEG_INFINITY);
        }
    }
}
