use json::JsonValue;
use log::debug;

use crate::{
    datatypes::{GridSpec, MaterialProperties, PlateGeometry},
    error::LambError,
};

/// Everything needed for one kernel run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunDescription {
    pub material: MaterialProperties,
    pub plate: PlateGeometry,
    pub grid: GridSpec,
}

/// Returns a section of the input json, or an error if it is present but
/// not an object
fn section<'a>(input_json: &'a JsonValue, name: &str) -> Result<&'a JsonValue, LambError> {
    let value = &input_json[name];
    if !value.is_null() && !value.is_object() {
        return Err(LambError::Input(format!(
            "Input json field {name} must be an object"
        )));
    }
    Ok(value)
}

fn read_f64(section: &JsonValue, path: &str, key: &str, default: f64) -> Result<f64, LambError> {
    let value = &section[key];
    if value.is_null() {
        return Ok(default);
    }
    match value.as_f64() {
        Some(v) => Ok(v),
        None => Err(LambError::Input(format!(
            "Input json field {path}.{key} must be a number"
        ))),
    }
}

fn read_steps(
    section: &JsonValue,
    path: &str,
    key: &'static str,
    default: usize,
) -> Result<usize, LambError> {
    let value = &section[key];
    if value.is_null() {
        return Ok(default);
    }
    let steps = match value.as_i64() {
        Some(v) => v,
        None => {
            return Err(LambError::Input(format!(
                "Input json field {path}.{key} must be an integer"
            )))
        }
    };
    if steps <= 0 {
        return Err(LambError::Domain {
            parameter: key,
            value: steps as f64,
        });
    }
    Ok(steps as usize)
}

/// Parses a run description from json text.
///
/// Every section and key is optional; missing values fall back to the
/// 1 mm aluminum plate on a 1000 x 1000 grid.
pub fn parse_input(contents: &str) -> Result<RunDescription, LambError> {
    let input_json = match json::parse(contents) {
        Ok(j) => j,
        Err(err) => return Err(LambError::Input(format!("Error in input file json: {err}"))),
    };
    if !input_json.is_object() {
        return Err(LambError::Input(
            "Input json must be an object at the top level".to_owned(),
        ));
    }

    let defaults = RunDescription::default();

    let material_json = section(&input_json, "material")?;
    let name = if material_json["name"].is_null() {
        defaults.material.name.clone()
    } else {
        match material_json["name"].as_str() {
            Some(n) => n.to_owned(),
            None => {
                return Err(LambError::Input(
                    "Input json field material.name must be a string".to_owned(),
                ))
            }
        }
    };
    let material = MaterialProperties {
        name,
        longitudinal_velocity: read_f64(
            material_json,
            "material",
            "longitudinal_velocity",
            defaults.material.longitudinal_velocity,
        )?,
        transverse_velocity: read_f64(
            material_json,
            "material",
            "transverse_velocity",
            defaults.material.transverse_velocity,
        )?,
    };

    let plate_json = section(&input_json, "plate")?;
    let plate = PlateGeometry {
        thickness: read_f64(plate_json, "plate", "thickness", defaults.plate.thickness)?,
    };

    let grid_json = section(&input_json, "grid")?;
    let grid = GridSpec {
        frequency_limit: read_f64(
            grid_json,
            "grid",
            "frequency_limit",
            defaults.grid.frequency_limit,
        )?,
        frequency_steps: read_steps(
            grid_json,
            "grid",
            "frequency_steps",
            defaults.grid.frequency_steps,
        )?,
        phase_velocity_limit: read_f64(
            grid_json,
            "grid",
            "phase_velocity_limit",
            defaults.grid.phase_velocity_limit,
        )?,
        phase_velocity_steps: read_steps(
            grid_json,
            "grid",
            "phase_velocity_steps",
            defaults.grid.phase_velocity_steps,
        )?,
    };

    let run = RunDescription {
        material,
        plate,
        grid,
    };
    debug!("parsed run description: {:?}", run);

    Ok(run)
}

/// Reads and parses a json run description from disk
///
/// # Arguments
/// * `input_file` - The path to the input file
pub fn load_input_file(input_file: &str) -> Result<RunDescription, LambError> {
    let file_string = match std::fs::read_to_string(input_file) {
        Ok(f) => f,
        Err(err) => {
            return Err(LambError::Input(format!(
                "Unable to open input file {input_file}: {err}"
            )))
        }
    };

    parse_input(&file_string)
}
