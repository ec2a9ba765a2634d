use clap::{Parser, ValueEnum};
use lamb_dispersion::{
    input::{self, RunDescription},
    post_processor, solver, LambError, ModeFamily, SolverOptions,
};
use log::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeSelection {
    Symmetric,
    Antisymmetric,
    Both,
}

impl ModeSelection {
    fn families(&self) -> Vec<ModeFamily> {
        match self {
            ModeSelection::Symmetric => vec![ModeFamily::Symmetric],
            ModeSelection::Antisymmetric => vec![ModeFamily::Antisymmetric],
            ModeSelection::Both => ModeFamily::ALL.to_vec(),
        }
    }
}

/// Lamb wave dispersion diagrams from the Rayleigh-Lamb equations
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON run description (material, plate, grid)
    #[arg(short, long)]
    input: Option<String>,

    /// Material label used in diagram titles
    #[arg(long)]
    material_name: Option<String>,

    /// Longitudinal bulk velocity (m/s)
    #[arg(long, allow_negative_numbers = true)]
    longitudinal_velocity: Option<f64>,

    /// Transverse bulk velocity (m/s)
    #[arg(long, allow_negative_numbers = true)]
    transverse_velocity: Option<f64>,

    /// Plate thickness (mm)
    #[arg(long, allow_negative_numbers = true)]
    thickness: Option<f64>,

    /// Highest frequency (kHz)
    #[arg(long, allow_negative_numbers = true)]
    frequency_limit: Option<f64>,

    /// Number of frequency intervals
    #[arg(long)]
    frequency_steps: Option<usize>,

    /// Highest phase velocity (m/ms)
    #[arg(long, allow_negative_numbers = true)]
    phase_velocity_limit: Option<f64>,

    /// Number of phase velocity intervals
    #[arg(long)]
    phase_velocity_steps: Option<usize>,

    /// Mode families to render
    #[arg(long, value_enum, default_value_t = ModeSelection::Both)]
    mode: ModeSelection,

    /// Preview width in characters
    #[arg(long, default_value_t = 100)]
    preview_width: usize,

    /// Preview height in lines
    #[arg(long, default_value_t = 32)]
    preview_height: usize,

    /// Skip the terminal preview
    #[arg(long)]
    no_preview: bool,
}

impl Args {
    /// Starts from the input file (or the reference scenario) and applies
    /// any values given on the command line
    fn run_description(&self) -> Result<RunDescription, LambError> {
        let mut run = match &self.input {
            Some(path) => input::load_input_file(path)?,
            None => RunDescription::default(),
        };

        if let Some(name) = &self.material_name {
            run.material.name = name.clone();
        }
        if let Some(v) = self.longitudinal_velocity {
            run.material.longitudinal_velocity = v;
        }
        if let Some(v) = self.transverse_velocity {
            run.material.transverse_velocity = v;
        }
        if let Some(v) = self.thickness {
            run.plate.thickness = v;
        }
        if let Some(v) = self.frequency_limit {
            run.grid.frequency_limit = v;
        }
        if let Some(v) = self.frequency_steps {
            run.grid.frequency_steps = v;
        }
        if let Some(v) = self.phase_velocity_limit {
            run.grid.phase_velocity_limit = v;
        }
        if let Some(v) = self.phase_velocity_steps {
            run.grid.phase_velocity_steps = v;
        }

        Ok(run)
    }
}

fn execute(args: &Args) -> Result<(), LambError> {
    let run = args.run_description()?;

    let diagram = solver::run(
        &run.material,
        &run.plate,
        &run.grid,
        SolverOptions {
            show_progress: true,
        },
    )?;

    for family in args.mode.families() {
        let (title, heatmap) = post_processor::render_family(&diagram, family);
        if !args.no_preview {
            println!("{title}");
            println!(
                "phase velocity {:?} m/ms (up), frequency {:?} kHz (right)",
                heatmap.extent.phase_velocity, heatmap.extent.frequency
            );
            print!(
                "{}",
                heatmap.preview(args.preview_width, args.preview_height)
            );
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Err(err) = execute(&args) {
        error!("{err}");
        std::process::exit(1)
    }
}
