//! ffeatools CLI - preparation and analysis of FFEA simulations.
//!
//! Usage: ffeatools [-v|-q] <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `ffeatools --help` for available commands.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use log::{info, warn};
use nalgebra::Vector3;

use ffeatools::blob::{Material, MaterialParams, PinFile, StokesRadii, VdwFile};
use ffeatools::mesh::vtk::{write_vtk, TopologyToVtk, VtkFormat};
use ffeatools::mesh::{
    read_netgen_surface, read_nodes, read_pdb_centroid, read_surface, read_topology,
    write_netgen_vol, write_nodes, write_obj, write_surface, write_topology, MeshFormat, NodeSet,
    Topology, DEFAULT_PRECISION,
};
use ffeatools::modes::{compare, parse_swap, write_comparison, Eigensystem};
use ffeatools::traj::{Equilibration, Measurements, TrajectoryReader, ROOM_TEMPERATURE_KT};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "ffeatools")]
#[command(author, version, about = "Preparation and analysis tools for FFEA simulations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose mode (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Node file (.node) or netgen volume (.vol)
        nodes: PathBuf,

        /// Topology file (.top, .ele), defaults to the node file
        topology: Option<PathBuf>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,

        /// List every element
        #[arg(long)]
        elements: bool,
    },

    /// Convert a tetgen or netgen mesh into FFEA blob files
    Convert {
        /// Node file (.node) or netgen volume (.vol)
        nodes: PathBuf,

        /// Element file (.ele), defaults to the node file
        topology: Option<PathBuf>,

        /// Output path without extension
        #[arg(short, long)]
        output: PathBuf,

        /// Multiply every coordinate by this factor
        #[arg(long, default_value = "1.0")]
        scale: f64,

        /// Decimal places for node coordinates
        #[arg(long, default_value_t = DEFAULT_PRECISION)]
        precision: usize,

        /// Elevate to second order elements
        #[arg(long)]
        elevate: bool,

        /// Write a .stokes file with this radius for every linear node
        #[arg(long)]
        stokes_radius: Option<f64>,

        /// Also write default .mat, .vdw and .pin files
        #[arg(long)]
        aux: bool,
    },

    /// Extract the outer surface of a topology
    Surface {
        /// Topology file (.top, .ele, .vol)
        topology: PathBuf,

        /// Output surface file (.surf)
        output: PathBuf,
    },

    /// Elevate FFEA blob files to second order
    Elevate {
        /// Node file (.node)
        nodes: PathBuf,

        /// Topology file (.top)
        topology: PathBuf,

        /// Surface file (.surf) to split alongside, extracted if not given
        #[arg(short, long)]
        surface: Option<PathBuf>,

        /// Stokes radii file (.stokes) to extend alongside
        #[arg(long)]
        stokes: Option<PathBuf>,

        /// Output path without extension
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Flip inverted elements so surface normals point outward
    Orient {
        /// Node file (.node) or netgen volume (.vol)
        nodes: PathBuf,

        /// Topology file (.top, .ele, .vol)
        topology: PathBuf,

        /// Output topology file (.top)
        output: PathBuf,
    },

    /// Write a mesh for visualisation
    Vtk {
        /// Node file (.node) or netgen volume (.vol)
        nodes: PathBuf,

        /// Topology file (.top, .ele), defaults to the node file
        topology: Option<PathBuf>,

        /// Output file, the extension is set by the format
        #[arg(short, long)]
        output: PathBuf,

        /// VTK file format
        #[arg(short, long, value_enum, default_value = "xml")]
        format: OutputFormat,

        /// Write the extracted surface instead of the elements
        #[arg(long)]
        surface: bool,

        /// Include element volumes or face areas
        #[arg(long)]
        size: bool,
    },

    /// Pin every node of a blob
    PinAll {
        /// Node file (.node)
        nodes: PathBuf,

        /// Output pin file (.pin)
        output: PathBuf,
    },

    /// Activate van der Waals faces on one side of a plane
    VdwHalfspace {
        /// Node file (.node)
        #[arg(short, long)]
        nodes: PathBuf,

        /// Surface file (.surf)
        #[arg(short, long)]
        surface: PathBuf,

        /// Existing vdw file (.vdw), otherwise every face starts inactive
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output vdw file (.vdw)
        #[arg(short, long)]
        output: PathBuf,

        /// Plane normal, pointing into the activated side
        #[arg(long, num_args = 3, required = true, allow_negative_numbers = true, value_names = ["X", "Y", "Z"])]
        normal: Vec<f64>,

        /// Any point in the plane
        #[arg(long, num_args = 3, required = true, allow_negative_numbers = true, value_names = ["X", "Y", "Z"])]
        point: Vec<f64>,

        /// Face type given to activated faces
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        index: i32,
    },

    /// Convert a netgen surface mesh to Wavefront OBJ
    SurfToObj {
        /// Netgen surface mesh
        input: PathBuf,

        /// Output file (.obj)
        output: PathBuf,
    },

    /// Move a mesh so its centroid matches a PDB structure
    AlignToPdb {
        /// Node file (.node) or netgen volume (.vol)
        input: PathBuf,

        /// Structure file (.pdb)
        pdb: PathBuf,

        /// Output file, of the same format as the input
        output: PathBuf,

        /// Decimal places for FFEA node coordinates
        #[arg(long, default_value_t = DEFAULT_PRECISION)]
        precision: usize,
    },

    /// Compare the modes of two eigensystems
    CompareModes {
        /// First eigenvalues (.evals)
        evals_a: PathBuf,

        /// Second eigenvalues (.evals)
        evals_b: PathBuf,

        /// First eigenvectors (.evecs)
        evecs_a: PathBuf,

        /// Second eigenvectors (.evecs)
        evecs_b: PathBuf,

        /// Output comparison matrix
        output: PathBuf,

        /// Swap two modes of the first system before comparing, e.g. 2,3
        #[arg(long = "swap", value_name = "A,B")]
        swaps: Vec<String>,
    },

    /// Extract node positions from a trajectory
    ExtractPositions {
        /// Trajectory file
        trajectory: PathBuf,

        /// Output file of x y z lines
        output: PathBuf,

        /// Only extract frames of one blob
        #[arg(long)]
        blob: Option<usize>,
    },

    /// Check measured energies against equipartition
    Equilibration {
        /// Global measurement file (.fm)
        measurement: PathBuf,

        /// Topology of every blob in the simulation, in blob order
        #[arg(required = true, num_args = 1..)]
        topologies: Vec<PathBuf>,

        /// Thermal energy kT, in the units of the measurement file
        #[arg(long, default_value_t = ROOM_TEMPERATURE_KT)]
        kt: f64,

        /// Index of a blob using a massless solver (repeatable)
        #[arg(long, value_name = "BLOB")]
        massless: Vec<usize>,

        /// Write running averages to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// VTK XML unstructured grid (.vtu)
    Xml,
    /// Legacy ASCII (.vtk)
    LegacyAscii,
    /// Legacy binary (.vtk)
    LegacyBinary,
}

impl From<OutputFormat> for VtkFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Xml => VtkFormat::Xml,
            OutputFormat::LegacyAscii => VtkFormat::LegacyAscii,
            OutputFormat::LegacyBinary => VtkFormat::LegacyBinary,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(cli: &Cli) -> CliResult<()> {
    stderrlog::new()
        .modules([
            "ffeatools",
            "ffeatools_blob",
            "ffeatools_mesh",
            "ffeatools_modes",
            "ffeatools_traj",
        ])
        .quiet(cli.quiet)
        .verbosity(1 + cli.verbose as usize)
        .show_module_names(cli.verbose > 1)
        .init()?;
    Ok(())
}

fn run(cli: Cli) -> CliResult<()> {
    let show_progress = !cli.quiet;

    match cli.command {
        Commands::Info {
            nodes,
            topology,
            json,
            elements,
        } => {
            cmd_info(&nodes, topology.as_deref(), json, elements)?;
        }

        Commands::Convert {
            nodes,
            topology,
            output,
            scale,
            precision,
            elevate,
            stokes_radius,
            aux,
        } => {
            let options = ConvertOptions {
                scale,
                precision,
                elevate,
                stokes_radius,
                aux,
            };
            cmd_convert(&nodes, topology.as_deref(), &output, &options)?;
        }

        Commands::Surface { topology, output } => {
            cmd_surface(&topology, &output)?;
        }

        Commands::Elevate {
            nodes,
            topology,
            surface,
            stokes,
            output,
        } => {
            cmd_elevate(&nodes, &topology, surface.as_deref(), stokes.as_deref(), &output)?;
        }

        Commands::Orient {
            nodes,
            topology,
            output,
        } => {
            cmd_orient(&nodes, &topology, &output)?;
        }

        Commands::Vtk {
            nodes,
            topology,
            output,
            format,
            surface,
            size,
        } => {
            cmd_vtk(&nodes, topology.as_deref(), &output, format.into(), surface, size)?;
        }

        Commands::PinAll { nodes, output } => {
            cmd_pin_all(&nodes, &output)?;
        }

        Commands::VdwHalfspace {
            nodes,
            surface,
            input,
            output,
            normal,
            point,
            index,
        } => {
            let normal = vector(&normal)?;
            let point = vector(&point)?;
            cmd_vdw_halfspace(&nodes, &surface, input.as_deref(), &output, normal, point, index)?;
        }

        Commands::SurfToObj { input, output } => {
            let mesh = read_netgen_surface(&input)?;
            write_obj(&mesh, &output)?;
        }

        Commands::AlignToPdb {
            input,
            pdb,
            output,
            precision,
        } => {
            cmd_align_to_pdb(&input, &pdb, &output, precision)?;
        }

        Commands::CompareModes {
            evals_a,
            evals_b,
            evecs_a,
            evecs_b,
            output,
            swaps,
        } => {
            let mut a = Eigensystem::read(&evals_a, &evecs_a)?;
            let b = Eigensystem::read(&evals_b, &evecs_b)?;
            for swap in &swaps {
                let (i, j) = parse_swap(swap)?;
                a.swap(i, j)?;
            }
            write_comparison(&compare(&a, &b)?, &output)?;
        }

        Commands::ExtractPositions {
            trajectory,
            output,
            blob,
        } => {
            let mut reader = TrajectoryReader::new();
            if !show_progress {
                reader.disable_progress();
            }
            if let Some(blob) = blob {
                reader.set_target_blob(blob);
            }
            let count = reader.extract_positions(&trajectory, &output)?;
            info!("Extracted {count} frames");
        }

        Commands::Equilibration {
            measurement,
            topologies,
            kt,
            massless,
            output,
        } => {
            cmd_equilibration(&measurement, &topologies, kt, &massless, output.as_deref())?;
        }
    }

    Ok(())
}

// ! ------------------------------------------------------------------------
// !                               Commands
// ! ------------------------------------------------------------------------

struct ConvertOptions {
    scale: f64,
    precision: usize,
    elevate: bool,
    stokes_radius: Option<f64>,
    aux: bool,
}

fn cmd_info(nodes: &Path, topology: Option<&Path>, json: bool, elements: bool) -> CliResult<()> {
    let (nodes, topology) = read_mesh(nodes, topology)?;
    let summary = topology.summary(&nodes)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Nodes:       {} ({} surface, {} interior)",
            summary.num_nodes, summary.num_surface_nodes, summary.num_interior_nodes
        );
        println!(
            "Elements:    {} ({} surface, {} interior)",
            summary.num_elements, summary.num_surface_elements, summary.num_interior_elements
        );
        match summary.order {
            Some(order) => println!("Order:       {:?}", order),
            None => println!("Order:       mixed"),
        }
        println!("Volume:      {:.6e}", summary.volume);
        let [x, y, z] = summary.centroid;
        println!("Centroid:    ({:.6e}, {:.6e}, {:.6e})", x, y, z);
        println!("Inverted:    {}", summary.num_inverted_elements);
    }

    if elements {
        println!("{topology}");
    }
    Ok(())
}

fn cmd_convert(
    nodes: &Path,
    topology: Option<&Path>,
    output: &Path,
    options: &ConvertOptions,
) -> CliResult<()> {
    let (mut nodes, mut topology) = read_mesh(nodes, topology)?;
    if options.scale != 1.0 {
        nodes.scale(options.scale);
    }

    topology.orient(&nodes)?;
    let mut surface = topology.extract_surface()?;
    topology.classify(&mut surface)?;

    let mut stokes = options
        .stokes_radius
        .map(|r| StokesRadii::uniform(nodes.num_nodes(), r));

    let map = if options.elevate {
        let (elevation, map) = topology.elevate_blob(&mut nodes, &mut surface)?;
        if let Some(stokes) = stokes.as_mut() {
            stokes.extend_elevated(&elevation)?;
        }
        map
    } else {
        topology.partition_surface_nodes(&mut nodes, &mut surface)?
    };
    info!(
        "{} surface nodes, {} surface faces",
        nodes.num_surface_nodes(),
        surface.num_faces()
    );

    write_nodes(&nodes, output.with_extension("node"), options.precision)?;
    write_topology(&topology, output.with_extension("top"))?;
    write_surface(&surface, output.with_extension("surf"))?;

    if let Some(mut stokes) = stokes {
        stokes.permute(&map)?;
        stokes.write(output.with_extension("stokes"))?;
    }

    if options.aux {
        MaterialParams::uniform(topology.num_elements(), Material::default())
            .write(output.with_extension("mat"))?;
        VdwFile::new(surface.num_faces()).write(output.with_extension("vdw"))?;
        PinFile::default().write(output.with_extension("pin"))?;
    }
    Ok(())
}

fn cmd_surface(topology: &Path, output: &Path) -> CliResult<()> {
    let surface = read_topology(topology)?.extract_surface()?;
    write_surface(&surface, output)?;
    Ok(())
}

fn cmd_elevate(
    nodes: &Path,
    topology: &Path,
    surface: Option<&Path>,
    stokes: Option<&Path>,
    output: &Path,
) -> CliResult<()> {
    let mut nodes = read_nodes(nodes)?;
    let mut topology = read_topology(topology)?;
    let mut surface = match surface {
        Some(path) => read_surface(path)?,
        None => topology.extract_surface()?,
    };
    let mut stokes = stokes.map(StokesRadii::read).transpose()?;

    let (elevation, map) = topology.elevate_blob(&mut nodes, &mut surface)?;
    info!(
        "{} surface nodes, {} surface faces",
        nodes.num_surface_nodes(),
        surface.num_faces()
    );

    write_nodes(&nodes, output.with_extension("node"), DEFAULT_PRECISION)?;
    write_topology(&topology, output.with_extension("top"))?;
    write_surface(&surface, output.with_extension("surf"))?;
    if let Some(stokes) = stokes.as_mut() {
        stokes.extend_elevated(&elevation)?;
        stokes.permute(&map)?;
        stokes.write(output.with_extension("stokes"))?;
    }
    Ok(())
}

fn cmd_orient(nodes: &Path, topology: &Path, output: &Path) -> CliResult<()> {
    let surf = neighbouring_surface(topology);
    let nodes = read_nodes(nodes)?;
    let mut topology = read_topology(topology)?;
    let flipped = topology.orient(&nodes)?;
    info!("{flipped} of {} elements flipped", topology.num_elements());
    if let Some(surf) = surf.filter(|_| flipped > 0) {
        warn!(
            "{} may now have the wrong winding, regenerate it with `ffeatools surface`",
            surf.display()
        );
    }
    write_topology(&topology, output)?;
    Ok(())
}

/// Surface file sharing a stem with the topology, if one exists
fn neighbouring_surface(topology: &Path) -> Option<PathBuf> {
    let surf = topology.with_extension("surf");
    surf.exists().then_some(surf)
}

fn cmd_equilibration(
    measurement: &Path,
    topologies: &[PathBuf],
    kt: f64,
    massless: &[usize],
    output: Option<&Path>,
) -> CliResult<()> {
    if let Some(index) = massless.iter().find(|&&i| i >= topologies.len()) {
        warn!("No blob {index} among {} topologies", topologies.len());
    }

    let mut num_nodes = 0;
    let mut num_mass_nodes = 0;
    for (i, path) in topologies.iter().enumerate() {
        let n = read_topology(path)?.linear_nodes().len();
        num_nodes += n;
        if !massless.contains(&i) {
            num_mass_nodes += n;
        }
    }

    let measurements = Measurements::read(measurement)?;
    let mut check = Equilibration::new(kt, num_nodes);
    check.set_mass_nodes(num_mass_nodes);

    let report = check.check(&measurements)?;
    println!("Global system over {} steps:", report.num_steps);
    println!("{report}");

    if let Some(output) = output {
        check.write_running_average(&measurements, output)?;
    }
    Ok(())
}

fn cmd_vtk(
    nodes: &Path,
    topology: Option<&Path>,
    output: &Path,
    format: VtkFormat,
    surface: bool,
    size: bool,
) -> CliResult<()> {
    let (nodes, topology) = read_mesh(nodes, topology)?;
    let converter = TopologyToVtk::builder().include_size(size).build();

    let vtk = if surface {
        converter.convert_surface(&nodes, &topology.extract_surface()?)?
    } else {
        converter.convert(&nodes, &topology)?
    };
    write_vtk(vtk, output, format)?;
    Ok(())
}

fn cmd_pin_all(nodes: &Path, output: &Path) -> CliResult<()> {
    let nodes = read_nodes(nodes)?;
    PinFile::all(nodes.num_nodes()).write(output)?;
    Ok(())
}

fn cmd_vdw_halfspace(
    nodes: &Path,
    surface: &Path,
    input: Option<&Path>,
    output: &Path,
    normal: Vector3<f64>,
    point: Vector3<f64>,
    index: i32,
) -> CliResult<()> {
    let nodes = read_nodes(nodes)?;
    let surface = read_surface(surface)?;
    let mut vdw = match input {
        Some(path) => VdwFile::read(path)?,
        None => VdwFile::new(surface.num_faces()),
    };

    let count = vdw.activate_halfspace(&surface, &nodes, normal, point, index)?;
    info!("{count} of {} faces set to type {index}", vdw.num_faces());
    vdw.write(output)?;
    Ok(())
}

fn cmd_align_to_pdb(input: &Path, pdb: &Path, output: &Path, precision: usize) -> CliResult<()> {
    let target = read_pdb_centroid(pdb)?;
    let mut nodes = read_nodes(input)?;
    let translation = target - nodes.centroid();
    info!(
        "Translating by ({:.6e}, {:.6e}, {:.6e})",
        translation.x, translation.y, translation.z
    );
    nodes.translate(translation);

    match MeshFormat::from_path(input)? {
        MeshFormat::NetgenVolume => {
            let topology = read_topology(input)?;
            let surface = topology.extract_surface()?;
            write_netgen_vol(&topology, &nodes, Some(&surface), output)?;
        }
        MeshFormat::FfeaNode => write_nodes(&nodes, output, precision)?,
        format => {
            warn!("{format} cannot be written, saving as an FFEA node file");
            write_nodes(&nodes, output, precision)?;
        }
    }
    Ok(())
}

// ! ------------------------------------------------------------------------
// !                               Helpers
// ! ------------------------------------------------------------------------

/// Nodes and elements, from one file or a pair
fn read_mesh(nodes: &Path, topology: Option<&Path>) -> CliResult<(NodeSet, Topology)> {
    let topology = read_topology(topology.unwrap_or(nodes))?;
    let nodes = read_nodes(nodes)?;
    topology.check_nodes(&nodes)?;
    Ok((nodes, topology))
}

fn vector(values: &[f64]) -> CliResult<Vector3<f64>> {
    match values {
        [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
        _ => Err(format!("expected 3 components, found {}", values.len()).into()),
    }
}
