//! Equipartition checks on measured blob energies
//!
//! A blob in thermal equilibrium holds `kT/2` of strain energy per elastic
//! degree of freedom. With `N` linear nodes there are `3N - 6` of these once
//! rigid body motion is removed, and the running mean of the measured strain
//! energy should settle on `(3N - 6)/2 kT`. Kinetic energy should likewise
//! settle on `3M/2 kT` for the `M` nodes that carry mass.

// crate modules
use crate::error::{Error, Result};
use crate::parsers;
use crate::reader::{parse_current, parse_error};

// ffeatools modules
use ffeatools_utils::{f, FloatExt, LineReader};

// standard library
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

// external crates
use log::{debug, info, warn};

/// Thermal energy at 298 K, in joules
pub const ROOM_TEMPERATURE_KT: f64 = 4.11e-21;

/// Energy columns of a global measurement file
///
/// The file may start with any amount of preamble. The first line whose first
/// word is `Time` names the columns, and every following line is a row of
/// numbers.
///
/// ```text
/// Measurements:
/// Time          KineticEnergy   StrainEnergy    Centroid.x ...
/// 0.000000e+00  4.932000e-20    3.699000e-20    5.0e-10 ...
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Measurements {
    /// Simulation time in seconds
    pub time: Vec<f64>,
    /// Total strain energy in joules
    pub strain_energy: Vec<f64>,
    /// Total kinetic energy in joules, if the simulation had mass
    pub kinetic_energy: Option<Vec<f64>>,
}

impl Measurements {
    /// Read the energy columns of a measurement file
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Reading measurements {}", path.display());
        Self::parse(&mut LineReader::open(path)?)
    }

    /// Parse measurements from any line reader
    pub fn parse<R: BufRead>(reader: &mut LineReader<R>) -> Result<Self> {
        let columns = match reader.skip_until(parsers::is_column_header) {
            Ok(line) => line
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<String>>(),
            Err(ffeatools_utils::Error::EndOfFile) => return Err(Error::MissingColumn("Time")),
            Err(e) => return Err(e.into()),
        };
        let position = |name: &str| columns.iter().position(|c| c == name);

        let strain = position("StrainEnergy").ok_or(Error::MissingColumn("StrainEnergy"))?;
        let kinetic = position("KineticEnergy");
        debug!("Measurement columns: {}", columns.join(", "));

        let mut measurements = Self {
            kinetic_energy: kinetic.map(|_| Vec::new()),
            ..Default::default()
        };

        loop {
            match reader.next_content() {
                Ok(_) => (),
                Err(ffeatools_utils::Error::EndOfFile) => break,
                Err(e) => return Err(e.into()),
            }

            let row = parse_current(reader, parsers::measurement_row)?;
            if row.len() != columns.len() {
                return Err(parse_error(reader));
            }

            measurements.time.push(row[0]);
            measurements.strain_energy.push(row[strain]);
            if let (Some(k), Some(energy)) = (kinetic, measurements.kinetic_energy.as_mut()) {
                energy.push(row[k]);
            }
        }

        if measurements.time.is_empty() {
            return Err(Error::NoMeasurements);
        }
        Ok(measurements)
    }

    /// Number of measured steps
    pub fn num_steps(&self) -> usize {
        self.time.len()
    }
}

/// Mean of every leading slice, `out[i] = mean(values[0..=i])`
///
/// ```rust
/// # use ffeatools_traj::running_mean;
/// assert_eq!(running_mean(&[2.0, 4.0, 0.0]), vec![2.0, 3.0, 2.0]);
/// ```
pub fn running_mean(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |sum, v| {
            *sum += v;
            Some(*sum)
        })
        .enumerate()
        .map(|(i, sum)| sum / (i + 1) as f64)
        .collect()
}

/// Theory against simulation for one kind of energy, in units of kT
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyCheck {
    /// Equipartition value
    pub expected: f64,
    /// Mean over the whole run
    pub simulated: f64,
    /// Absolute difference as a percentage of `expected`
    pub error: f64,
}

impl EnergyCheck {
    fn new(expected: f64, simulated: f64) -> Self {
        Self {
            expected,
            simulated,
            error: (simulated - expected).abs() / expected * 100.0,
        }
    }
}

/// Result of [Equilibration::check]
#[derive(Debug, Clone, PartialEq)]
pub struct EquilibrationReport {
    /// Number of measured steps averaged over
    pub num_steps: usize,
    /// Strain energy check
    pub strain: EnergyCheck,
    /// Kinetic energy check, if measured and any node has mass
    pub kinetic: Option<EnergyCheck>,
}

impl std::fmt::Display for EquilibrationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let line = |kind: &str, check: &EnergyCheck| {
            f!(
                "Theoretical {kind} energy = {:.6}; Simulation {kind} energy = {:.6}; Error is {:.6}%",
                check.expected, check.simulated, check.error
            )
        };
        write!(f, "{}", line("strain", &self.strain))?;
        if let Some(kinetic) = &self.kinetic {
            write!(f, "\n{}", line("kinetic", kinetic))?;
        }
        Ok(())
    }
}

/// Equipartition test for a system of blobs
///
/// ```rust
/// # use ffeatools_traj::{Equilibration, Measurements};
/// let measurements = Measurements {
///     time: vec![0.0, 1e-12],
///     strain_energy: vec![8.0, 10.0],
///     kinetic_energy: None,
/// };
///
/// // 8 linear nodes at kT = 1 should hold (3*8 - 6)/2 = 9 kT
/// let report = Equilibration::new(1.0, 8).check(&measurements).unwrap();
/// assert_eq!(report.strain.expected, 9.0);
/// assert_eq!(report.strain.simulated, 9.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Equilibration {
    /// Thermal energy in the units of the measurement file
    pub kt: f64,
    /// Linear nodes across every blob
    pub num_nodes: usize,
    /// Linear nodes of blobs with mass, all of them unless set otherwise
    pub num_mass_nodes: usize,
}

impl Equilibration {
    /// Every node is assumed to carry mass
    pub fn new(kt: f64, num_nodes: usize) -> Self {
        Self {
            kt,
            num_nodes,
            num_mass_nodes: num_nodes,
        }
    }

    /// Setter for the number of nodes carrying mass, 0 for massless solvers
    pub fn set_mass_nodes(&mut self, num_mass_nodes: usize) {
        self.num_mass_nodes = num_mass_nodes;
    }

    /// Equipartition strain energy in kT
    pub fn expected_strain(&self) -> Result<f64> {
        match (3 * self.num_nodes).checked_sub(6) {
            Some(dof) if dof > 0 => Ok(dof as f64 / 2.0),
            _ => Err(Error::TooFewNodes(self.num_nodes)),
        }
    }

    /// Equipartition kinetic energy in kT, `None` without mass
    pub fn expected_kinetic(&self) -> Option<f64> {
        (self.num_mass_nodes > 0).then(|| (3 * self.num_mass_nodes) as f64 / 2.0)
    }

    /// Compare the mean energies of a whole run against equipartition
    pub fn check(&self, measurements: &Measurements) -> Result<EquilibrationReport> {
        self.check_kt()?;
        if measurements.time.is_empty() {
            return Err(Error::NoMeasurements);
        }

        let strain = EnergyCheck::new(
            self.expected_strain()?,
            self.mean_kt(&measurements.strain_energy),
        );

        let kinetic = match (&measurements.kinetic_energy, self.expected_kinetic()) {
            (Some(energy), Some(expected)) => {
                Some(EnergyCheck::new(expected, self.mean_kt(energy)))
            }
            (Some(_), None) => {
                warn!("Kinetic energy measured but no node carries mass, skipping");
                None
            }
            _ => None,
        };

        if strain.error > 10.0 {
            warn!("Strain energy is {:.1}% from equipartition", strain.error);
        }

        Ok(EquilibrationReport {
            num_steps: measurements.num_steps(),
            strain,
            kinetic,
        })
    }

    /// Write the running mean energies next to their theory values
    ///
    /// Columns are time in ns, strain and theory in kT, then kinetic and
    /// theory in kT when available.
    pub fn write_running_average<P: AsRef<Path>>(
        &self,
        measurements: &Measurements,
        path: P,
    ) -> Result<()> {
        self.check_kt()?;
        let path = path.as_ref();
        info!("Writing running averages to {}", path.display());
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(measurements, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    fn write_to<W: Write>(&self, measurements: &Measurements, writer: &mut W) -> Result<()> {
        let strain_theory = self.expected_strain()?;
        let strain = self.running_kt(&measurements.strain_energy);
        let kinetic = match (&measurements.kinetic_energy, self.expected_kinetic()) {
            (Some(energy), Some(theory)) => Some((self.running_kt(energy), theory)),
            _ => None,
        };

        let mut header = "# time(ns) strain(kT) strain_theory(kT)".to_string();
        if kinetic.is_some() {
            header += " kinetic(kT) kinetic_theory(kT)";
        }
        writeln!(writer, "{header}")?;

        for (i, time) in measurements.time.iter().enumerate() {
            let mut row = vec![time * 1e9, strain[i], strain_theory];
            if let Some((energy, theory)) = &kinetic {
                row.extend([energy[i], *theory]);
            }
            let row = row.iter().map(|v| v.sci(6, 2)).collect::<Vec<String>>();
            writeln!(writer, "{}", row.join(" "))?;
        }
        Ok(())
    }

    fn check_kt(&self) -> Result<()> {
        if self.kt > 0.0 && self.kt.is_finite() {
            Ok(())
        } else {
            Err(Error::InvalidThermalEnergy(self.kt))
        }
    }

    fn mean_kt(&self, energy: &[f64]) -> f64 {
        energy.iter().sum::<f64>() / energy.len() as f64 / self.kt
    }

    fn running_kt(&self, energy: &[f64]) -> Vec<f64> {
        running_mean(energy).iter().map(|e| e / self.kt).collect()
    }
}
