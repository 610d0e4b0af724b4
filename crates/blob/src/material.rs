//! Per-element material parameters

// crate modules
use crate::error::{Error, Result};
use crate::io::{init_writer, open_reader};

// ffeatools modules
use ffeatools_mesh::reader::parsers::{expect_header, header_count, parse_next, vector_of_f64};
use ffeatools_utils::{FloatExt, LineReader, PermuteExt};

// standard library
use std::io::{BufRead, Write};
use std::path::Path;

/// Number of values on every line of a material file
pub const NUM_PARAMETERS: usize = 6;

/// Continuum properties of a single element, in SI units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub density: f64,
    pub shear_viscosity: f64,
    pub bulk_viscosity: f64,
    pub shear_modulus: f64,
    pub bulk_modulus: f64,
    pub dielectric: f64,
}

impl Material {
    fn from_values(values: [f64; NUM_PARAMETERS]) -> Self {
        let [density, shear_viscosity, bulk_viscosity, shear_modulus, bulk_modulus, dielectric] =
            values;
        Self {
            density,
            shear_viscosity,
            bulk_viscosity,
            shear_modulus,
            bulk_modulus,
            dielectric,
        }
    }

    fn values(&self) -> [f64; NUM_PARAMETERS] {
        [
            self.density,
            self.shear_viscosity,
            self.bulk_viscosity,
            self.shear_modulus,
            self.bulk_modulus,
            self.dielectric,
        ]
    }
}

impl Default for Material {
    /// Typical globular protein
    fn default() -> Self {
        Self {
            density: 1.5e3,
            shear_viscosity: 1e-3,
            bulk_viscosity: 1e-3,
            shear_modulus: 3.7e8,
            bulk_modulus: 1.11e9,
            dielectric: 1.0,
        }
    }
}

/// Material parameters of every element in a blob
///
/// Columns are density, shear viscosity, bulk viscosity, shear modulus, bulk
/// modulus and dielectric constant.
///
/// ```text
/// ffea material params file
/// num_elements 5
/// 1.500000e+03 1.000000e-03 1.000000e-03 3.700000e+08 1.110000e+09 1.000000e+00
/// ...
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaterialParams {
    /// One material per element, in topology order
    pub materials: Vec<Material>,
}

impl MaterialParams {
    /// The same material for every element
    pub fn uniform(num_elements: usize, material: Material) -> Self {
        Self {
            materials: vec![material; num_elements],
        }
    }

    /// Read a `.mat` file
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::parse(&mut open_reader(path.as_ref())?)
    }

    /// Parse the contents of a `.mat` file
    pub fn parse<R: BufRead>(reader: &mut LineReader<R>) -> Result<Self> {
        expect_header(reader, &["ffea material params file"])?;
        let num_elements = parse_next(reader, |i| header_count(i, "num_elements"))?;

        let mut materials = Vec::with_capacity(num_elements);
        for _ in 0..num_elements {
            let values = parse_next(reader, vector_of_f64)?;
            let values: [f64; NUM_PARAMETERS] =
                values
                    .try_into()
                    .map_err(|v: Vec<f64>| Error::InvalidMaterial {
                        line: reader.line_number(),
                        expected: NUM_PARAMETERS,
                        found: v.len(),
                    })?;
            materials.push(Material::from_values(values));
        }
        Ok(Self { materials })
    }

    /// Write to a `.mat` file
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = init_writer(path.as_ref())?;
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "ffea material params file")?;
        writeln!(writer, "num_elements {}", self.num_elements())?;
        for material in &self.materials {
            let values = material.values().map(|v| v.sci(6, 2));
            writeln!(writer, "{}", values.join(" "))?;
        }
        Ok(())
    }

    /// Number of elements
    pub fn num_elements(&self) -> usize {
        self.materials.len()
    }

    /// Density of every element, for [Topology::mass](ffeatools_mesh::Topology::mass)
    pub fn densities(&self) -> Vec<f64> {
        self.materials.iter().map(|m| m.density).collect()
    }

    /// Follow an element reordering, e.g. the map returned by
    /// [Topology::classify](ffeatools_mesh::Topology::classify)
    pub fn permute(&mut self, map: &[usize]) -> Result<()> {
        let materials = std::mem::take(&mut self.materials);
        self.materials = materials.permute(map)?;
        Ok(())
    }
}
