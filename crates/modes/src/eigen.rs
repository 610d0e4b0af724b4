//! Eigensystems and their comparison

// crate modules
use crate::error::{Error, Result};
use crate::reader::{read_evals, read_evecs};

// ffeatools modules
use ffeatools_utils::f;

// standard library
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

// external crates
use log::{debug, info};
use nalgebra::{DMatrix, DVector};

/// Principal components of a trajectory
///
/// Mode `i` is the pair `(values[i], vectors[i])`.
#[derive(Debug, Clone, PartialEq)]
pub struct Eigensystem {
    /// Eigenvalues, as mean square fluctuations
    pub values: Vec<f64>,
    /// Eigenvectors, all with the same dimension
    pub vectors: Vec<DVector<f64>>,
}

impl Eigensystem {
    /// Pair up eigenvalues and eigenvectors, which must have equal counts
    pub fn new(values: Vec<f64>, vectors: Vec<DVector<f64>>) -> Result<Self> {
        if values.len() != vectors.len() {
            return Err(Error::UnexpectedCount {
                what: "eigenvectors",
                expected: values.len(),
                found: vectors.len(),
            });
        }
        Ok(Self { values, vectors })
    }

    /// Read an eigensystem from a pair of `.evals` and `.evecs` files
    pub fn read<P: AsRef<Path>>(evals: P, evecs: P) -> Result<Self> {
        Self::new(read_evals(evals)?, read_evecs(evecs)?)
    }

    /// Number of modes
    pub fn num_modes(&self) -> usize {
        self.values.len()
    }

    /// Number of components in each eigenvector
    pub fn dimension(&self) -> usize {
        self.vectors.first().map_or(0, |v| v.len())
    }

    /// Exchange two modes
    ///
    /// Used to line up modes that swap places between otherwise similar
    /// systems.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<()> {
        let length = self.num_modes();
        if let Some(&index) = [a, b].iter().find(|&&i| i >= length) {
            return Err(Error::ModeOutOfRange { index, length });
        }
        debug!("Swapping modes {a} and {b}");
        self.values.swap(a, b);
        self.vectors.swap(a, b);
        Ok(())
    }
}

/// Parse a mode swap written as `a,b`
///
/// ```rust
/// # use ffeatools_modes::parse_swap;
/// assert_eq!(parse_swap("2,3").unwrap(), (2, 3));
/// assert!(parse_swap("2").is_err());
/// ```
pub fn parse_swap(text: &str) -> Result<(usize, usize)> {
    let invalid = || Error::InvalidSwap(text.to_string());
    let (a, b) = text.split_once(',').ok_or_else(invalid)?;
    let a = a.trim().parse().map_err(|_| invalid())?;
    let b = b.trim().parse().map_err(|_| invalid())?;
    Ok((a, b))
}

/// Absolute dot product of every pair of modes
///
/// Element `(i, j)` is `|a_i . b_j|`, which is 1 for identical unit modes and
/// 0 for orthogonal ones.
///
/// ```rust
/// # use ffeatools_modes::{compare, Eigensystem};
/// # use nalgebra::DVector;
/// let x = DVector::from_vec(vec![1.0, 0.0]);
/// let y = DVector::from_vec(vec![0.0, -1.0]);
/// let a = Eigensystem::new(vec![2.0, 1.0], vec![x.clone(), y.clone()]).unwrap();
/// let b = Eigensystem::new(vec![2.0, 1.0], vec![y, x]).unwrap();
///
/// let matrix = compare(&a, &b).unwrap();
/// assert_eq!(matrix[(0, 1)], 1.0);
/// assert_eq!(matrix[(0, 0)], 0.0);
/// ```
pub fn compare(a: &Eigensystem, b: &Eigensystem) -> Result<DMatrix<f64>> {
    if a.dimension() != b.dimension() {
        return Err(Error::UnexpectedCount {
            what: "eigenvector components",
            expected: a.dimension(),
            found: b.dimension(),
        });
    }

    let matrix = DMatrix::from_fn(a.num_modes(), b.num_modes(), |i, j| {
        a.vectors[i].dot(&b.vectors[j]).abs()
    });
    Ok(matrix)
}

/// Write a comparison matrix as text
///
/// One row per mode of the first system, values written as `%6.3f`.
pub fn write_comparison<P: AsRef<Path>>(matrix: &DMatrix<f64>, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Writing comparison matrix to {}", path.display());
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(comparison_table(matrix).as_bytes())?;
    writer.flush()?;
    Ok(())
}

fn comparison_table(matrix: &DMatrix<f64>) -> String {
    let mut s = "Compare pyPca modes\n\nEigen Set 1 x Eigen Set 2\n\n".to_string();
    for row in matrix.row_iter() {
        for value in row.iter() {
            s += &f!("{value:6.3} ");
        }
        s.push('\n');
    }
    s
}
