//! Shared file handling for the auxiliary readers and writers

// crate modules
use crate::error::Result;

// ffeatools modules
use ffeatools_utils::LineReader;

// standard library
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

// external crates
use log::info;

pub(crate) fn open_reader(path: &Path) -> Result<LineReader<BufReader<File>>> {
    info!("Reading {}", path.display());
    Ok(LineReader::open(path)?)
}

pub(crate) fn init_writer(path: &Path) -> Result<BufWriter<File>> {
    info!("Writing {}", path.display());
    let file = File::create(path)?;
    Ok(BufWriter::new(file))
}
