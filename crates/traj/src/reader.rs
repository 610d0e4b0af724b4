//! Frame-by-frame reading of FFEA trajectories

// crate modules
use crate::error::{Error, Result};
use crate::parsers::{self, FrameHeader};

// ffeatools modules
use ffeatools_utils::{FloatExt, LineReader};

// standard library
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

// external crates
use kdam::{Bar, BarBuilder, BarExt};
use log::{debug, info, trace};
use nalgebra::Vector3;
use nom::IResult;

/// A single blob at a single step
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Blob index
    pub blob: usize,
    /// Conformation index, only written by newer versions of FFEA
    pub conformation: Option<usize>,
    /// Simulation step
    pub step: u64,
    /// Node positions, `None` for a static blob
    pub positions: Option<Vec<Vector3<f64>>>,
}

impl Frame {
    /// Check if the blob was static, i.e. has no node data
    pub fn is_static(&self) -> bool {
        self.positions.is_none()
    }

    /// Number of nodes written for this frame
    pub fn num_nodes(&self) -> usize {
        self.positions.as_ref().map_or(0, |p| p.len())
    }
}

/// Reader for FFEA trajectory files
///
/// Each frame looks like
///
/// ```text
/// *
/// Blob 0, step 100
/// DYNAMIC
/// 8
/// x y z ...
/// ```
///
/// where `*` separators and the `DYNAMIC` line are optional and only the
/// first three values of a node line are used. A static blob writes `STATIC`
/// in place of any node data. Anything before the first frame header is
/// treated as preamble and skipped.
///
/// A `kdam` progress counter is shown on stderr unless disabled.
///
/// ```rust, no_run
/// # use ffeatools_traj::TrajectoryReader;
/// let mut reader = TrajectoryReader::new();
/// reader.disable_progress();
/// let frames = reader.read("path/to/trajectory.out").unwrap();
/// ```
#[derive(Debug, Default)]
pub struct TrajectoryReader {
    /// Disable progress bar?
    disable_progress: bool,
    /// Only keep frames of a single blob
    target_blob: Option<usize>,
}

impl TrajectoryReader {
    /// Just calls Default::default(), nothing special to be initialised
    pub fn new() -> Self {
        Default::default()
    }

    /// Do not print the progress indicator
    pub fn disable_progress(&mut self) {
        self.disable_progress = true;
    }

    /// Setter for only reading frames of one blob
    pub fn set_target_blob(&mut self, blob: usize) {
        self.target_blob = Some(blob);
    }

    /// Read every frame in a trajectory file
    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Frame>> {
        let path = path.as_ref();
        info!("Reading trajectory {}", path.display());
        let mut frames = Vec::new();
        self.for_each_frame(&mut LineReader::open(path)?, |frame| {
            frames.push(frame);
            Ok(())
        })?;
        Ok(frames)
    }

    /// Write the position of every node in every dynamic frame
    ///
    /// One `x y z` line per node in C-style scientific notation. Static
    /// frames contribute nothing. Returns the number of frames written.
    pub fn extract_positions<P, Q>(&self, trajectory: P, xyz: Q) -> Result<usize>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let trajectory = trajectory.as_ref();
        let xyz = xyz.as_ref();
        info!("Extracting positions from {}", trajectory.display());

        let mut reader = LineReader::open(trajectory)?;
        let mut writer = BufWriter::new(File::create(xyz)?);
        let mut count = 0;

        self.for_each_frame(&mut reader, |frame| {
            if let Some(positions) = &frame.positions {
                for p in positions {
                    let [x, y, z] = [p.x, p.y, p.z].map(|v| v.sci(6, 2));
                    writeln!(writer, "{x} {y} {z}")?;
                }
                count += 1;
            }
            Ok(())
        })?;

        writer.flush()?;
        info!("Wrote {count} frames to {}", xyz.display());
        Ok(count)
    }

    /// Stream frames to a callback, keeping memory use flat for large files
    pub fn for_each_frame<R, F>(&self, reader: &mut LineReader<R>, mut callback: F) -> Result<()>
    where
        R: BufRead,
        F: FnMut(Frame) -> Result<()>,
    {
        let mut progress_bar = self.init_progress_bar()?;
        if !self.disable_progress {
            progress_bar.refresh()?;
        }

        let mut num_frames = 0;
        while let Some(header) = next_header(reader, num_frames == 0)? {
            let frame = read_frame(reader, header)?;
            progress_bar.update(1)?;
            num_frames += 1;

            if self.target_blob.map_or(true, |b| b == frame.blob) {
                callback(frame)?;
            }
        }

        // need an extra line for clean spacing if the progress bar is printed
        if !self.disable_progress {
            eprintln!()
        };

        if num_frames == 0 {
            return Err(Error::NoFrames);
        }
        debug!("Read {num_frames} frames");
        Ok(())
    }

    /// Initialise the progress bar, if wanted
    fn init_progress_bar(&self) -> Result<Bar> {
        BarBuilder::default()
            .unit(" frames")
            .unit_scale(true)
            .disable(self.disable_progress)
            .bar_format("{count} frames [{rate} frames/s]   ")
            .build()
            .map_err(Error::ProgressBar)
    }
}

/// Read every frame of a trajectory file with default settings
pub fn read_trajectory<P: AsRef<Path>>(path: P) -> Result<Vec<Frame>> {
    let mut reader = TrajectoryReader::new();
    reader.disable_progress();
    reader.read(path)
}

/// Write node positions from every dynamic frame, see
/// [TrajectoryReader::extract_positions]
pub fn extract_positions<P: AsRef<Path>, Q: AsRef<Path>>(trajectory: P, xyz: Q) -> Result<usize> {
    TrajectoryReader::new().extract_positions(trajectory, xyz)
}

/// Find the next frame header, or `None` at the end of the file
///
/// Unrecognised lines are only allowed before the first frame.
fn next_header<R: BufRead>(
    reader: &mut LineReader<R>,
    in_preamble: bool,
) -> Result<Option<FrameHeader>> {
    loop {
        let line = match reader.next_line() {
            Ok(line) => line,
            Err(ffeatools_utils::Error::EndOfFile) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if line.trim().is_empty() || parsers::is_separator(line) {
            continue;
        }

        if let Some(header) = parsers::frame_header(line).ok().map(|(_, h)| h) {
            return Ok(Some(header));
        }

        if !in_preamble {
            return Err(parse_error(reader));
        }
        trace!("Skipping preamble line {}", reader.line_number());
    }
}

fn read_frame<R: BufRead>(reader: &mut LineReader<R>, header: FrameHeader) -> Result<Frame> {
    let truncated = |e: ffeatools_utils::Error| match e {
        ffeatools_utils::Error::EndOfFile => Error::TruncatedFrame {
            blob: header.blob,
            step: header.step,
        },
        e => e.into(),
    };

    let mut frame = Frame {
        blob: header.blob,
        conformation: header.conformation,
        step: header.step,
        positions: None,
    };

    let line = reader.next_content().map_err(truncated)?;
    if parsers::is_static(line) {
        return Ok(frame);
    }
    if parsers::is_dynamic(line) {
        reader.next_content().map_err(truncated)?;
    }
    let num_nodes = parse_current(reader, parsers::node_count)?;

    let mut positions = Vec::with_capacity(num_nodes);
    for _ in 0..num_nodes {
        reader.next_content().map_err(truncated)?;
        let [x, y, z] = parse_current(reader, parsers::position)?;
        positions.push(Vector3::new(x, y, z));
    }

    frame.positions = Some(positions);
    Ok(frame)
}

pub(crate) fn parse_current<R, T, P>(reader: &LineReader<R>, mut parser: P) -> Result<T>
where
    R: BufRead,
    P: FnMut(&str) -> IResult<&str, T>,
{
    match parser(reader.current()).ok().map(|(_, value)| value) {
        Some(value) => Ok(value),
        None => Err(parse_error(reader)),
    }
}

pub(crate) fn parse_error<R: BufRead>(reader: &LineReader<R>) -> Error {
    Error::ParseError {
        line: reader.line_number(),
        text: reader.current().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRAJECTORY: &str = "FFEA_trajectory_file\n\
                              \n\
                              Initialisation:\n\
                              Number of Blobs 2\n\
                              *\n\
                              Blob 0, step 0\n\
                              DYNAMIC\n\
                              2\n\
                              0.0 0.0 0.0 0 0 0 0 0 0 0\n\
                              1.0 0.0 0.0 0 0 0 0 0 0 0\n\
                              Blob 1, step 0\n\
                              STATIC\n\
                              *\n\
                              Blob 0, step 100\n\
                              2\n\
                              0.5 0.0 0.0 0 0 0 0 0 0 0\n\
                              1.5 0.0 0.0 0 0 0 0 0 0 0\n";

    fn frames(reader: &TrajectoryReader, text: &str) -> Result<Vec<Frame>> {
        let mut frames = Vec::new();
        reader.for_each_frame(&mut LineReader::new(text.as_bytes()), |f| {
            frames.push(f);
            Ok(())
        })?;
        Ok(frames)
    }

    fn quiet() -> TrajectoryReader {
        let mut reader = TrajectoryReader::new();
        reader.disable_progress();
        reader
    }

    #[test]
    fn all_frames() {
        let frames = frames(&quiet(), TRAJECTORY).unwrap();
        assert_eq!(frames.len(), 3);
        assert!(frames[1].is_static());
        assert_eq!(frames[2].step, 100);
        assert_eq!(frames[2].num_nodes(), 2);
        assert_eq!(frames[2].positions.as_ref().unwrap()[1].x, 1.5);
    }

    #[test]
    fn target_blob() {
        let mut reader = quiet();
        reader.set_target_blob(1);
        let frames = frames(&reader, TRAJECTORY).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].blob, 1);
    }

    #[test]
    fn truncated() {
        let text = "Blob 0, step 0\n3\n0 0 0\n1 1 1\n";
        assert!(matches!(
            frames(&quiet(), text),
            Err(Error::TruncatedFrame { blob: 0, step: 0 })
        ));
    }

    #[test]
    fn garbage_between_frames() {
        let text = "Blob 0, step 0\nSTATIC\nnonsense\nBlob 0, step 1\nSTATIC\n";
        assert!(matches!(
            frames(&quiet(), text),
            Err(Error::ParseError { line: 3, .. })
        ));
    }

    #[test]
    fn empty() {
        assert!(matches!(frames(&quiet(), "preamble\n"), Err(Error::NoFrames)));
    }
}
