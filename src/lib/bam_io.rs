//! Opening BAM inputs and report outputs.
//!
//! BAM input is BGZF compressed. With one thread (or zero) blocks are inflated on the calling
//! thread; with more, noodles' multithreaded reader inflates them on a worker pool. Input may
//! be a regular file or standard input (`-` or `/dev/stdin`), and report output may go to
//! standard output (`-` or `/dev/stdout`).

use anyhow::{Context, Result};
use noodles::bgzf::io::{MultithreadedReader, Reader as BgzfReader};
use noodles::sam::Header;
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Read, Write};
use std::num::NonZero;
use std::path::Path;

/// Byte source underneath the BGZF layer: an opened file or standard input.
pub type InputSource = Box<dyn Read + Send>;

/// BGZF decoder chosen by thread count.
pub enum BgzfReaderEnum {
    /// Decodes blocks on the calling thread
    SingleThreaded(BgzfReader<InputSource>),
    /// Decodes blocks on a pool of worker threads
    MultiThreaded(MultithreadedReader<InputSource>),
}

impl Read for BgzfReaderEnum {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            BgzfReaderEnum::SingleThreaded(r) => r.read(buf),
            BgzfReaderEnum::MultiThreaded(r) => r.read(buf),
        }
    }
}

impl BufRead for BgzfReaderEnum {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            BgzfReaderEnum::SingleThreaded(r) => r.fill_buf(),
            BgzfReaderEnum::MultiThreaded(r) => r.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            BgzfReaderEnum::SingleThreaded(r) => r.consume(amt),
            BgzfReaderEnum::MultiThreaded(r) => r.consume(amt),
        }
    }
}

/// BAM reader over either BGZF decoder.
pub type BamReaderAuto = noodles::bam::io::Reader<BgzfReaderEnum>;

/// Create a BAM reader with automatic header reading
///
/// Opens a BAM file (or standard input) and reads its header.
///
/// # Arguments
/// * `path` - Path to the input BAM file, or `-` for standard input
/// * `threads` - Number of decompression threads (1 = single-threaded)
///
/// # Returns
/// A tuple of (BAM reader, header)
///
/// # Errors
/// Returns an error if the file cannot be opened or the header cannot be read
///
/// # Example
/// ```no_run
/// use fgstats_lib::bam_io::create_bam_reader;
/// use std::path::Path;
///
/// // Single-threaded
/// let (mut reader, header) = create_bam_reader(Path::new("input.bam"), 1).unwrap();
///
/// // Multi-threaded with 4 decompression threads
/// let (mut reader, header) = create_bam_reader(Path::new("input.bam"), 4).unwrap();
/// ```
pub fn create_bam_reader<P: AsRef<Path>>(
    path: P,
    threads: usize,
) -> Result<(BamReaderAuto, Header)> {
    let path_ref = path.as_ref();
    let source: InputSource = if is_stdin_path(path_ref) {
        Box::new(io::stdin())
    } else {
        let file = File::open(path_ref)
            .with_context(|| format!("Failed to open input BAM: {}", path_ref.display()))?;
        Box::new(file)
    };

    let bgzf_reader = match NonZero::new(threads) {
        Some(worker_count) if threads > 1 => BgzfReaderEnum::MultiThreaded(
            MultithreadedReader::with_worker_count(worker_count, source),
        ),
        _ => BgzfReaderEnum::SingleThreaded(BgzfReader::new(source)),
    };

    let mut reader = noodles::bam::io::Reader::from(bgzf_reader);
    let header = reader
        .read_header()
        .with_context(|| format!("Failed to read header from: {}", path_ref.display()))?;

    Ok((reader, header))
}

/// Create a buffered text writer for a report.
///
/// `-` and `/dev/stdout` write to standard output; any other path is created (or truncated).
///
/// # Errors
/// Returns an error if the output file cannot be created
pub fn create_text_writer<P: AsRef<Path>>(path: P) -> Result<Box<dyn Write>> {
    let path_ref = path.as_ref();
    if is_stdout_path(path_ref) {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    let file = File::create(path_ref)
        .with_context(|| format!("Failed to create output file: {}", path_ref.display()))?;
    Ok(Box::new(BufWriter::new(file)))
}

/// True for `-` and `/dev/stdin`.
///
/// ```
/// use fgstats_lib::bam_io::is_stdin_path;
///
/// assert!(is_stdin_path("-"));
/// assert!(!is_stdin_path("input.bam"));
/// ```
#[must_use]
pub fn is_stdin_path<P: AsRef<Path>>(path: P) -> bool {
    matches!(path.as_ref().to_str(), Some("-" | "/dev/stdin"))
}

/// True for `-` and `/dev/stdout`.
#[must_use]
pub fn is_stdout_path<P: AsRef<Path>>(path: P) -> bool {
    matches!(path.as_ref().to_str(), Some("-" | "/dev/stdout"))
}
