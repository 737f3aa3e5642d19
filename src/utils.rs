use std::io::{BufRead, BufReader, Read};

use log::error;

/// Smallest ratio of a member's indel size to the event's largest size
/// for the member to be rescaled into the event
pub const MIN_SIZE_RATIO: f64 = 0.95;

/// Slack in bases allowed between the consensus size and a member's
/// read length plus its own indel size
pub const READ_LENGTH_SLACK: u32 = 30;

/// Default minimum number of supporting calls for an event to be reported
pub const DEFAULT_MIN_READ_SUPPORT: usize = 3;

/// Default indel size above which events must pass the balance check
pub const DEFAULT_BALANCE_CUTOFF: u32 = 0;

/// Default fraction of the read that counts as a short anchor in the balance check
pub const DEFAULT_MIN_ANCHOR_RATIO: f64 = 0.35;

/// first two bytes of a gzip file that indicatee the compression algorithm used
const GZIP_INDICATOR: [u8; 2] = [0x1F, 0x8B];

pub fn is_local_file(filepath: &String) -> bool {
    let path = std::path::Path::new(filepath);

    match std::fs::metadata(path) {
        Ok(metadata) => metadata.is_file(),
        Err(_) => false, // If there is an error (e.g., path doesn't exist), return false
    }
}

/// Check if a file is a gzipped file from a String path
pub fn is_gzipped(path: &String) -> bool {
    if !is_local_file(path) {
        return false;
    }
    let file_handle = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(e) => {
            error!("File does not exist: \"{}\"", path);
            error!("{}", e);
            std::process::exit(exitcode::IOERR);
        }
    };
    let mut reader = std::io::BufReader::new(file_handle);
    let mut gzip_indicator_bytes = [0; 2];
    let _ = std::io::Read::read_exact(&mut reader, &mut gzip_indicator_bytes);
    gzip_indicator_bytes == GZIP_INDICATOR
}

/// Read a plain text or gzipped text file into a single String.
/// Compressed input is read through the htslib BGZF reader, which also
/// accepts plain gzip.
pub fn read_file_from_path(file_path: &String) -> std::io::Result<String> {
    let mut contents = String::new();
    if is_gzipped(file_path) {
        let bgzf_reader = rust_htslib::bgzf::Reader::from_path(file_path)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut reader = BufReader::new(bgzf_reader);
        reader.read_to_string(&mut contents)?;
    } else {
        let file = std::fs::File::open(file_path)?;
        let reader = BufReader::new(file);
        for line in reader.lines() {
            contents.push_str(&line?);
            contents.push('\n');
        }
    }
    Ok(contents)
}

#[cfg(test)]
use crate::containers::{CallRecord, Strand};

/// Build a forward strand call with a long read and a mid-read breakpoint
#[cfg(test)]
pub fn create_test_call(left: i64, right: i64, indel_size: u32) -> CallRecord {
    CallRecord {
        read_name: format!("read_{}_{}", left, right),
        left_breakpoint: left,
        right_breakpoint: right,
        indel_size,
        non_template_size: 0,
        breakpoint_offset: 50,
        strand: Strand::Forward,
        leftmost_aligned_position: left - 50,
        read_length: 150,
        is_unique: true,
    }
}

#[cfg(test)]
pub fn create_test_call_with_alignment(
    left: i64,
    right: i64,
    indel_size: u32,
    strand: Strand,
    leftmost_aligned_position: i64,
    read_length: u32,
) -> CallRecord {
    CallRecord {
        strand,
        leftmost_aligned_position,
        read_length,
        ..create_test_call(left, right, indel_size)
    }
}

#[cfg(test)]
pub fn create_test_call_with_offset(
    left: i64,
    right: i64,
    indel_size: u32,
    strand: Strand,
    breakpoint_offset: i64,
) -> CallRecord {
    CallRecord {
        strand,
        breakpoint_offset,
        ..create_test_call(left, right, indel_size)
    }
}
