use bgzip::{BGZFWriter, Compression};
use std::path::PathBuf;

use crate::containers::{AnnotatedCalls, CallRecord, InversionEvent, SortMode, Strand};
use flate2::write::GzEncoder;
use log::{error, info};
use std::fs::File;
use std::io::Write;
use std::io::{self, BufWriter};

/// Receives each accepted inversion event
pub trait InversionWriter {
    fn write_inversion(
        &mut self,
        chrom: &str,
        calls: &[CallRecord],
        members: &[usize],
        event: &InversionEvent,
        mode: SortMode,
    ) -> io::Result<()>;
}

/// Writes accepted events as tab-delimited records, each followed by one
/// tab-indented line per supporting call.
pub struct InversionRecordWriter<W: Write> {
    writer: W,
    records_written: usize,
}

impl<W: Write> InversionRecordWriter<W> {
    pub fn new(writer: W) -> Self {
        InversionRecordWriter {
            writer,
            records_written: 0,
        }
    }

    pub fn write_header(&mut self) -> io::Result<()> {
        let version = env!("CARGO_PKG_VERSION");
        writeln!(
            self.writer,
            "#invsort v{}\n#chrom\tstart\tend\tsize\tsupport\tunique_support\tfwd_support\trev_support\ttype",
            version
        )
    }

    pub fn records_written(&self) -> usize {
        self.records_written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> InversionWriter for InversionRecordWriter<W> {
    fn write_inversion(
        &mut self,
        chrom: &str,
        calls: &[CallRecord],
        members: &[usize],
        event: &InversionEvent,
        mode: SortMode,
    ) -> io::Result<()> {
        let member_calls: Vec<&CallRecord> = members.iter().map(|&i| &calls[i]).collect();
        let unique_support = member_calls.iter().filter(|call| call.is_unique).count();
        let fwd_support = member_calls
            .iter()
            .filter(|call| call.strand == Strand::Forward)
            .count();
        let indel_size = member_calls.first().map_or(0, |call| call.indel_size);

        writeln!(
            self.writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            chrom,
            event.real_start,
            event.real_end,
            indel_size,
            event.support,
            unique_support,
            fwd_support,
            member_calls.len() - fwd_support,
            mode.tag(),
        )?;
        for call in member_calls {
            writeln!(
                self.writer,
                "\t{}\t{}\t{}\t{}\t{}",
                call.read_name,
                call.strand,
                call.left_breakpoint,
                call.right_breakpoint,
                call.breakpoint_offset,
            )?;
        }
        self.records_written += 1;
        Ok(())
    }
}

/// Given an already-validated directory path with a filename prefix,
/// generate the record and annotated call filenames for output.
pub fn generate_output_paths(
    outdir: &str,
    prefix: &str,
    write_unzipped: bool,
) -> (String, String) {
    if write_unzipped {
        let record_filepath = format!("{}/{}.inv.tsv", outdir, prefix);
        let json_filepath = format!("{}/{}.calls.json", outdir, prefix);
        (record_filepath, json_filepath)
    } else {
        let record_filepath = format!("{}/{}.inv.tsv.gz", outdir, prefix);
        let json_filepath = format!("{}/{}.calls.json.gz", outdir, prefix);
        (record_filepath, json_filepath)
    }
}

/// Destination of the inversion records, either plain text or BGZF blocks
pub enum RecordOutput<W: Write> {
    Plain(BufWriter<W>),
    Bgzf(BGZFWriter<W>),
}

impl<W: Write> RecordOutput<W> {
    /// Write out all buffered data. A BGZF stream also gets its EOF block here,
    /// so errors surface instead of being dropped on close.
    pub fn finish(self) -> io::Result<()> {
        match self {
            RecordOutput::Plain(mut writer) => writer.flush(),
            RecordOutput::Bgzf(writer) => {
                writer.close()?;
                Ok(())
            }
        }
    }
}

impl<W: Write> Write for RecordOutput<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            RecordOutput::Plain(writer) => writer.write(buf),
            RecordOutput::Bgzf(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            RecordOutput::Plain(writer) => writer.flush(),
            RecordOutput::Bgzf(writer) => writer.flush(),
        }
    }
}

impl<W: Write> InversionRecordWriter<RecordOutput<W>> {
    /// Complete the output; must be called before the writer is dropped
    pub fn finish(self) -> io::Result<()> {
        self.writer.finish()
    }
}

/// Open the inversion record output, BGZF-compressed unless unzipped output was requested
pub fn create_record_writer(
    record_path: &str,
    write_unzipped: bool,
) -> io::Result<InversionRecordWriter<RecordOutput<File>>> {
    let record_file = File::create(PathBuf::from(record_path))?;
    let output = if write_unzipped {
        RecordOutput::Plain(BufWriter::new(record_file))
    } else {
        // BGZF buffers whole blocks itself
        RecordOutput::Bgzf(BGZFWriter::new(record_file, Compression::default()))
    };
    let mut record_writer = InversionRecordWriter::new(output);
    record_writer.write_header()?;
    Ok(record_writer)
}

/// Converts the annotated call arenas to a pretty JSON string and writes them out,
/// gzip-compressed if the path ends in `.gz`.
pub fn write_annotated_calls(annotated_calls: &AnnotatedCalls, json_name: &str) {
    let json_string = match serde_json::to_string_pretty(annotated_calls) {
        Ok(json) => json,
        Err(_) => {
            error!("Failed to write annotated calls as JSON");
            std::process::exit(exitcode::IOERR);
        }
    };
    if let Err(error) = write_json(json_string, json_name) {
        error!("Error writing annotated calls to {}\n{}", json_name, error);
        std::process::exit(exitcode::IOERR);
    }
    info!("Annotated calls written to {}", json_name);
}

/// Write the json file output
fn write_json(json_string: String, json_name: &str) -> std::io::Result<()> {
    let json_outfile = PathBuf::from(json_name);
    let file_handle = File::create(&json_outfile)?;

    if json_outfile.extension().and_then(|ext| ext.to_str()) == Some("gz") {
        let mut gzip_filehandle = GzEncoder::new(file_handle, flate2::Compression::default());
        gzip_filehandle.write_all(json_string.as_bytes())?;
        gzip_filehandle.finish()?;
    } else {
        let mut writer = io::BufWriter::new(file_handle);
        writer.write_all(json_string.as_bytes())?;
        writer.flush()?
    }

    Ok(())
}
