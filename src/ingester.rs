use log::{debug, error};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::SystemTime;

use crate::containers::{CallRecord, ChromCallSet};
use crate::utils;

/// Load the binned inversion calls of one chromosome from a plain or
/// compressed JSON file. Termination triggered if the file cannot be read
/// or the bins refer to calls that do not exist or list a call twice.
pub fn load_call_set(calls_path: PathBuf) -> ChromCallSet {
    let start_time = SystemTime::now();
    let calls_name_str = calls_path.to_string_lossy().to_string();
    if !utils::is_local_file(&calls_name_str) {
        error!("Input calls file does not exist: \"{}\"", calls_name_str);
        std::process::exit(exitcode::NOINPUT);
    }
    let json_string = match utils::read_file_from_path(&calls_name_str) {
        Ok(contents) => contents,
        Err(e) => {
            error!("Error reading calls file \"{}\"", calls_name_str);
            error!("{}", e);
            std::process::exit(exitcode::IOERR);
        }
    };

    let call_set = match parse_call_set(&json_string) {
        Ok(call_set) => call_set,
        Err(e) => {
            error!("Invalid calls file \"{}\"", calls_name_str);
            error!("{}", e);
            std::process::exit(exitcode::DATAERR);
        }
    };
    debug!(
        "{}: {} inversion calls in {} bins, {} non-template calls in {} bins",
        call_set.chrom,
        call_set.calls.len(),
        call_set.bins.len(),
        call_set.non_template_calls.len(),
        call_set.non_template_bins.len(),
    );
    debug!(
        "Call loading: {}s",
        start_time.elapsed().map_or(0, |elapsed| elapsed.as_secs())
    );
    call_set
}

/// Parse and validate a call set JSON document
pub fn parse_call_set(json_string: &str) -> Result<ChromCallSet, String> {
    let call_set: ChromCallSet =
        serde_json::from_str(json_string).map_err(|e| format!("JSON error: {}", e))?;
    validate_bins(&call_set.calls, &call_set.bins, "bins")?;
    validate_bins(
        &call_set.non_template_calls,
        &call_set.non_template_bins,
        "non_template_bins",
    )?;
    Ok(call_set)
}

fn validate_bins(calls: &[CallRecord], bins: &[Vec<usize>], label: &str) -> Result<(), String> {
    for (bin_index, bin) in bins.iter().enumerate() {
        if let Some(bad_index) = bin.iter().find(|&&call_index| call_index >= calls.len()) {
            return Err(format!(
                "{} entry {} refers to call {} but only {} calls are present",
                label,
                bin_index,
                bad_index,
                calls.len()
            ));
        }
        let mut seen_calls = HashSet::new();
        if let Some(repeated_index) = bin
            .iter()
            .find(|&&call_index| !seen_calls.insert(call_index))
        {
            return Err(format!(
                "{} entry {} lists call {} more than once",
                label, bin_index, repeated_index
            ));
        }
    }
    Ok(())
}
