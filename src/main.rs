use std::env;
use std::time::SystemTime;

use invsort::balance_oracle::ReadPositionBalance;
use invsort::cli::{get_args, Arguments};
use invsort::containers::AnnotatedCalls;
use invsort::ingester::load_call_set;
use invsort::inversion_sorter::InversionSorter;
use invsort::result_writer;
use log::{debug, error, info, LevelFilter};

fn set_up() -> Arguments {
    let args = get_args();
    let filter_level: LevelFilter = match args.verbose {
        false => LevelFilter::Info,
        true => LevelFilter::Debug,
    };
    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();

    let version = env!("CARGO_PKG_VERSION");
    info!("\nRunning invsort v{version}\n");

    let cmd: Vec<String> = env::args().collect();
    let cmd_str = cmd.join(" ");
    debug!("Run command: {cmd_str}");

    let path = std::path::Path::new(&args.outdir);
    if !path.exists() || !path.is_dir() {
        error!("outdir {} does not exist", args.outdir,);
        std::process::exit(exitcode::CONFIG);
    }
    if args.prefix.contains('_') {
        error!("Prefix does not allow underscores");
        std::process::exit(exitcode::CONFIG);
    }
    if !(0.0..=0.5).contains(&args.min_anchor_ratio) {
        error!(
            "--min-anchor-ratio must be between 0 and 0.5, got {}",
            args.min_anchor_ratio
        );
        std::process::exit(exitcode::CONFIG);
    }

    args
}

fn log_time(start_time: SystemTime) {
    let elapsed_time = start_time.elapsed().map_or(0, |elapsed| elapsed.as_secs());
    let hours = elapsed_time / 3600;
    let minutes = (elapsed_time % 3600) / 60;
    let seconds = elapsed_time % 60;
    debug!("Running time: {hours}h:{minutes}m:{seconds}s");
}

fn main() {
    ///////////////////////////////////////////////////////////////////////////
    // Set up
    let args = set_up();
    let start_time = SystemTime::now();
    let settings = args.report_settings();
    let oracle = ReadPositionBalance::new(args.min_anchor_ratio);

    ///////////////////////////////////////////////////////////////////////////
    // Get binned calls
    let mut call_set = load_call_set(args.calls_filename.clone());

    let outdir = args.outdir.trim_end_matches('/').to_string();
    let (record_path, json_path) =
        result_writer::generate_output_paths(&outdir, &args.prefix, args.write_unzipped);
    let record_writer = match result_writer::create_record_writer(&record_path, args.write_unzipped)
    {
        Ok(writer) => writer,
        Err(e) => {
            error!("Error creating inversion output {}\n{}", record_path, e);
            std::process::exit(exitcode::CANTCREAT);
        }
    };

    ///////////////////////////////////////////////////////////////////////////
    // Sort, cluster and report both call modes through the same writer
    let mut sorter = InversionSorter::new(call_set.chrom.clone(), record_writer);
    let inversion_count = sorter
        .sort_and_output_inversions(
            &mut call_set.calls,
            &mut call_set.bins,
            &settings,
            &oracle,
        )
        .unwrap_or_else(|e| {
            error!("Error writing inversions to {}\n{}", record_path, e);
            std::process::exit(exitcode::IOERR);
        });
    let non_template_inversion_count = sorter
        .sort_and_output_non_template_inversions(
            &mut call_set.non_template_calls,
            &mut call_set.non_template_bins,
            &settings,
            &oracle,
        )
        .unwrap_or_else(|e| {
            error!("Error writing inversions to {}\n{}", record_path, e);
            std::process::exit(exitcode::IOERR);
        });

    if let Err(e) = sorter.into_writer().finish() {
        error!("Error writing inversions to {}\n{}", record_path, e);
        std::process::exit(exitcode::IOERR);
    }
    info!("Inversion records written to {}", record_path);

    ///////////////////////////////////////////////////////////////////////////
    // Write annotated calls
    let annotated_calls = AnnotatedCalls {
        chrom: &call_set.chrom,
        inversion_count,
        non_template_inversion_count,
        calls: &call_set.calls,
        non_template_calls: &call_set.non_template_calls,
    };
    result_writer::write_annotated_calls(&annotated_calls, &json_path);

    info!(
        "{}: {} inversions, {} inversions with non-template sequence",
        call_set.chrom, inversion_count, non_template_inversion_count
    );
    log_time(start_time);
}
