use clap::Parser;
use chrono::Datelike;
use std::path::PathBuf;

use crate::containers::ReportSettings;
use crate::utils;

#[derive(Clone, Parser)]
#[clap(author, version, about,
    after_help = format!("Copyright (C) 2011-{}
This program comes with ABSOLUTELY NO WARRANTY; it is intended for
research use only.", chrono::Utc::now().year()))]
pub struct Arguments {
    /// JSON file of binned inversion calls for one chromosome. GZIP files allowed.
    #[clap(required = true)]
    #[clap(long = "calls")]
    #[clap(value_name = "JSON")]
    pub calls_filename: PathBuf,

    /// Output directory path
    #[clap(required = true)]
    #[clap(long = "outdir")]
    #[clap(value_name = "STRING")]
    pub outdir: String,

    /// Sample or project ID. No underscores allowed.
    #[clap(required = true)]
    #[clap(long = "prefix")]
    #[clap(value_name = "STRING")]
    pub prefix: String,

    /// Minimum number of supporting calls required to report an inversion
    #[clap(long = "min-support")]
    #[clap(value_name = "INT")]
    #[clap(default_value_t = utils::DEFAULT_MIN_READ_SUPPORT)]
    pub min_read_support: usize,

    /// Inversions of at least this size must have supporting reads anchored on both sides
    #[clap(long = "balance-cutoff")]
    #[clap(value_name = "INT")]
    #[clap(default_value_t = utils::DEFAULT_BALANCE_CUTOFF)]
    pub balance_cutoff: u32,

    /// Fraction of the read length treated as a short anchor by the balance check
    #[clap(long = "min-anchor-ratio", hide = true)]
    #[clap(value_name = "FLOAT")]
    #[clap(default_value_t = utils::DEFAULT_MIN_ANCHOR_RATIO)]
    pub min_anchor_ratio: f64,

    /// Flag to output results in unzipped format
    #[clap(long = "write-unzipped", hide = true)]
    pub write_unzipped: bool,

    /// Optional flag to print verbose output for debugging purposes.
    #[clap(long = "verbose")]
    pub verbose: bool,
}

impl Arguments {
    pub fn report_settings(&self) -> ReportSettings {
        ReportSettings {
            min_read_support: self.min_read_support,
            balance_cutoff: self.balance_cutoff,
        }
    }
}

pub fn get_args() -> Arguments {
    Arguments::parse()
}
