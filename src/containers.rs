use core::fmt;
use serde::{Deserialize, Serialize};

use crate::utils;

/// Read strand that the split-read alignment was anchored on
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Forward,
    #[serde(rename = "-")]
    Reverse,
}

impl fmt::Display for Strand {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Forward => write!(formatter, "+"),
            Strand::Reverse => write!(formatter, "-"),
        }
    }
}

/// Which inversion call set is being processed. The non-template mode adds the
/// non-template sequence length as an ordering key.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SortMode {
    Inversion,
    NonTemplateInversion,
}

impl SortMode {
    pub fn uses_non_template_size(&self) -> bool {
        *self == SortMode::NonTemplateInversion
    }

    /// Short tag used in log messages and output records
    pub fn tag(&self) -> &'static str {
        match self {
            SortMode::Inversion => "INV",
            SortMode::NonTemplateInversion => "INV_NT",
        }
    }
}

/// One candidate inversion observation derived from a single split read.
///
/// Calls are owned by the caller in a single arena; bins and events refer to
/// them only by index. Breakpoints, size and offset are rewritten in place
/// when an event is rescaled to its consensus size.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct CallRecord {
    #[serde(default)]
    pub read_name: String,
    pub left_breakpoint: i64,
    pub right_breakpoint: i64,
    pub indel_size: u32,

    /// Length of inserted sequence not explained by either flank
    #[serde(default)]
    pub non_template_size: u32,

    /// Position in the read at which the breakpoint was observed
    pub breakpoint_offset: i64,
    pub strand: Strand,
    pub leftmost_aligned_position: i64,
    pub read_length: u32,

    #[serde(default = "default_unique")]
    pub is_unique: bool,
}

fn default_unique() -> bool {
    true
}

impl CallRecord {
    pub fn breakpoint_sum(&self) -> i64 {
        self.left_breakpoint + self.right_breakpoint
    }

    pub fn aligned_end(&self) -> i64 {
        self.leftmost_aligned_position + self.read_length as i64
    }

    /// Upper bound (exclusive) for the breakpoint offset of a reverse strand read
    pub fn max_breakpoint_offset(&self) -> i64 {
        self.read_length as i64 - 1
    }
}

impl fmt::Display for CallRecord {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}:{}-{} size={} bp={} ({})",
            &self.read_name,
            self.left_breakpoint,
            self.right_breakpoint,
            self.indel_size,
            self.breakpoint_offset,
            self.strand,
        )
    }
}

/// Consensus cluster of calls sharing one breakpoint-sum signature.
///
/// `start` and `end` are inclusive positions into the sorted bin, not arena indices.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct InversionEvent {
    pub start: usize,
    pub end: usize,
    pub representative_left: i64,
    pub representative_right: i64,
    pub real_start: i64,
    pub real_end: i64,
    pub support: usize,
    pub reportable: bool,
}

impl InversionEvent {
    /// Start a new single-member event from the call at `position` in the bin
    pub fn new(position: usize, call: &CallRecord) -> Self {
        InversionEvent {
            start: position,
            end: position,
            representative_left: call.left_breakpoint,
            representative_right: call.right_breakpoint,
            real_start: call.left_breakpoint,
            real_end: call.right_breakpoint,
            support: 1,
            reportable: true,
        }
    }

    pub fn representative_sum(&self) -> i64 {
        self.representative_left + self.representative_right
    }

    /// Arena indices of the member calls
    pub fn members<'a>(&self, bin: &'a [usize]) -> &'a [usize] {
        &bin[self.start..=self.end]
    }
}

/// Reporting thresholds, passed explicitly into the sorter
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ReportSettings {
    /// Minimum number of calls an event needs to be reported
    pub min_read_support: usize,

    /// Events at least this large must pass the balance check
    pub balance_cutoff: u32,
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            min_read_support: utils::DEFAULT_MIN_READ_SUPPORT,
            balance_cutoff: utils::DEFAULT_BALANCE_CUTOFF,
        }
    }
}

/// Binned inversion calls for one chromosome, as produced by the upstream aligner
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ChromCallSet {
    pub chrom: String,
    #[serde(default)]
    pub calls: Vec<CallRecord>,
    #[serde(default)]
    pub bins: Vec<Vec<usize>>,
    #[serde(default)]
    pub non_template_calls: Vec<CallRecord>,
    #[serde(default)]
    pub non_template_bins: Vec<Vec<usize>>,
}

/// Annotated calls written back out after sorting and rescaling
#[derive(Debug, Serialize)]
pub struct AnnotatedCalls<'a> {
    pub chrom: &'a str,
    pub inversion_count: usize,
    pub non_template_inversion_count: usize,
    pub calls: &'a [CallRecord],
    pub non_template_calls: &'a [CallRecord],
}
