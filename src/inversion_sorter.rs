use log::{debug, info};
use std::time::SystemTime;

use crate::balance_oracle::BalanceOracle;
use crate::call_sorter::sort_bin;
use crate::containers::{CallRecord, ReportSettings, SortMode};
use crate::duplicate_filter::mark_duplicate_calls;
use crate::event_aggregator::aggregate_events;
use crate::result_writer::InversionWriter;
use crate::support_filter::report_events;

/// Sorts, clusters and reports the binned inversion calls of one chromosome.
///
/// The chromosome name and the output writer are fixed at construction and
/// shared by both call modes.
pub struct InversionSorter<W: InversionWriter> {
    chrom: String,
    writer: W,
}

impl<W: InversionWriter> InversionSorter<W> {
    pub fn new(chrom: String, writer: W) -> Self {
        InversionSorter { chrom, writer }
    }

    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    pub fn sort_and_output_inversions(
        &mut self,
        calls: &mut [CallRecord],
        bins: &mut [Vec<usize>],
        settings: &ReportSettings,
        oracle: &dyn BalanceOracle,
    ) -> std::io::Result<usize> {
        info!("Sorting and writing inversions on {}", self.chrom());
        let reported_count =
            self.process_bins(calls, bins, SortMode::Inversion, settings, oracle)?;
        info!("Inversions (INV): {}", reported_count);
        Ok(reported_count)
    }

    pub fn sort_and_output_non_template_inversions(
        &mut self,
        calls: &mut [CallRecord],
        bins: &mut [Vec<usize>],
        settings: &ReportSettings,
        oracle: &dyn BalanceOracle,
    ) -> std::io::Result<usize> {
        info!(
            "Sorting and writing inversions with non-template sequence on {}",
            self.chrom()
        );
        let reported_count =
            self.process_bins(calls, bins, SortMode::NonTemplateInversion, settings, oracle)?;
        info!(
            "Inversions with non-template sequence (INV_NT): {}",
            reported_count
        );
        Ok(reported_count)
    }

    /// Process each bin independently: sort its calls, flag duplicates, build
    /// consensus events and report those passing the filters.
    ///
    /// Bins with fewer calls than the minimum support are skipped untouched.
    /// Every bin index must be a valid index into `calls`.
    pub fn process_bins(
        &mut self,
        calls: &mut [CallRecord],
        bins: &mut [Vec<usize>],
        mode: SortMode,
        settings: &ReportSettings,
        oracle: &dyn BalanceOracle,
    ) -> std::io::Result<usize> {
        let start_time = SystemTime::now();
        let mut reported_count = 0;
        for (bin_index, bin) in bins.iter_mut().enumerate() {
            if bin.is_empty() || bin.len() < settings.min_read_support {
                continue;
            }
            debug!("{} bin {}: {} calls", mode.tag(), bin_index, bin.len());

            sort_bin(calls, bin, mode);
            let duplicate_count = mark_duplicate_calls(calls, bin);
            if duplicate_count > 0 {
                debug!(
                    "{} bin {}: {} duplicate calls",
                    mode.tag(),
                    bin_index,
                    duplicate_count
                );
            }

            let events = aggregate_events(calls, bin);
            if events.is_empty() {
                continue;
            }
            reported_count += report_events(
                calls,
                bin,
                &events,
                settings,
                oracle,
                &mut self.writer,
                &self.chrom,
                mode,
            )?;
        }
        debug!(
            "{} sorting and output: {}ms",
            mode.tag(),
            start_time.elapsed().map_or(0, |elapsed| elapsed.as_millis())
        );
        Ok(reported_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance_oracle::{AcceptAll, ReadPositionBalance};
    use crate::containers::Strand;
    use crate::result_writer::InversionRecordWriter;
    use crate::utils;

    fn create_sorter() -> InversionSorter<InversionRecordWriter<Vec<u8>>> {
        InversionSorter::new("chr1".to_string(), InversionRecordWriter::new(Vec::new()))
    }

    #[test]
    fn test_chrom_used_for_records() {
        let mut calls = vec![
            utils::create_test_call(100, 200, 100),
            utils::create_test_call(100, 200, 100),
        ];
        calls[1].leftmost_aligned_position += 1;
        calls[1].read_length += 3;
        let mut bins = vec![vec![0, 1]];
        let settings = ReportSettings {
            min_read_support: 2,
            balance_cutoff: 1000,
        };
        let mut sorter = create_sorter();
        assert_eq!(sorter.chrom(), "chr1");
        sorter
            .sort_and_output_inversions(&mut calls, &mut bins, &settings, &AcceptAll)
            .unwrap();
        let output = String::from_utf8(sorter.into_writer().into_inner()).unwrap();
        assert!(output.starts_with("chr1\t100\t200\t"));
    }

    #[test]
    fn test_single_supported_event() {
        // two calls share breakpoint sum 100, the third is a singleton
        let mut calls = vec![
            utils::create_test_call(60, 80, 30),
            utils::create_test_call(25, 75, 50),
            utils::create_test_call(26, 74, 48),
        ];
        let mut bins = vec![vec![0, 1, 2]];
        let settings = ReportSettings {
            min_read_support: 2,
            balance_cutoff: 1000,
        };
        let mut sorter = create_sorter();
        let reported = sorter
            .sort_and_output_inversions(
                &mut calls,
                &mut bins,
                &settings,
                &ReadPositionBalance::default(),
            )
            .unwrap();

        assert_eq!(reported, 1);
        assert_eq!(bins[0], vec![1, 2, 0]);
        assert_eq!(calls[2].indel_size, 50);
        assert_eq!(calls[0].indel_size, 30);
        let output = String::from_utf8(sorter.into_writer().into_inner()).unwrap();
        assert!(output.starts_with("chr1\t25\t75\t50\t2\t"));
        assert!(output.lines().next().unwrap().ends_with("\tINV"));
    }

    #[test]
    fn test_size_mismatch_not_reported() {
        let mut calls = vec![
            utils::create_test_call(25, 75, 50),
            utils::create_test_call(38, 62, 25),
        ];
        let mut bins = vec![vec![0, 1]];
        let settings = ReportSettings {
            min_read_support: 1,
            balance_cutoff: 1000,
        };
        let mut sorter = create_sorter();
        let reported = sorter
            .sort_and_output_inversions(&mut calls, &mut bins, &settings, &AcceptAll)
            .unwrap();
        assert_eq!(reported, 0);
        assert_eq!(sorter.writer().records_written(), 0);
    }

    #[test]
    fn test_duplicates_flagged_after_sort() {
        let mut calls = vec![
            utils::create_test_call_with_alignment(150, 250, 100, Strand::Forward, 40, 150),
            utils::create_test_call_with_alignment(100, 200, 100, Strand::Forward, 40, 150),
        ];
        let mut bins = vec![vec![0, 1]];
        let settings = ReportSettings {
            min_read_support: 2,
            balance_cutoff: 1000,
        };
        let mut sorter = create_sorter();
        sorter
            .sort_and_output_inversions(&mut calls, &mut bins, &settings, &AcceptAll)
            .unwrap();
        assert_eq!(bins[0], vec![1, 0]);
        assert!(calls[1].is_unique);
        assert!(!calls[0].is_unique);
    }

    #[test]
    fn test_thin_and_empty_bins_skipped() {
        let mut calls = vec![
            utils::create_test_call_with_alignment(150, 250, 100, Strand::Forward, 40, 150),
            utils::create_test_call_with_alignment(100, 200, 100, Strand::Forward, 40, 150),
        ];
        let mut bins = vec![vec![], vec![0, 1]];
        let settings = ReportSettings {
            min_read_support: 3,
            balance_cutoff: 0,
        };
        let mut sorter = create_sorter();
        let reported = sorter
            .sort_and_output_inversions(&mut calls, &mut bins, &settings, &AcceptAll)
            .unwrap();
        assert_eq!(reported, 0);
        // a skipped bin is neither sorted nor checked for duplicates
        assert_eq!(bins[1], vec![0, 1]);
        assert!(calls.iter().all(|call| call.is_unique));

        let mut no_bins: Vec<Vec<usize>> = Vec::new();
        let zero_support = ReportSettings {
            min_read_support: 0,
            balance_cutoff: 0,
        };
        let mut bins = vec![vec![]];
        assert_eq!(
            sorter
                .sort_and_output_inversions(&mut calls, &mut bins, &zero_support, &AcceptAll)
                .unwrap(),
            0
        );
        assert_eq!(
            sorter
                .sort_and_output_inversions(&mut calls, &mut no_bins, &zero_support, &AcceptAll)
                .unwrap(),
            0
        );
    }

    #[test]
    fn test_counts_accumulate_across_bins_and_modes() {
        let mut calls = vec![
            utils::create_test_call(100, 200, 100),
            utils::create_test_call(100, 200, 100),
            utils::create_test_call(1000, 1200, 200),
            utils::create_test_call(1000, 1200, 200),
        ];
        calls[1].leftmost_aligned_position += 1;
        calls[1].read_length += 3;
        let mut bins = vec![vec![0, 1], vec![2, 3]];
        let mut nt_calls = vec![
            utils::create_test_call(500, 600, 100),
            utils::create_test_call(500, 600, 100),
        ];
        nt_calls[0].non_template_size = 4;
        nt_calls[1].non_template_size = 8;
        let mut nt_bins = vec![vec![0, 1]];
        let settings = ReportSettings {
            min_read_support: 2,
            balance_cutoff: 1000,
        };

        let mut sorter = create_sorter();
        let inv_count = sorter
            .sort_and_output_inversions(&mut calls, &mut bins, &settings, &AcceptAll)
            .unwrap();
        let nt_count = sorter
            .sort_and_output_non_template_inversions(
                &mut nt_calls,
                &mut nt_bins,
                &settings,
                &AcceptAll,
            )
            .unwrap();
        assert_eq!(inv_count, 2);
        assert_eq!(nt_count, 1);
        // larger non-template insertion sorts first
        assert_eq!(nt_bins[0], vec![1, 0]);
        assert_eq!(sorter.writer().records_written(), 3);

        let output = String::from_utf8(sorter.into_writer().into_inner()).unwrap();
        let records: Vec<&str> = output.lines().filter(|line| !line.starts_with('\t')).collect();
        assert_eq!(records.len(), 3);
        assert!(records[2].ends_with("\tINV_NT"));
        // call 1 differs from call 0 in both aligned start and end
        assert!(calls[1].is_unique);
        assert!(!calls[3].is_unique);
    }
}
