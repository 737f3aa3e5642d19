pub mod balance_oracle;
pub mod breakpoint_comparator;
pub mod call_sorter;
pub mod cli;
pub mod containers;
pub mod duplicate_filter;
pub mod event_aggregator;
pub mod ingester;
pub mod inversion_sorter;
pub mod result_writer;
pub mod support_filter;
pub mod utils;
