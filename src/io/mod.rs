pub mod csv;
pub mod json;

pub use self::csv::{read_trace, read_trace_file, write_records, write_records_file, TraceError};
pub use self::json::{write_summary, write_summary_file, ReplaySummary};
