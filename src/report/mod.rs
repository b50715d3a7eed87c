mod errors;
mod report_generator;
mod summaries;

pub use errors::ReportError;
pub use report_generator::ReportGenerator;
