pub mod activity;
pub mod area;
mod generator;
pub mod grouping;
pub mod leads;
mod ownership;
mod recognition;
mod usernames;

pub use generator::ReportGenerator;
pub use leads::AreaLeadTable;
