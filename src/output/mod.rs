pub mod html;
mod progress;
mod styling;
mod summary;
mod tables;

pub use progress::PhaseProgress;
pub use styling::{dim, magenta_bold};
pub use summary::print_summary;

/// Prints the `PRLens` banner to stderr.
///
/// Displays the tool name, version, and description at the start of execution.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("\u{1f50d} PRLens"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("Community Pull Request Reports")
    );
}
