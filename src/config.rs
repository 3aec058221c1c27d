/// Run options collected from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Plan against an in-memory filesystem and print the resulting tree.
    pub dry_run: bool,
    /// Turn per-item failures into a failed run.
    pub strict: bool,
    pub verbose: bool,
}
impl Options {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        }
    }
}
