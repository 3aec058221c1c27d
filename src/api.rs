use crate::{
    brace,
    config::Options,
    dialect::{self, Dialect},
    errors::IoError,
    marker,
    materialize::{DiskMaterializer, Materializer, Report, Scaffold},
    preview::preview_as_tree,
    vfs::VirtualFS,
};
use colored::Colorize;
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum EtxdirError {
    #[error("Error creating root: {0}")]
    #[diagnostic(code(etxdir::root))]
    Root(#[source] IoError),

    #[error("Error: File '{path}' could not be read.")]
    #[diagnostic(
        code(etxdir::source),
        help("Pass the path of a readable UTF-8 .puml or .txt file")
    )]
    Source {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    #[error("{failures} item(s) could not be created")]
    #[diagnostic(
        code(etxdir::partial_failure),
        help("See the errors above; re-run without --strict to accept a partial tree")
    )]
    PartialFailure { failures: usize },
}

/// Detects the dialect of `lines` and materializes the tree they describe under `root`.
///
/// `root` must already exist in `fs`. Per-item failures are reported and counted in the
/// returned [`Report`]; they never abort the run.
pub fn generate_from_lines<S, M>(lines: &[S], root: &Path, fs: &mut M) -> Report
where
    S: AsRef<str>,
    M: Materializer,
{
    let dialect = dialect::detect(lines);
    log::debug!("detected {} dialect for {} lines", dialect, lines.len());

    let mut scaffold = Scaffold::new(fs, root, dialect);

    match dialect {
        Dialect::Marker => marker::parse(lines, &mut scaffold),
        Dialect::Brace => brace::parse(lines, &mut scaffold),
    }

    scaffold.finish()
}

fn read_lines(source: &Path) -> Result<Vec<String>, EtxdirError> {
    let content = fs::read_to_string(source).map_err(|error| EtxdirError::Source {
        path: source.to_path_buf(),
        source: IoError::read(source, error),
    })?;

    Ok(content.lines().map(str::to_string).collect())
}

/// Reads the diagram at `source` and generates its directory structure under `target`.
///
/// The target root is created (with any missing ancestors) and resolved to an absolute path
/// before the source is read. With [`Options::dry_run`] nothing is written: the plan is
/// printed as a tree instead.
///
/// # Errors
///
/// Returns an [`EtxdirError`] if:
///
/// - The target root cannot be created or resolved.
/// - The source file cannot be read.
/// - [`Options::strict`] is set and at least one item could not be created.
pub fn generate(source: &Path, target: &Path, options: &Options) -> Result<Report, EtxdirError> {
    let root = if options.dry_run {
        std::path::absolute(target)
            .map_err(|error| EtxdirError::Root(IoError::mkdir(target, error)))?
    } else {
        fs::create_dir_all(target)
            .and_then(|_| fs::canonicalize(target))
            .map_err(|error| EtxdirError::Root(IoError::mkdir(target, error)))?
    };

    let source_name = source
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| source.display().to_string());
    println!("--- etxDIR Processing: {} ---", source_name.bold());

    let lines = read_lines(source)?;

    let report = if options.dry_run {
        let mut vfs = VirtualFS::new(&root);
        let report = generate_from_lines(&lines, &root, &mut vfs);
        println!();
        preview_as_tree(&vfs.entries(), vfs.root());
        report
    } else {
        generate_from_lines(&lines, &root, &mut DiskMaterializer)
    };

    log::debug!("{:?}", report);

    println!("\nProcessing Complete.");

    if options.strict && !report.is_clean() {
        return Err(EtxdirError::PartialFailure {
            failures: report.failures,
        });
    }

    Ok(report)
}
