use clap::{
    crate_authors, crate_description, crate_name, crate_version, value_parser, Arg, ArgAction,
    Command,
};
use etxdir::Options;
use std::path::PathBuf;

// The CLI layer should only parse inputs and forward them to library code.
fn main() -> miette::Result<()> {
    let matches = Command::new(crate_name!())
        .about(crate_description!())
        .author(crate_authors!())
        .version(crate_version!())
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("source_file")
                .help("Path to the source .puml or .txt file")
                .value_parser(value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            Arg::new("target_directory")
                .help("Root path where the structure will be generated")
                .value_parser(value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            Arg::new("dry-run")
                .short('n')
                .long("dry-run")
                .help("Print the structure that would be generated without writing anything")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Exit with an error if any directory or file could not be created")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let options = Options {
        dry_run: matches.get_flag("dry-run"),
        strict: matches.get_flag("strict"),
        verbose: matches.get_flag("verbose"),
    };

    env_logger::Builder::new()
        .filter_level(options.log_level())
        .parse_default_env()
        .init();

    let source = matches
        .get_one::<PathBuf>("source_file")
        .expect("source_file required");
    let target = matches
        .get_one::<PathBuf>("target_directory")
        .expect("target_directory required");

    if options.verbose {
        log::debug!("executing in verbose mode");
    }

    etxdir::generate(source, target, &options)?;

    Ok(())
}
