use clap::Parser;

// No operational arguments: anything besides --help/--version is a usage
// error (exit code 2) rather than being silently ignored.

/// Periodically capture the screen into date-partitioned folders.
///
/// Reads `folder_screencapture/config.file` from the working directory,
/// creating it with defaults when missing, and runs until killed.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {}
