//! Logger initialization for the pagemill binary.
//!
//! Conversion output goes to stdout, so all log lines go to stderr to keep
//! piped markdown clean.

use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, Config, ConfigBuilder, TermLogger, TerminalMode};

/// Initialize the terminal logger at the given level.
pub fn initialize(level: LevelFilter) {
    let config = build_config();

    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )]);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}
