//! Fuzz target: `AppCommand::parse`
//!
//! Feeds arbitrary UTF-8 into the console command parser and asserts that
//! it never panics and that any accepted configuration passes validation.
//!
//! cargo fuzz run fuzz_command_parser

#![no_main]

use homewatch::app::commands::AppCommand;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = core::str::from_utf8(data) else {
        return;
    };

    if let Ok(AppCommand::UpdateConfig(config)) = AppCommand::parse(line) {
        assert!(config.validate().is_ok(), "parser accepted an invalid config");
    }
});
