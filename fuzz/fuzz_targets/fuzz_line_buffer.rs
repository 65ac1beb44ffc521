//! Fuzz target: `LineBuffer::push`
//!
//! Streams raw UART bytes through the line assembler and on into the
//! parser.  Completed lines must be non-empty, printable and within the
//! buffer capacity.
//!
//! cargo fuzz run fuzz_line_buffer

#![no_main]

use homewatch::adapters::serial::{LINE_CAPACITY, LineBuffer};
use homewatch::app::commands::AppCommand;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut lb = LineBuffer::new();

    for &byte in data {
        if let Some(Ok(line)) = lb.push(byte) {
            assert!(!line.is_empty());
            assert!(line.len() <= LINE_CAPACITY);
            assert!(line.bytes().all(|b| (0x20..=0x7e).contains(&b)));
            let _ = AppCommand::parse(&line);
        }
    }
});
