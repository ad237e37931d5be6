//! CLI tool for gridfmt - evaluates a document snapshot and outputs JSON
//!
//! Usage:
//!   gridfmt_cli <document.json>              # Output JSON to stdout
//!   gridfmt_cli <document.json> -o out.json  # Output JSON to file
//!
//! Diagnostics go to stderr; set `GRIDFMT_LOG` to `error`, `warn`, `info`,
//! `debug` or `trace` (default `warn`).

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use gridfmt::{build_report, Document};
use log::{LevelFilter, Log, Metadata, Record};

/// Plain stderr logger
struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

fn init_logging() {
    let level = env::var("GRIDFMT_LOG")
        .ok()
        .and_then(|v| v.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Warn);
    let logger = Box::new(StderrLogger { level });
    if log::set_boxed_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}

fn main() {
    init_logging();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: gridfmt_cli <document.json> [-o output.json]");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = if args.len() > 3 && args[2] == "-o" {
        Some(&args[3])
    } else {
        None
    };

    let data = match fs::read_to_string(input_path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    let document = match Document::from_json(&data) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Error decoding document: {}", e);
            std::process::exit(1);
        }
    };

    let report = build_report(&document);
    log::info!(
        "{} catalog entries, {} header rows, {} styled cells",
        report.catalog.len(),
        report.header_row_count,
        report.styles.len()
    );

    let json = match serde_json::to_string_pretty(&report) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };

    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
