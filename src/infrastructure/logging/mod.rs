//! Logging infrastructure using `log` + `log4rs`.
//!
//! Filtering is whitelist-based: the root level defaults to OFF so external
//! crates stay quiet, this crate is enabled at the requested app level, and
//! callers can opt specific crates back in with `<crate>=<level>` (or
//! everything with `root=<level>`).

use log::LevelFilter;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        file::FileAppender,
    },
    config::{Appender, Logger, Root},
    encode::pattern::PatternEncoder,
    Config,
};
use std::path::Path;

const CONSOLE_APPENDER: &str = "stderr";
const FILE_APPENDER: &str = "log_file";
const LOG_LINE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{h({l})}] {m}{n}";
const WHITELISTED_CRATES: &[&str] = &["accord_core"];

/// Initialize the process logger. The logger is global; repeated calls are
/// ignored. Console output goes to stderr.
pub fn init_logger(log_file: Option<&Path>, filters: &str) {
    let app_level = parse_app_level(filters);
    let root_level = parse_root_override(filters).unwrap_or(LevelFilter::Off);
    let module_levels = parse_module_levels(filters);

    let console = ConsoleAppender::builder().target(Target::Stderr).encoder(Box::new(PatternEncoder::new(LOG_LINE_PATTERN))).build();
    let mut config_builder = Config::builder().appender(Appender::builder().build(CONSOLE_APPENDER, Box::new(console)));
    let mut appender_names = vec![CONSOLE_APPENDER.to_string()];

    if let Some(path) = log_file {
        match FileAppender::builder().encoder(Box::new(PatternEncoder::new(LOG_LINE_PATTERN))).build(path) {
            Ok(file_appender) => {
                config_builder = config_builder.appender(Appender::builder().build(FILE_APPENDER, Box::new(file_appender)));
                appender_names.push(FILE_APPENDER.to_string());
            }
            Err(err) => eprintln!("failed to open log file {}: {}", path.display(), err),
        }
    }

    for crate_name in WHITELISTED_CRATES {
        if !module_levels.iter().any(|(module, _)| module == crate_name) {
            config_builder = config_builder
                .logger(Logger::builder().appenders(appender_names.clone()).additive(false).build(*crate_name, app_level));
        }
    }
    for (module, level) in &module_levels {
        config_builder =
            config_builder.logger(Logger::builder().appenders(appender_names.clone()).additive(false).build(module, *level));
    }

    match config_builder.build(Root::builder().appenders(appender_names).build(root_level)) {
        Ok(config) => {
            let _ = log4rs::init_config(config);
        }
        Err(err) => eprintln!("failed to build logging config: {}", err),
    }
}

fn parse_app_level(filters: &str) -> LevelFilter {
    for part in filters.split(',') {
        let part = part.trim();
        if part.is_empty() || part.contains('=') {
            continue;
        }
        if let Ok(level) = part.parse() {
            return level;
        }
    }
    LevelFilter::Info
}

fn parse_root_override(filters: &str) -> Option<LevelFilter> {
    parse_module_entries(filters).into_iter().find(|(module, _)| module == "root").map(|(_, level)| level)
}

fn parse_module_levels(filters: &str) -> Vec<(String, LevelFilter)> {
    parse_module_entries(filters).into_iter().filter(|(module, _)| module != "root").collect()
}

fn parse_module_entries(filters: &str) -> Vec<(String, LevelFilter)> {
    let mut result = Vec::new();
    for part in filters.split(',') {
        let Some((module, level_str)) = part.trim().split_once('=') else {
            continue;
        };
        let module = module.trim();
        let level_str = level_str.trim();
        if module.is_empty() || level_str.is_empty() {
            continue;
        }
        if let Ok(level) = level_str.parse() {
            result.push((module.to_string(), level));
        }
    }
    result
}
