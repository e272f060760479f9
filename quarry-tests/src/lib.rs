mod binds;
mod capabilities;
mod determinism;
mod escaping;
mod groups;
mod replacements;
mod util;

pub use crate::util::*;
use crate::{
    binds::binds,
    capabilities::capabilities,
    determinism::determinism,
    escaping::{escaping, identifiers},
    groups::groups,
    replacements::replacements,
};
use log::LevelFilter;
use quarry_core::QueryInterface;
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Dialect independent checks, every dialect crate runs them against its writer.
pub fn execute_tests(query: QueryInterface) {
    escaping(query);
    identifiers(query);
    groups(query);
    binds(query);
    determinism(query);
    replacements(query);
    capabilities(query);
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
