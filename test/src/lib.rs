pub mod helpers;

pub use helpers::*;

/// Installs a logger for the current test binary, once
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
