//! # Integration tests
//!
//! Integration tests completely external from the crate. All code written in this module could be
//! written by an external user of the crate.

mod scenarios;
mod sensitivity;

/// Enable log output for a test; only the first call has an effect.
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
