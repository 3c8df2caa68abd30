//! Test support utilities for GridKit integration tests
//!
//! - TestChild: scripted measurable child
//! - Assertions: rect and grid-line assertions with tolerance

#![allow(dead_code)]

mod assertions;
mod test_child;

pub use assertions::*;
pub use test_child::TestChild;

use gridkit_layout::{LayoutParams, Spec};

/// Params for a single cell at `row`, `column`.
pub fn cell(row: i32, column: i32) -> LayoutParams {
    LayoutParams::new(Spec::at(row).unwrap(), Spec::at(column).unwrap()).unwrap()
}

/// Route engine logs to the test output when `RUST_LOG` is set.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
