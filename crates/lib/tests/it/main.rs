/*! Integration tests for Overdoc.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - doc: Tests for the Doc and Field types (change tracking, apply/revert)
 * - list: Tests for the List type (positional tracking)
 * - diff: Tests for the diff engine and update application
 * - resolve: Tests for the registry and reference resolver
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("overdoc=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod helpers;
mod list;
mod resolve;
