/*! Integration tests for bookbinder.
 *
 * Organized as a single integration test binary. The modules follow the
 * request flows rather than the library layout:
 * - flows: full form round trips (fetch, bind, reconcile, commit)
 * - seeding: the opt-in demo-data routine
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("bookbinder=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod flows;
mod helpers;
mod seeding;
