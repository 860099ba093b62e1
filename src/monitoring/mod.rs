/*!
 * Monitoring
 * Tracing subscriber bootstrap for binaries and tests embedding the crate
 */

pub mod tracer;

pub use tracer::init_tracing;
