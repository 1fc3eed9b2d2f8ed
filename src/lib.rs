// Library root. The crate is a pure valuation engine: snapshots in,
// ranked data out, no I/O inside the math.

pub mod config;
pub mod player;
pub mod valuation;
