//! Run-scoped storage: inventory snapshots in, report artifacts out

pub mod inventory;
pub mod report;

pub use inventory::{latest_run_id, load_inventory};
pub use report::write_report;
