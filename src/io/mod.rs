/// CSV export of snapshot runs.
pub mod export;
