//! Pipeline services built on the port traits.
//!
//! [`IngestService`] pulls and deduplicates catalog pages,
//! [`NotifyService`] drains unpublished listings to subscribers, and
//! [`Scheduler`] drives both on their intervals and performs the daily
//! reset.

pub mod ingest;
pub mod notify;
pub mod scheduler;

pub use ingest::{IngestReport, IngestService};
pub use notify::{NotifyReport, NotifyService};
pub use scheduler::Scheduler;
