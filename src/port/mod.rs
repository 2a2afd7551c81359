//! Trait definitions at the seams of the pipeline.
//!
//! Services depend on these traits only; adapters provide the concrete
//! implementations (HTTP, SQLite, Telegram). Swapping the upstream
//! marketplace or the delivery channel means implementing one trait.

pub mod channel;
pub mod delivery;
pub mod marketplace;
pub mod registry;
pub mod store;

pub use channel::{DeliveryChannel, NullChannel};
pub use delivery::DeliveryTracker;
pub use marketplace::{MarketplaceSource, RawListing};
pub use registry::{CategoryRegistry, User};
pub use store::ListingStore;
