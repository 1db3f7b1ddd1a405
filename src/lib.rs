// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod assistant;
pub mod carousel;
pub mod config;
pub mod contact;
pub mod events;
pub mod gallery;
pub mod metrics;
pub mod notify;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::carousel::{CarouselDriver, CarouselState, CarouselView};
pub use crate::events::types::{DisplayEvent, EventKind};
pub use crate::events::{Aggregation, EventAggregator};
