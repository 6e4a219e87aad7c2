//! Collection state shared by the data screens: paginated fetching and the
//! search overlay on top of it.

pub mod controller;
pub mod search;

pub use controller::{ListController, PageOutcome, PageRequest, Paging};
pub use search::{SearchOutcome, SearchOverlay, SearchRequest};
