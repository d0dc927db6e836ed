//! Discovery page state machine
//!
//! `state` holds the pure reducer, `view` projects state into what the page
//! draws, and `controller` wires both to the search and trending pipelines.

pub mod controller;
pub mod state;
pub mod view;

pub use controller::{DiscoveryController, SearchOutcome, SUBMIT_KEY};
pub use state::{reduce, PageEvent, PageState, Phase};
pub use view::PageView;
