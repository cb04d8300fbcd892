//! Application services.

pub mod index_setup;
pub mod provider;
pub mod simulated;
pub mod store;
pub mod twelvelabs;

pub use index_setup::find_or_create_index;
pub use provider::{AnalysisProvider, TaskSnapshot};
pub use simulated::SimulatedProvider;
pub use store::{EditStore, VideoStore};
pub use twelvelabs::TwelveLabsProvider;
