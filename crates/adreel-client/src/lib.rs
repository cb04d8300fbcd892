//! Terminal front end for the AdReel relay.
//!
//! Mirrors the web UI screens: upload form, status display, scene timeline,
//! template picker, and the locally kept upload history.

pub mod api;
pub mod error;
pub mod history;
pub mod poll;

pub use api::{check_local_file, DetailsView, RelayClient, StatusView, DEFAULT_SERVER};
pub use error::{ClientError, ClientResult};
pub use history::{default_history_path, HistoryStore};
pub use poll::{watch_status, StatusSource, DEFAULT_POLL_INTERVAL};
