//! Console core for a NAS administration backend
//!
//! Typed API clients over a pluggable [`Transport`], plus the state
//! machines behind the console's list panels and form dialogs. Nothing
//! here renders; callers drive panels and dialogs and read their state.

pub mod api;
pub mod client;
pub mod error;
pub mod forms;
pub mod loaders;
pub mod panels;
pub mod resources;
pub mod transport;

pub use api::NasApi;
pub use client::ApiClient;
pub use error::{ConsoleError, Result};
pub use forms::{Editable, FormDialog, FormMode, NfsDraft, SambaDraft, SubmitOutcome};
pub use panels::{Collection, ListPanel};
pub use transport::{ApiRequest, Method, Transport};
