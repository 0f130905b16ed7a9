pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod forms;
pub mod resource;
pub mod session;
pub mod table;
pub mod views;

pub use api::{FetchClient, RequestOptions, Route};
pub use error::{FetchError, FetchResult, SubmitError, ValidationErrors};
pub use session::SessionContext;
