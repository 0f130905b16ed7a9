pub mod client;
pub mod contract;
pub mod models;

pub use client::{Credentials, FetchClient, RequestOptions};
pub use contract::{ContractOutput, Method, Route};
