//! Route contract for the dashboard API.
//!
//! Every backend route is a zero-sized marker type implementing [`Route`]. The
//! marker fixes the HTTP method, the path, and the query, body and output
//! types, so a call site cannot send a body the route does not accept or name
//! a route that does not exist.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

use super::models::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        }
    }
}

/// Output types decide whether a successfully decoded body is still a failure
pub trait ContractOutput: DeserializeOwned + Send + 'static {
    /// Error message carried inside a 2xx body, if any
    fn backend_error(&self) -> Option<&str> {
        None
    }
}

impl ContractOutput for MutationResponse {
    fn backend_error(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }
}

macro_rules! plain_output {
    ($($ty:ty),* $(,)?) => {
        $(impl ContractOutput for $ty {})*
    };
}

plain_output!(
    RecipientCount,
    RecipientPage,
    RecipientDetails,
    HistoryPage,
    HistoryDetailsEnvelope,
    CustomLevelPage,
    MainLevelPage,
    LevelDetails,
    AccessListPage,
);

/// One entry of the contract
pub trait Route: Send + Sync + 'static {
    const METHOD: Method;
    /// Path relative to the API base, without a leading slash
    const PATH: &'static str;

    type Query: Serialize + Send + Sync + 'static;
    type Body: Serialize + Send + Sync + 'static;
    type Output: ContractOutput;

    /// Contract key in `@<method>/<path>` form
    fn key() -> String {
        format!("@{}/{}", Self::METHOD, Self::PATH)
    }
}

macro_rules! route {
    ($(#[$meta:meta])* $name:ident => $method:ident $path:literal, query: $query:ty, body: $body:ty, output: $output:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl Route for $name {
            const METHOD: Method = Method::$method;
            const PATH: &'static str = $path;
            type Query = $query;
            type Body = $body;
            type Output = $output;
        }
    };
}

route!(
    /// Total number of recipients
    RecipientCountRoute => Get "dashboard/recipient/count",
    query: Empty, body: Empty, output: RecipientCount
);
route!(
    RecipientListRoute => Get "dashboard/recipient/list",
    query: PageQuery, body: Empty, output: RecipientPage
);
route!(
    RecipientByIdRoute => Get "dashboard/recipient/by-id",
    query: GameIdQuery, body: Empty, output: RecipientDetails
);
route!(
    RecipientHistoryListRoute => Get "dashboard/recipient/history-list",
    query: HistoryListQuery, body: Empty, output: HistoryPage
);
route!(
    /// Single play session with per-stage outcomes
    RecipientHistoryRoute => Get "dashboard/recipient/history",
    query: HistoryQuery, body: Empty, output: HistoryDetailsEnvelope
);
route!(
    RecipientAddRoute => Post "dashboard/recipient/add",
    query: Empty, body: GameUserBody, output: MutationResponse
);
route!(
    RecipientRemoveRoute => Post "dashboard/recipient/remove",
    query: Empty, body: GameUserBody, output: MutationResponse
);
route!(
    CustomLevelListRoute => Get "dashboard/custom-level/list",
    query: PageQuery, body: Empty, output: CustomLevelPage
);
route!(
    CustomLevelByIdRoute => Get "dashboard/custom-level/by-id",
    query: CustomLevelIdQuery, body: Empty, output: LevelDetails
);
route!(
    CustomLevelCreateRoute => Post "dashboard/custom-level/create",
    query: Empty, body: NewLevel, output: MutationResponse
);
route!(
    CustomLevelDeleteRoute => Post "dashboard/custom-level/delete",
    query: Empty, body: CustomLevelIdBody, output: MutationResponse
);
route!(
    /// Recipients holding a grant for one custom level
    CustomLevelAccessListRoute => Get "dashboard/custom-level/access-list",
    query: AccessListQuery, body: Empty, output: AccessListPage
);
route!(
    CustomLevelAddAccessRoute => Post "dashboard/custom-level/add-access",
    query: Empty, body: AccessGrantBody, output: MutationResponse
);
route!(
    CustomLevelRemoveAccessRoute => Post "dashboard/custom-level/remove-access",
    query: Empty, body: AccessGrantBody, output: MutationResponse
);
route!(
    MainLevelListRoute => Get "dashboard/main-level/list",
    query: PageQuery, body: Empty, output: MainLevelPage
);
route!(
    MainLevelByIdRoute => Get "dashboard/main-level/by-id",
    query: MainLevelIdQuery, body: Empty, output: LevelDetails
);
route!(
    MainLevelCreateRoute => Post "dashboard/main-level/create",
    query: Empty, body: NewLevel, output: MutationResponse
);
route!(
    MainLevelDeleteRoute => Post "dashboard/main-level/delete",
    query: Empty, body: MainLevelIdBody, output: MutationResponse
);

/// Every key in the contract, in declaration order
pub fn route_keys() -> Vec<String> {
    vec![
        RecipientCountRoute::key(),
        RecipientListRoute::key(),
        RecipientByIdRoute::key(),
        RecipientHistoryListRoute::key(),
        RecipientHistoryRoute::key(),
        RecipientAddRoute::key(),
        RecipientRemoveRoute::key(),
        CustomLevelListRoute::key(),
        CustomLevelByIdRoute::key(),
        CustomLevelCreateRoute::key(),
        CustomLevelDeleteRoute::key(),
        CustomLevelAccessListRoute::key(),
        CustomLevelAddAccessRoute::key(),
        CustomLevelRemoveAccessRoute::key(),
        MainLevelListRoute::key(),
        MainLevelByIdRoute::key(),
        MainLevelCreateRoute::key(),
        MainLevelDeleteRoute::key(),
    ]
}

/// Split a contract key into its method and path
pub fn parse_key(key: &str) -> Option<(Method, &str)> {
    let rest = key.strip_prefix('@')?;
    let (method, path) = rest.split_once('/')?;
    let method = match method {
        "get" => Method::Get,
        "post" => Method::Post,
        _ => return None,
    };
    if path.is_empty() {
        return None;
    }
    Some((method, path))
}
