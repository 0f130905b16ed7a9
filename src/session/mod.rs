pub mod context;
pub mod gate;
pub mod identity;
pub mod navigation;
pub mod store;

pub use context::{SessionContext, SessionPhase, SessionUser};
pub use gate::{classify, GateDecision};
pub use identity::IdentityClient;
pub use store::{FileSessionStore, MemorySessionStore, SessionCookie, SessionError, SessionStore, StoredSession};
