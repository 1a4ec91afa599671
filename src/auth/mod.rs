//! Access control
//!
//! Role taxonomy and the route guard consumed by the UI layer.

mod guard;

pub use guard::{check_route, AuthUser, GuardDecision, Notice, Role};
