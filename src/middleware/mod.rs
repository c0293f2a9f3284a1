pub mod session_guard;

pub use session_guard::{current_session, session_guard, LOGIN_PATH};
