mod session;

pub use session::SESSION_COOKIE;
pub use session::SessionStore;
