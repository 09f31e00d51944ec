pub mod app_state;
pub mod handlers;
pub mod protocol;
pub mod router;
pub mod stdio;
