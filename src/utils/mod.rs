pub mod clock;
pub mod dir;
pub mod format;
pub mod id;
pub mod logging;
pub mod runtime;
pub mod time;
