pub mod cancel;
pub mod logging;

pub use cancel::{CancelHandle, CancelSignal};
