pub mod editor_session;
pub mod preview;

pub use editor_session::Session;
pub use preview::{CancelToken, PreviewLoop};
