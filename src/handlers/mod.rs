// Handlers module

pub mod health;
pub mod rejection;
pub mod send_sos;

pub use health::health_handler;
pub use rejection::{handle_rejection, InternalFault, UnsupportedContentType};
pub use send_sos::send_sos_handler;
