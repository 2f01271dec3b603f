pub mod enums;
pub mod session;

pub use enums::*;
pub use session::*;
