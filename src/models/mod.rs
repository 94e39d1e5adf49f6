pub mod conversation;
pub mod enums;
pub mod suggestion;

pub use conversation::*;
pub use enums::*;
pub use suggestion::*;
