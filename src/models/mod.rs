pub mod conversation;
pub mod enums;
pub mod financial;
pub mod patient;

pub use conversation::*;
pub use enums::*;
pub use financial::*;
pub use patient::*;
