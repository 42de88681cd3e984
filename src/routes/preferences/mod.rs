mod get;
mod toggle;
mod undo;

pub use get::*;
pub use toggle::*;
pub use undo::*;
