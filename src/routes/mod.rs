mod health_check;
mod home;
mod preferences;

pub use health_check::*;
pub use home::*;
pub use preferences::*;
