mod contact;
mod upload;

pub use contact::*;
pub use upload::*;
