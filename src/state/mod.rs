//! Container state module

mod alerts;
mod forms;
mod navigation;
mod options;

pub use alerts::*;
pub use forms::*;
pub use navigation::*;
pub use options::*;
