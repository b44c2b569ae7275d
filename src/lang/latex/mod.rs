pub mod completion;

mod snippet;
pub use snippet::*;

mod trigger;
pub use trigger::*;
