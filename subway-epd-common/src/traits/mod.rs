pub mod clock;
pub mod display;
pub mod source;

pub use clock::*;
pub use display::*;
pub use source::*;
