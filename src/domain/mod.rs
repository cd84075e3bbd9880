mod call;
mod fault;
mod outcome;

pub use call::*;
pub use fault::*;
pub use outcome::*;
