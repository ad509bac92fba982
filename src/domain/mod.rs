mod encoding;
mod parse;
mod rank;
mod types;

pub use encoding::*;
pub use parse::*;
pub use rank::*;
pub use types::*;
