mod codec;
mod path_mappings;
mod scan;
mod sessions;

pub use codec::*;
pub use path_mappings::*;
pub use scan::*;
pub use sessions::*;
