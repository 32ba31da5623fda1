pub mod dataset;
pub mod generate;
pub mod identities;
pub mod util;

pub use dataset::*;
pub use generate::*;
pub use identities::*;
pub use util::*;
