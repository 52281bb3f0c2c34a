pub mod conversion;
pub mod definition;
pub mod spec;

pub use conversion::*;
pub use definition::*;
pub use spec::*;
