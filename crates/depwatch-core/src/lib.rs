pub mod detect;
pub mod model;
pub mod snapshot;

pub use detect::*;
pub use model::*;
pub use snapshot::*;
