pub mod config;
pub mod lifecycle;
pub mod poller;
pub mod resolver;

pub use config::*;
pub use lifecycle::*;
pub use poller::*;
pub use resolver::*;
