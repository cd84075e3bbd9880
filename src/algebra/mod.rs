mod auth;
mod executor;
mod logger;
mod metrics;
mod transport;

pub use auth::*;
pub use executor::*;
pub use logger::*;
pub use self::metrics::*;
pub use transport::*;
