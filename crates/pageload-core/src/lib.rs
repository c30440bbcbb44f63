pub mod config;
pub mod logging;

pub mod classify;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod markup;
pub mod naming;

pub use config::{CollisionPolicy, LoaderConfig};
pub use error::{FsCause, PageLoadError, ResourceFailure, TransportCause};
pub use loader::{load_page, PageLoadReport, ResourceOutcome};
