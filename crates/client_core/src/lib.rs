//! Client core for the biosample service: request lifecycle tracking,
//! pagination and the screens that compose them.

pub mod config;
pub mod error;
pub mod pagination;
pub mod resource;
pub mod screens;
pub mod transport;
pub mod validation;

pub use config::{load_settings, ClientSettings};
pub use error::{ClientError, ValidationError};
pub use pagination::{PageWindow, PaginationCoordinator};
pub use resource::{RequestState, RequestStatus, ResourceController};
pub use transport::{HttpSampleApi, SampleApi};

#[cfg(test)]
pub(crate) mod testing;
