//! Service layer
//!
//! - [`PosService`] - order checkout, persistence and printer ownership

pub mod error;
pub mod pos;

pub use error::{PosError, PosResult};
pub use pos::{Checkout, PosService, Settlement};
