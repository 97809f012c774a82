//! Common types used throughout the HCP integration.
//!
//! This module defines the status taxonomy, request descriptors, the
//! response model, and the named output fields responses expose.

mod fields;
mod requests;
mod responses;
mod status;

pub use fields::*;
pub use requests::*;
pub use responses::*;
pub use status::*;
