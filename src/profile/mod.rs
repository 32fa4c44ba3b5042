//! Client connection profiles.
//!
//! A single base profile is built from the topology and a
//! [`DeploymentContext`], then two variants per organization are rendered
//! from it and written as JSON.

pub mod builder;
pub mod context;
pub mod types;
pub mod writer;

pub use builder::{build_profile, ProfileOptions, ProfileOverrides, CHANNEL_NAME};
pub use context::DeploymentContext;
pub use types::*;
pub use writer::{render_variants, to_pretty_json, write_profiles, ProfileVariant, RenderedProfile};
