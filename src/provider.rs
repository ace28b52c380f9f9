//! Provider-facing descriptors (data) and the adapter contract (behavior).
//!
//! `descriptor` exposes validated configuration (`ProviderDescriptor`) covering the callback
//! URL, the Steam Web API key, HTTPS-only endpoints, and the static identity fields hosts show on
//! their sign-in page. `contract` defines [`ProviderAdapter`], the capability set an
//! authentication orchestrator drives during a sign-in cycle.

pub mod contract;
pub mod descriptor;

pub use contract::*;
pub use descriptor::*;
