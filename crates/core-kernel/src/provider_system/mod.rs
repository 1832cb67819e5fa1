//! # Core Kernel Provider System
//!
//! Service providers are the pluggable units the kernel drives through
//! `register`, `boot` and `dispose`.
//!
//! - **[`traits`]**: the [`ServiceProvider`] contract and [`ProviderState`].
//! - **[`repository`]**: [`ProviderRepository`], the ordered set of
//!   registered providers.
//!
//! Ordering between the three hooks is guaranteed by the bootstrap pipeline,
//! not by the repository: `boot` does not check that `register` ran.
pub mod repository;
pub mod traits;

pub use repository::ProviderRepository;
pub use traits::{ProviderOptions, ProviderState, ServiceProvider};
