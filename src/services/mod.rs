//! Ranking pipeline stages
//!
//! Each stage is a free function over a borrowed [`CatalogSnapshot`]; none of
//! them hold state between requests.
//!
//! [`CatalogSnapshot`]: crate::catalog::CatalogSnapshot

pub mod diversity;
pub mod explain;
pub mod filter;
pub mod profile;
pub mod recommendations;
pub mod scoring;

pub use recommendations::recommend;
