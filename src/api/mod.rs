//! Oktawave API interaction module
//!
//! This module wraps the Oktawave JSON API: transport, login and one
//! submodule of typed operations per resource category.
//!
//! # Module Structure
//!
//! - [`http`] - JSON-over-HTTP transport for one service endpoint
//! - [`client`] - Login and the authenticated [`Session`]
//! - [`fields`] - Field extraction helpers and vendor constants
//! - [`account`], [`oci`], [`ovs`], [`ordb`], [`container`], [`opn`] - operations
//!
//! # Example
//!
//! ```ignore
//! use oktawave::api::{Credentials, OktawaveClient, DEFAULT_API_URL};
//!
//! async fn example(credentials: Credentials) -> anyhow::Result<()> {
//!     let session = OktawaveClient::new(DEFAULT_API_URL, &credentials)?.login().await?;
//!     for vm in session.oci_list().await? {
//!         println!("{} {}", vm.id, vm.name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod account;
pub mod client;
pub mod container;
pub mod fields;
pub mod http;
pub mod oci;
pub mod opn;
pub mod ordb;
pub mod ovs;

pub use client::{Credentials, OktawaveClient, Session, DEFAULT_API_URL};
pub use http::format_api_error;
