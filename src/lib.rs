//! Oktawave cloud management client
//!
//! SDK and command-line front end for the Oktawave API. The two pieces
//! reused across every command are [`resolve`], which turns a name or numeric
//! ID into a resource ID, and [`report`], which renders records as tables.

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod report;
pub mod resolve;
