//! Tienda Core - Shared types library.
//!
//! This crate provides the domain types used across all Tienda components:
//! - `store` - Persistent snapshots, the order lifecycle and admin services
//! - `cli` - Command-line storefront and admin tools
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure helpers - no I/O and
//! no storage access. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - IDs, prices, order statuses and the storefront records
//! - [`clock`] - Time source for order timestamps
//! - [`notify`] - Tracking messages and WhatsApp contact links

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod clock;
pub mod notify;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock, format_timestamp};
pub use notify::{ContactLinkBuilder, build_contact_link, build_tracking_message};
pub use types::*;
