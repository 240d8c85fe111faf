//! # devmeta-domain
//!
//! Pure domain model for the devmeta IoT metadata service.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions
//! - Define the **aspect taxonomy** and its flattened closure ([`aspect::AspectNode`])
//! - Define **functions** (measuring / controlling capabilities)
//! - Define **device types**, their services and the nested content variables
//! - Define **interactions** and the capability rule that matches them
//! - Define **filter criteria**, **selectables** and **device groups**
//! - Contain all invariant enforcement and field validation
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod aspect;
pub mod attribute;
pub mod device_group;
pub mod device_type;
pub mod filter;
pub mod function;
pub mod interaction;
pub mod selectable;
