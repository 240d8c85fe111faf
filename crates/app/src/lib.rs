//! # devmeta-app
//!
//! Application layer: the selection engine, use-cases and **port
//! definitions** (traits).
//!
//! ## Responsibilities
//! - Resolve **selectables**: which services of which device types expose
//!   data paths matching a list of filter criteria (`selection`)
//! - Reduce redundant **device-group criteria** using the aspect closure
//!   (`device_group_reducer`)
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `AspectRepository`: CRUD for aspect trees
//!   - `AspectNodeRepository`: the flattened aspect closure
//!   - `FunctionRepository`: function lookups
//!   - `DeviceTypeRepository`: filtered device type listing
//! - Define **driving/inbound ports** as use-case structs:
//!   - `AspectService`: aspect writes and closure recomputation
//!   - `SelectableService`: per-request snapshot loading + selection
//!   - `DeviceGroupService`: criteria validation and reduction
//!
//! ## Dependency rule
//! Depends on `devmeta-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod device_group_reducer;
pub mod ports;
pub mod selection;
pub mod services;
