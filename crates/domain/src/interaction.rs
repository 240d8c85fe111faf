//! Interaction: how a service exchanges data with the platform.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Interaction mode of a service.
///
/// Each mode stands for a set of capabilities: `event` → {event},
/// `request` → {request}, `event_and_request` → {event, request}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interaction {
    Event,
    Request,
    EventAndRequest,
}

impl Interaction {
    fn has_event(self) -> bool {
        matches!(self, Self::Event | Self::EventAndRequest)
    }

    fn has_request(self) -> bool {
        matches!(self, Self::Request | Self::EventAndRequest)
    }

    /// Whether every capability of `self` is also offered by `other`.
    #[must_use]
    pub fn is_subset_of(self, other: Self) -> bool {
        (!self.has_event() || other.has_event()) && (!self.has_request() || other.has_request())
    }

    /// Whether a service with this interaction satisfies `filter`.
    ///
    /// An empty filter accepts everything. Otherwise at least one requested
    /// interaction must be covered by this interaction's capabilities.
    #[must_use]
    pub fn satisfies(self, filter: &[Interaction]) -> bool {
        filter.is_empty() || filter.iter().any(|wanted| wanted.is_subset_of(self))
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Request => "request",
            Self::EventAndRequest => "event_and_request",
        }
    }
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
