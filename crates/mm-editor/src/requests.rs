//! Request fencing for generator calls.
//!
//! Each outbound request takes a ticket for its kind. Issuing a newer ticket
//! of the same kind supersedes older ones, so a late response for an old
//! ticket is recognised and dropped instead of overwriting fresher data.

use std::collections::HashMap;

/// What a request asks the generator for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Ideas,
    ImageIdeas,
    Tasks,
    /// Breakdown of one task; tickets are keyed by task id.
    Breakdown,
}

/// Proof of an issued request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    kind: RequestKind,
    key: String,
    seq: u64,
}

impl Ticket {
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    /// Task id for breakdown tickets, empty otherwise.
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Monotonic ticket issuer.
#[derive(Debug, Default)]
pub struct RequestFence {
    next: u64,
    /// Latest live ticket per `(kind, key)`.
    latest: HashMap<(RequestKind, String), u64>,
}

impl RequestFence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, kind: RequestKind) -> Ticket {
        self.issue_keyed(kind, "")
    }

    /// Issue a ticket scoped to `key` within `kind`.
    pub fn issue_keyed(&mut self, kind: RequestKind, key: &str) -> Ticket {
        self.next += 1;
        self.latest.insert((kind, key.to_string()), self.next);
        Ticket {
            kind,
            key: key.to_string(),
            seq: self.next,
        }
    }

    /// Whether `ticket` is still the latest of its kind.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.latest.get(&(ticket.kind, ticket.key.clone())) == Some(&ticket.seq)
    }

    /// Retire `ticket`. Returns `true` if it was current, meaning its
    /// response should be applied.
    pub fn complete(&mut self, ticket: &Ticket) -> bool {
        if !self.is_current(ticket) {
            log::debug!("discarding stale {:?} response #{}", ticket.kind, ticket.seq);
            return false;
        }
        self.latest.remove(&(ticket.kind, ticket.key.clone()));
        true
    }

    /// Whether any request of `kind` is outstanding (drives loading indicators).
    pub fn is_pending(&self, kind: RequestKind) -> bool {
        self.latest.keys().any(|(k, _)| *k == kind)
    }

    /// Whether a request of `kind` scoped to `key` is outstanding.
    pub fn is_pending_keyed(&self, kind: RequestKind, key: &str) -> bool {
        self.latest.contains_key(&(kind, key.to_string()))
    }
}
