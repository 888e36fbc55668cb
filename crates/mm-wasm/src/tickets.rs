//! Numeric handles for generator tickets crossing into JavaScript.

use mm_editor::Ticket;
use std::collections::HashMap;

/// Outstanding tickets by the id handed to JS. Id 0 means "no request".
#[derive(Debug, Default)]
pub struct TicketBook {
    open: HashMap<u32, Ticket>,
    next: u32,
}

impl TicketBook {
    /// Hand out an id for `ticket`. Ids of older tickets for the same
    /// request are forgotten, since their responses would be stale anyway.
    pub fn register(&mut self, ticket: Option<Ticket>) -> u32 {
        let Some(ticket) = ticket else {
            return 0;
        };
        self.open
            .retain(|_, t| t.kind() != ticket.kind() || t.key() != ticket.key());
        self.next = self.next.wrapping_add(1).max(1);
        self.open.insert(self.next, ticket);
        self.next
    }

    pub fn take(&mut self, id: u32) -> Option<Ticket> {
        self.open.remove(&id)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.open.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}
