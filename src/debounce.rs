//! Trailing-edge debouncer.
//!
//! Every keystroke is [`Debouncer::push`]ed; the caller sleeps for the
//! quiet period and then calls [`Debouncer::settle`] with its ticket.
//! Only the newest ticket yields a value, so a burst of input collapses
//! into one propagated change.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug)]
pub struct Debouncer<T> {
    latest: u64,
    pending: Option<T>,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self {
            latest: 0,
            pending: None,
        }
    }
}

impl<T> Debouncer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: T) -> Ticket {
        self.latest += 1;
        self.pending = Some(value);
        Ticket(self.latest)
    }

    /// Takes the pending value if `ticket` is still the newest one.
    pub fn settle(&mut self, ticket: Ticket) -> Option<T> {
        if ticket.0 == self.latest {
            self.pending.take()
        } else {
            None
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
