use crate::error::AppError;

/// Identifies one issued fetch. Only the most recently issued ticket may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

/// Monotonic request counter owned by one screen.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: u64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> RequestTicket {
        self.latest += 1;
        RequestTicket(self.latest)
    }

    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Discarded,
}

/// Displayed data for one fetchable resource, guarded against out-of-order completions.
///
/// `begin` tags a fetch; `complete` applies its result only when no later fetch was issued in the
/// meantime. Superseded results (successful or not) are dropped without surfacing anything.
#[derive(Debug)]
pub struct Latest<T> {
    sequence: RequestSequence,
    value: Option<T>,
    error: Option<AppError>,
    loading: bool,
}

impl<T> Default for Latest<T> {
    fn default() -> Self {
        Self {
            sequence: RequestSequence::new(),
            value: None,
            error: None,
            loading: false,
        }
    }
}

impl<T> Latest<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> RequestTicket {
        self.loading = true;
        self.sequence.issue()
    }

    pub fn complete(&mut self, ticket: RequestTicket, result: Result<T, AppError>) -> Completion {
        if !self.sequence.is_latest(ticket) {
            tracing::debug!(seq = ticket.seq(), "discarding stale response");
            return Completion::Discarded;
        }
        self.loading = false;
        match result {
            Ok(v) => {
                self.value = Some(v);
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(seq = ticket.seq(), code = %e.code, "fetch failed");
                // Keep the last good value on screen next to the error.
                self.error = Some(e);
            }
        }
        Completion::Applied
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn error(&self) -> Option<&AppError> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tickets_increase_monotonically() {
        let mut seq = RequestSequence::new();
        let a = seq.issue();
        let b = seq.issue();
        assert!(b > a);
        assert!(!seq.is_latest(a));
        assert!(seq.is_latest(b));
    }

    #[test]
    fn slow_earlier_response_does_not_overwrite_later_one() {
        let mut latest: Latest<&str> = Latest::new();
        let a = latest.begin();
        let b = latest.begin();

        assert_eq!(latest.complete(b, Ok("B")), Completion::Applied);
        assert_eq!(latest.complete(a, Ok("A")), Completion::Discarded);
        assert_eq!(latest.value(), Some(&"B"));
        assert!(!latest.is_loading());
    }

    #[test]
    fn stale_failure_is_not_surfaced() {
        let mut latest: Latest<u32> = Latest::new();
        let a = latest.begin();
        let b = latest.begin();
        latest.complete(b, Ok(7));
        let outcome = latest.complete(a, Err(AppError::transport("TRANSPORT_REQUEST_FAILED", "boom")));
        assert_eq!(outcome, Completion::Discarded);
        assert!(latest.error().is_none());
    }

    #[test]
    fn current_failure_is_surfaced_and_keeps_last_value() {
        let mut latest: Latest<u32> = Latest::new();
        let a = latest.begin();
        latest.complete(a, Ok(1));
        let b = latest.begin();
        latest.complete(b, Err(AppError::transport("TRANSPORT_REQUEST_FAILED", "boom")));
        assert_eq!(latest.value(), Some(&1));
        assert_eq!(latest.error().map(|e| e.code.as_str()), Some("TRANSPORT_REQUEST_FAILED"));
    }
}
