//! The clue ledger: which clues a room has handed out so far.
//!
//! Adding is idempotent. The ledger also carries the completion guard, so
//! no matter how many fixtures can complete a room, [`AddOutcome::Completed`]
//! is reported once.

use escapade_bus::ClueId;

use crate::LedgerError;

/// What [`ClueLedger::add`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Already collected; nothing changed.
    Duplicate,
    /// Newly collected, the room is not complete yet.
    Added,
    /// Newly collected, and this was the last required clue.
    Completed,
}

/// Clues collected in one room, in collection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClueLedger {
    clues: Vec<ClueId>,
    required: usize,
    completion_fired: bool,
}

impl ClueLedger {
    pub fn new(required: usize) -> Self {
        Self {
            clues: Vec::with_capacity(required),
            required,
            completion_fired: false,
        }
    }

    /// Records `clue`.
    ///
    /// # Errors
    /// [`LedgerError::Overflow`] if a new clue arrives once the ledger is full.
    pub fn add(&mut self, clue: ClueId) -> Result<AddOutcome, LedgerError> {
        if self.clues.contains(&clue) {
            return Ok(AddOutcome::Duplicate);
        }
        if self.clues.len() >= self.required {
            return Err(LedgerError::Overflow {
                clue,
                required: self.required,
            });
        }

        self.clues.push(clue);
        if self.is_complete() && !self.completion_fired {
            self.completion_fired = true;
            return Ok(AddOutcome::Completed);
        }
        Ok(AddOutcome::Added)
    }

    pub fn contains(&self, clue: &ClueId) -> bool {
        self.clues.contains(clue)
    }

    pub fn is_complete(&self) -> bool {
        self.clues.len() == self.required
    }

    pub fn clues(&self) -> &[ClueId] {
        &self.clues
    }

    pub fn len(&self) -> usize {
        self.clues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clues.is_empty()
    }

    pub fn required(&self) -> usize {
        self.required
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clue(s: &str) -> ClueId {
        ClueId::new(s)
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut ledger = ClueLedger::new(4);
        assert_eq!(ledger.add(clue("password")).unwrap(), AddOutcome::Added);
        assert_eq!(ledger.add(clue("password")).unwrap(), AddOutcome::Duplicate);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.clues(), &[clue("password")]);
    }

    #[test]
    fn test_completed_reported_once() {
        let mut ledger = ClueLedger::new(2);
        assert_eq!(ledger.add(clue("glove")).unwrap(), AddOutcome::Added);
        assert!(!ledger.is_complete());
        assert_eq!(ledger.add(clue("soap")).unwrap(), AddOutcome::Completed);
        assert!(ledger.is_complete());

        // Re-touching a completing clue stays a duplicate.
        assert_eq!(ledger.add(clue("soap")).unwrap(), AddOutcome::Duplicate);
        assert_eq!(ledger.add(clue("glove")).unwrap(), AddOutcome::Duplicate);
    }

    #[test]
    fn test_overflow_fails_loudly() {
        let mut ledger = ClueLedger::new(1);
        ledger.add(clue("glove")).unwrap();
        let err = ledger.add(clue("soap")).unwrap_err();
        assert_eq!(
            err,
            LedgerError::Overflow {
                clue: clue("soap"),
                required: 1
            }
        );
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_size_never_decreases() {
        let mut ledger = ClueLedger::new(3);
        let mut last = 0;
        for c in ["a", "b", "a", "c", "b"] {
            let _ = ledger.add(clue(c));
            assert!(ledger.len() >= last);
            last = ledger.len();
        }
        assert_eq!(last, 3);
    }
}
