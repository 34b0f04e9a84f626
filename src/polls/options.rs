//! Draft option set
//!
//! Holds the option rows of a poll while it is being authored. Rows may be
//! empty while editing; empty rows are dropped on finalize.

use serde::Serialize;

use super::error::PollError;
use super::model::{SlotId, MAX_OPTIONS, MIN_OPTIONS};

/// A single editable option row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionSlot {
    pub id: SlotId,
    pub text: String,
}

/// Ordered, bounded collection of candidate option texts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollOptionSet {
    slots: Vec<OptionSlot>,
    next_slot: u32,
}

impl Default for PollOptionSet {
    fn default() -> Self {
        Self::new()
    }
}

impl PollOptionSet {
    /// Create a set with the minimum number of empty rows
    pub fn new() -> Self {
        let mut set = Self {
            slots: Vec::with_capacity(MAX_OPTIONS),
            next_slot: 0,
        };
        set.pad_to_minimum();
        set
    }

    /// Create a set from option texts, in order
    ///
    /// Fails with `TooManyOptions` if more than the maximum are given. Fewer
    /// than the minimum are padded with empty rows.
    pub fn from_texts<I, S>(texts: I) -> Result<Self, PollError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self {
            slots: Vec::with_capacity(MAX_OPTIONS),
            next_slot: 0,
        };
        for text in texts {
            set.add(text)?;
        }
        set.pad_to_minimum();
        Ok(set)
    }

    fn pad_to_minimum(&mut self) {
        while self.slots.len() < MIN_OPTIONS {
            self.push_slot(String::new());
        }
    }

    fn push_slot(&mut self, text: String) -> SlotId {
        let id = SlotId(self.next_slot);
        self.next_slot += 1;
        self.slots.push(OptionSlot { id, text });
        id
    }

    /// Append a new row
    pub fn add(&mut self, text: impl Into<String>) -> Result<SlotId, PollError> {
        if self.slots.len() >= MAX_OPTIONS {
            return Err(PollError::TooManyOptions { max: MAX_OPTIONS });
        }
        Ok(self.push_slot(text.into()))
    }

    /// Remove a row, keeping at least the minimum number of rows
    pub fn remove(&mut self, id: SlotId) -> Result<(), PollError> {
        if self.slots.len() <= MIN_OPTIONS {
            return Err(PollError::TooFewOptions { min: MIN_OPTIONS });
        }
        let index = self.index_of(id)?;
        self.slots.remove(index);
        Ok(())
    }

    /// Replace the text of a row
    pub fn set_text(&mut self, id: SlotId, text: impl Into<String>) -> Result<(), PollError> {
        let index = self.index_of(id)?;
        self.slots[index].text = text.into();
        Ok(())
    }

    fn index_of(&self, id: SlotId) -> Result<usize, PollError> {
        self.slots
            .iter()
            .position(|s| s.id == id)
            .ok_or(PollError::UnknownSlot(id))
    }

    pub fn slots(&self) -> &[OptionSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Non-empty option texts in order, as entered
    pub fn finalize(&self) -> Result<Vec<String>, PollError> {
        let texts: Vec<String> = self
            .slots
            .iter()
            .filter(|s| !s.text.trim().is_empty())
            .map(|s| s.text.clone())
            .collect();

        if texts.len() < MIN_OPTIONS {
            return Err(PollError::InsufficientOptions {
                found: texts.len(),
                min: MIN_OPTIONS,
            });
        }
        Ok(texts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_two_empty_rows() {
        let set = PollOptionSet::new();
        assert_eq!(set.len(), 2);
        assert!(set.slots().iter().all(|s| s.text.is_empty()));
    }

    #[test]
    fn test_add_up_to_maximum() {
        let mut set = PollOptionSet::new();
        for i in 2..MAX_OPTIONS {
            set.add(format!("Option {}", i)).unwrap();
        }
        assert_eq!(set.len(), 12);

        let result = set.add("One too many");
        assert_eq!(result, Err(PollError::TooManyOptions { max: 12 }));
        assert_eq!(set.len(), 12);
    }

    #[test]
    fn test_from_texts_rejects_thirteen() {
        let texts: Vec<String> = (0..13).map(|i| format!("Option {}", i)).collect();
        let result = PollOptionSet::from_texts(texts);
        assert_eq!(result, Err(PollError::TooManyOptions { max: 12 }));
    }

    #[test]
    fn test_from_texts_pads_short_lists() {
        let set = PollOptionSet::from_texts(["Only"]).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.slots()[0].text, "Only");
        assert_eq!(set.slots()[1].text, "");
    }

    #[test]
    fn test_remove_keeps_minimum() {
        let mut set = PollOptionSet::from_texts(["A", "B", "C"]).unwrap();
        let first = set.slots()[0].id;
        set.remove(first).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.slots()[0].text, "B");

        let next = set.slots()[0].id;
        assert_eq!(set.remove(next), Err(PollError::TooFewOptions { min: 2 }));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_remove_unknown_slot() {
        let mut set = PollOptionSet::from_texts(["A", "B", "C"]).unwrap();
        assert_eq!(
            set.remove(SlotId(99)),
            Err(PollError::UnknownSlot(SlotId(99)))
        );
    }

    #[test]
    fn test_slot_ids_not_reused() {
        let mut set = PollOptionSet::from_texts(["A", "B", "C"]).unwrap();
        let last = set.slots()[2].id;
        set.remove(last).unwrap();
        let added = set.add("D").unwrap();
        assert_ne!(added, last);
    }

    #[test]
    fn test_set_text() {
        let mut set = PollOptionSet::new();
        let id = set.slots()[1].id;
        set.set_text(id, "Sushi").unwrap();
        assert_eq!(set.slots()[1].text, "Sushi");
    }

    #[test]
    fn test_finalize_drops_blank_rows() {
        let mut set = PollOptionSet::from_texts(["Pizza", "   ", "Sushi"]).unwrap();
        set.add("").unwrap();
        assert_eq!(set.finalize().unwrap(), vec!["Pizza", "Sushi"]);
    }

    #[test]
    fn test_finalize_insufficient() {
        let set = PollOptionSet::from_texts(["Pizza", " "]).unwrap();
        assert_eq!(
            set.finalize(),
            Err(PollError::InsufficientOptions { found: 1, min: 2 })
        );
    }
}
