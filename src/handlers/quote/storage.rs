//! Quote lists as stored values.

use crate::error::HandlerError;
use crate::store::{Store, StoreError, Storer};
use serde::{Deserialize, Serialize};

pub const ERR_INDEX: &str = "index not valid";
pub const ERR_EMPTY: &str = "quote list not initialised";

/// Quotes waiting for a moderator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingQuotes {
    pub list: Vec<String>,
}

impl Storer for PendingQuotes {
    const INDEX: &'static str = "pending";
}

/// Approved quotes. Removed quotes leave an empty slot so indices stay
/// stable; approvals fill the first empty slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quotes {
    pub list: Vec<String>,
}

impl Storer for Quotes {
    const INDEX: &'static str = "quotes";
}

impl Quotes {
    /// Insert into the first empty slot, or append. Returns the index used.
    pub fn insert(&mut self, quote: String) -> usize {
        match self.list.iter().position(String::is_empty) {
            Some(slot) => {
                self.list[slot] = quote;
                slot
            }
            None => {
                self.list.push(quote);
                self.list.len() - 1
            }
        }
    }

    /// Indices of slots that still hold a quote.
    pub fn live(&self) -> impl Iterator<Item = (usize, &str)> {
        self.list
            .iter()
            .enumerate()
            .filter(|(_, quote)| !quote.is_empty())
            .map(|(index, quote)| (index, quote.as_str()))
    }
}

/// Load a list that must already exist.
pub fn load_existing<T: Storer>(store: &Store) -> Result<T, HandlerError> {
    match store.load::<T>() {
        Err(StoreError::NotFound(_)) => Err(HandlerError::user(ERR_EMPTY)),
        other => Ok(other?),
    }
}

/// Persist both lists of a move, destination first. A failed second write
/// leaves the quote in both lists instead of neither.
pub fn save_move<D: Storer, S: Storer>(store: &Store, destination: &D, source: &S) -> Result<(), HandlerError> {
    store.save(destination)?;
    store.save(source)?;
    Ok(())
}

/// Turn a user-supplied index into a position in a list of `len` items.
pub fn check_index(index: i64, len: usize) -> Result<usize, HandlerError> {
    usize::try_from(index)
        .ok()
        .filter(|index| *index < len)
        .ok_or_else(|| HandlerError::user(ERR_INDEX))
}
