//! Destructive actions and deferred confirmation
//!
//! Surfaces with a blocking prompt go through `ConfirmationGate`. Surfaces
//! that can only ask asynchronously (a TUI waiting for the next key) use the
//! two-phase form: request a token, show the prompt, then resolve the token
//! with the user's answer. Nothing is mutated until the token is resolved
//! with `accepted = true`. Only one prompt is open at a time: requesting a
//! new confirmation abandons the previous token.

use std::fmt;

use crate::models::{Collection, EntryId};

/// An action that needs the user's consent before it runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestructiveAction {
    /// Delete one entry from the texts log
    DeletePrimary(EntryId),
    /// Remove one favorite
    RemoveFavorite(EntryId),
    /// Remove one important entry
    RemoveImportant(EntryId),
    /// Empty a whole collection
    Clear(Collection),
}

impl DestructiveAction {
    /// Question shown to the user
    pub fn prompt(&self) -> &'static str {
        match self {
            DestructiveAction::DeletePrimary(_) => "Delete this text?",
            DestructiveAction::RemoveFavorite(_) => "Remove this text from favorites?",
            DestructiveAction::RemoveImportant(_) => "Remove this text from important?",
            DestructiveAction::Clear(Collection::Texts) => {
                "Clear all recorded texts? This cannot be undone."
            }
            DestructiveAction::Clear(Collection::Favorites) => {
                "Clear all favorites? This cannot be undone."
            }
            DestructiveAction::Clear(Collection::Important) => {
                "Clear all important texts? This cannot be undone."
            }
        }
    }

    /// Collection the action mutates
    pub fn collection(&self) -> Collection {
        match self {
            DestructiveAction::DeletePrimary(_) => Collection::Texts,
            DestructiveAction::RemoveFavorite(_) => Collection::Favorites,
            DestructiveAction::RemoveImportant(_) => Collection::Important,
            DestructiveAction::Clear(collection) => *collection,
        }
    }
}

/// Handle for a pending confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfirmationToken(u64);

impl fmt::Display for ConfirmationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a surface needs to ask the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationRequest {
    pub token: ConfirmationToken,
    pub action: DestructiveAction,
    pub prompt: &'static str,
}

/// The outstanding confirmation, if any
#[derive(Debug, Default)]
pub(crate) struct PendingConfirmations {
    next: u64,
    pending: Option<(ConfirmationToken, DestructiveAction)>,
}

impl PendingConfirmations {
    /// Issue a fresh token, replacing any unresolved one
    pub(crate) fn request(&mut self, action: DestructiveAction) -> ConfirmationRequest {
        self.next += 1;
        let token = ConfirmationToken(self.next);
        self.pending = Some((token, action));
        ConfirmationRequest {
            token,
            action,
            prompt: action.prompt(),
        }
    }

    /// Take the action for a token; each token resolves once
    pub(crate) fn take(&mut self, token: ConfirmationToken) -> Option<DestructiveAction> {
        match self.pending {
            Some((pending, action)) if pending == token => {
                self.pending = None;
                Some(action)
            }
            _ => None,
        }
    }

    pub(crate) fn len(&self) -> usize {
        usize::from(self.pending.is_some())
    }
}
