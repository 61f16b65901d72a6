//! The annotation store
//!
//! The `Store` owns the three collections and coordinates between:
//! - the persistence adapter (every collection written whole after a change)
//! - the host surface (`Ui`: confirmation, notification, rendering, export,
//!   clipboard)
//!
//! ## Collections
//!
//! - **texts**: the primary log, newest first
//! - **favorites**: content snapshots of texts entries, one per origin
//! - **important**: content snapshots of texts entries, one per origin
//!
//! A snapshot's `original_id` always names a texts entry, even when it was
//! marked important from the favorites view. Deleting a texts entry never
//! touches its snapshots.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open(JsonFilePersistence::from_config(&config), ui, (&config).into());
//!
//! if let Outcome::Added { id, .. } = store.add_primary("call vendor") {
//!     store.add_to_favorites(id);
//!     store.toggle_important(id);
//! }
//! ```
//!
//! Operations never return errors. Each one reports what happened as an
//! `Outcome` and tells the user through `Notifier`.

use chrono::{Local, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::confirm::{ConfirmationRequest, ConfirmationToken, DestructiveAction, PendingConfirmations};
use crate::export::{export_file_name, render_export};
use crate::ids::IdGenerator;
use crate::models::{Collection, Entry, EntryId, DEFAULT_TIMESTAMP_FORMAT};
use crate::ports::Ui;
use crate::resolver;
use crate::storage::Persistence;

/// Per-session store settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    /// chrono format for `Entry::display_timestamp`
    pub timestamp_format: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl From<&Config> for StoreSettings {
    fn from(config: &Config) -> Self {
        Self {
            timestamp_format: config.timestamp_format.clone(),
        }
    }
}

/// A request the store declined to carry out
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("Please enter some text to record")]
    EmptyContent,

    #[error("This text is already in favorites")]
    AlreadyFavorited,

    #[error("This text is already marked important")]
    AlreadyImportant,

    #[error("No {} to clear", clear_noun(.0))]
    NothingToClear(Collection),

    #[error("No texts to export")]
    NothingToExport,
}

fn clear_noun(collection: &Collection) -> &'static str {
    match collection {
        Collection::Texts => "texts",
        Collection::Favorites => "favorites",
        Collection::Important => "important texts",
    }
}

/// Result of a store operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A new entry was created
    Added { collection: Collection, id: EntryId },
    /// One entry was removed by id
    Removed { collection: Collection, id: EntryId },
    /// A collection was emptied
    Cleared { collection: Collection, count: usize },
    /// The important mark for a texts id was toggled off
    Unmarked(EntryId),
    /// An entry's content went to the clipboard
    Copied(EntryId),
    /// The texts log was handed to the file sink
    Exported { file_name: String },
    /// Validation failed; nothing changed
    Rejected(Rejection),
    /// The target id no longer exists; nothing changed
    NotFound,
    /// The user declined the confirmation; nothing changed
    Declined,
    /// A collaborator failed; nothing changed
    Failed(String),
}

impl Outcome {
    /// Whether any collection changed
    pub fn changed(&self) -> bool {
        matches!(
            self,
            Outcome::Added { .. }
                | Outcome::Removed { .. }
                | Outcome::Cleared { .. }
                | Outcome::Unmarked(_)
        )
    }
}

/// Entry counts per collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counts {
    pub texts: usize,
    pub favorites: usize,
    pub important: usize,
}

/// The annotation store
pub struct Store<P: Persistence, U: Ui> {
    persistence: P,
    ui: U,
    texts: Vec<Entry>,
    favorites: Vec<Entry>,
    important: Vec<Entry>,
    ids: IdGenerator,
    pending: PendingConfirmations,
    settings: StoreSettings,
    degraded: bool,
}

impl<P: Persistence, U: Ui> Store<P, U> {
    /// Open the store, loading all three collections once
    ///
    /// A collection that cannot be read or decoded opens empty; the user is
    /// told and the problem is logged. All three views are rendered.
    pub fn open(persistence: P, ui: U, settings: StoreSettings) -> Self {
        let mut store = Self {
            persistence,
            ui,
            texts: Vec::new(),
            favorites: Vec::new(),
            important: Vec::new(),
            ids: IdGenerator::new(),
            pending: PendingConfirmations::default(),
            settings,
            degraded: false,
        };

        for collection in Collection::ALL {
            let entries = match store.persistence.load(collection) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Could not load {}, starting empty: {}", collection, e);
                    store.ui.notify(&format!(
                        "Could not read saved {}; starting empty",
                        collection.label().to_lowercase()
                    ));
                    Vec::new()
                }
            };
            *store.entries_mut(collection) = entries;
        }

        store.ids = IdGenerator::seeded(
            store
                .texts
                .iter()
                .chain(&store.favorites)
                .chain(&store.important)
                .map(|entry| entry.id),
        );

        debug!(
            "Store opened: {} texts, {} favorites, {} important",
            store.texts.len(),
            store.favorites.len(),
            store.important.len()
        );

        store.render_all();
        store
    }

    // ==================== Queries ====================

    pub fn texts(&self) -> &[Entry] {
        &self.texts
    }

    pub fn favorites(&self) -> &[Entry] {
        &self.favorites
    }

    pub fn important(&self) -> &[Entry] {
        &self.important
    }

    /// Entries of any collection
    pub fn entries(&self, collection: Collection) -> &[Entry] {
        match collection {
            Collection::Texts => &self.texts,
            Collection::Favorites => &self.favorites,
            Collection::Important => &self.important,
        }
    }

    /// Look up an entry by its own id
    pub fn get(&self, collection: Collection, id: EntryId) -> Option<&Entry> {
        resolver::find_by_id(self.entries(collection), id)
    }

    pub fn counts(&self) -> Counts {
        Counts {
            texts: self.texts.len(),
            favorites: self.favorites.len(),
            important: self.important.len(),
        }
    }

    /// Whether some important entry was copied from `primary_id`
    ///
    /// Always answered from the important collection itself.
    pub fn is_important(&self, primary_id: EntryId) -> bool {
        resolver::contains_original_id(&self.important, primary_id)
    }

    /// Whether the last save failed and memory is ahead of storage
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Tear the store down, returning its collaborators
    pub fn into_parts(self) -> (P, U) {
        (self.persistence, self.ui)
    }

    // ==================== Texts ====================

    /// Record a new text at the top of the log
    pub fn add_primary(&mut self, content: &str) -> Outcome {
        let content = content.trim();
        if content.is_empty() {
            return self.reject(Rejection::EmptyContent);
        }

        let entry = self.new_entry(content, None);
        let id = entry.id;
        self.texts.insert(0, entry);
        info!("Recorded text {}", id);

        self.persist(Collection::Texts);
        self.render(Collection::Texts);
        self.ui.clear_input();
        self.ui.notify("Text recorded");

        Outcome::Added {
            collection: Collection::Texts,
            id,
        }
    }

    /// Delete a text after confirmation; snapshots are kept
    pub fn delete_primary(&mut self, id: EntryId) -> Outcome {
        self.confirm_and_apply(DestructiveAction::DeletePrimary(id))
    }

    pub fn clear_primary(&mut self) -> Outcome {
        self.confirm_and_apply(DestructiveAction::Clear(Collection::Texts))
    }

    // ==================== Favorites ====================

    /// Snapshot a text into favorites, once per text
    pub fn add_to_favorites(&mut self, primary_id: EntryId) -> Outcome {
        let Some(content) = resolver::find_by_id(&self.texts, primary_id).map(|e| e.content.clone())
        else {
            debug!("add_to_favorites: text {} not found", primary_id);
            return Outcome::NotFound;
        };

        if resolver::contains_original_id(&self.favorites, primary_id) {
            return self.reject(Rejection::AlreadyFavorited);
        }

        let entry = self.new_entry(&content, Some(primary_id));
        let id = entry.id;
        self.favorites.insert(0, entry);
        info!("Favorited text {} as {}", primary_id, id);

        self.persist(Collection::Favorites);
        self.render(Collection::Favorites);
        self.ui.notify("Added to favorites");

        Outcome::Added {
            collection: Collection::Favorites,
            id,
        }
    }

    /// Remove a favorite after confirmation; important marks are kept
    pub fn remove_from_favorites(&mut self, favorite_id: EntryId) -> Outcome {
        self.confirm_and_apply(DestructiveAction::RemoveFavorite(favorite_id))
    }

    pub fn clear_favorites(&mut self) -> Outcome {
        self.confirm_and_apply(DestructiveAction::Clear(Collection::Favorites))
    }

    // ==================== Important ====================

    /// Mark a text important, copying its content from the log
    pub fn add_to_important(&mut self, primary_id: EntryId) -> Outcome {
        let Some(content) = resolver::find_by_id(&self.texts, primary_id).map(|e| e.content.clone())
        else {
            debug!("add_to_important: text {} not found", primary_id);
            return Outcome::NotFound;
        };

        self.insert_important(primary_id, content)
    }

    /// Mark a favorite's origin important, copying the favorite's content
    pub fn add_favorite_to_important(&mut self, favorite_id: EntryId) -> Outcome {
        let Some((origin, content)) = resolver::find_by_id(&self.favorites, favorite_id)
            .map(|e| (e.origin(), e.content.clone()))
        else {
            debug!("add_favorite_to_important: favorite {} not found", favorite_id);
            return Outcome::NotFound;
        };

        self.insert_important(origin, content)
    }

    /// Remove an important entry after confirmation
    pub fn remove_from_important(&mut self, important_id: EntryId) -> Outcome {
        self.confirm_and_apply(DestructiveAction::RemoveImportant(important_id))
    }

    pub fn clear_important(&mut self) -> Outcome {
        self.confirm_and_apply(DestructiveAction::Clear(Collection::Important))
    }

    /// Flip the important mark for a text; turning it off needs no confirmation
    pub fn toggle_important(&mut self, primary_id: EntryId) -> Outcome {
        if self.is_important(primary_id) {
            self.unmark(primary_id)
        } else {
            self.add_to_important(primary_id)
        }
    }

    /// Flip the important mark for a favorite's origin
    pub fn toggle_favorite_important(&mut self, favorite_id: EntryId) -> Outcome {
        let Some(origin) = resolver::find_by_id(&self.favorites, favorite_id).map(Entry::origin)
        else {
            debug!("toggle_favorite_important: favorite {} not found", favorite_id);
            return Outcome::NotFound;
        };

        if self.is_important(origin) {
            self.unmark(origin)
        } else {
            self.add_favorite_to_important(favorite_id)
        }
    }

    // ==================== Clipboard & Export ====================

    /// Put an entry's content on the clipboard
    pub fn copy_entry(&mut self, collection: Collection, id: EntryId) -> Outcome {
        let Some(content) = self.get(collection, id).map(|e| e.content.clone()) else {
            return Outcome::NotFound;
        };

        match self.ui.copy_text(&content) {
            Ok(()) => {
                self.ui.notify(&format!("Copied: {}", content));
                Outcome::Copied(id)
            }
            Err(e) => {
                warn!("Clipboard copy failed: {:#}", e);
                let message = format!("Copy failed: {:#}", e);
                self.ui.notify(&message);
                Outcome::Failed(message)
            }
        }
    }

    /// Hand the texts log to the file sink as plain text
    pub fn export_primary(&mut self) -> Outcome {
        if self.texts.is_empty() {
            return self.reject(Rejection::NothingToExport);
        }

        let content = render_export(&self.texts);
        let file_name = export_file_name(Local::now().date_naive());

        match self.ui.save_text_file(&file_name, &content) {
            Ok(()) => {
                info!("Exported {} texts to {}", self.texts.len(), file_name);
                self.ui.notify(&format!("Texts exported to {}", file_name));
                Outcome::Exported { file_name }
            }
            Err(e) => {
                warn!("Export failed: {:#}", e);
                let message = format!("Export failed: {:#}", e);
                self.ui.notify(&message);
                Outcome::Failed(message)
            }
        }
    }

    // ==================== Confirmation ====================

    /// First phase of a deferred confirmation
    ///
    /// Checks that the action still has a target. Returns the outcome
    /// instead of a request when there is nothing to confirm. An earlier
    /// unresolved request is abandoned.
    pub fn request_confirmation(
        &mut self,
        action: DestructiveAction,
    ) -> Result<ConfirmationRequest, Outcome> {
        self.check_action(action)?;
        let request = self.pending.request(action);
        debug!("Confirmation {} requested for {:?}", request.token, action);
        Ok(request)
    }

    /// Second phase: apply the action only if `accepted`
    ///
    /// Unknown or already-resolved tokens are `NotFound`.
    pub fn resolve_confirmation(&mut self, token: ConfirmationToken, accepted: bool) -> Outcome {
        let Some(action) = self.pending.take(token) else {
            debug!("Confirmation {} is not pending", token);
            return Outcome::NotFound;
        };

        if !accepted {
            debug!("Confirmation {} declined", token);
            return Outcome::Declined;
        }

        // State may have changed while the prompt was up
        if let Err(outcome) = self.check_action(action) {
            return outcome;
        }

        self.apply(action)
    }

    /// Number of unresolved confirmation tokens
    pub fn pending_confirmations(&self) -> usize {
        self.pending.len()
    }

    // ==================== Rendering ====================

    /// Render all three views
    pub fn render_all(&mut self) {
        for collection in Collection::ALL {
            self.render(collection);
        }
    }

    /// Render one view with the current important membership
    pub fn render(&mut self, collection: Collection) {
        let entries = match collection {
            Collection::Texts => &self.texts,
            Collection::Favorites => &self.favorites,
            Collection::Important => &self.important,
        };
        let important = &self.important;
        let is_important = |id: EntryId| resolver::contains_original_id(important, id);
        self.ui.render(collection, entries, &is_important);
    }

    // ==================== Internals ====================

    fn entries_mut(&mut self, collection: Collection) -> &mut Vec<Entry> {
        match collection {
            Collection::Texts => &mut self.texts,
            Collection::Favorites => &mut self.favorites,
            Collection::Important => &mut self.important,
        }
    }

    fn new_entry(&mut self, content: &str, original_id: Option<EntryId>) -> Entry {
        let id = self.ids.next_id();
        let now = Utc::now();
        match original_id {
            Some(original_id) => {
                Entry::derived(id, original_id, content, now, &self.settings.timestamp_format)
            }
            None => Entry::new(id, content, now, &self.settings.timestamp_format),
        }
    }

    fn reject(&mut self, rejection: Rejection) -> Outcome {
        debug!("Rejected: {:?}", rejection);
        self.ui.notify(&rejection.to_string());
        Outcome::Rejected(rejection)
    }

    fn insert_important(&mut self, origin: EntryId, content: String) -> Outcome {
        if self.is_important(origin) {
            return self.reject(Rejection::AlreadyImportant);
        }

        let entry = self.new_entry(&content, Some(origin));
        let id = entry.id;
        self.important.insert(0, entry);
        info!("Marked text {} important as {}", origin, id);

        self.persist(Collection::Important);
        self.render_marked_views();
        self.ui.notify("Marked as important");

        Outcome::Added {
            collection: Collection::Important,
            id,
        }
    }

    fn unmark(&mut self, origin: EntryId) -> Outcome {
        self.important
            .retain(|entry| entry.original_id != Some(origin));
        info!("Removed important mark from text {}", origin);

        self.persist(Collection::Important);
        self.render_marked_views();
        self.ui.notify("Important mark removed");

        Outcome::Unmarked(origin)
    }

    /// Views whose star markers follow the important collection
    fn render_marked_views(&mut self) {
        self.render(Collection::Important);
        self.render(Collection::Texts);
        self.render(Collection::Favorites);
    }

    fn confirm_and_apply(&mut self, action: DestructiveAction) -> Outcome {
        match self.request_confirmation(action) {
            Ok(request) => {
                let accepted = self.ui.confirm(request.prompt);
                self.resolve_confirmation(request.token, accepted)
            }
            Err(outcome) => outcome,
        }
    }

    /// Preconditions shared by both confirmation paths
    fn check_action(&mut self, action: DestructiveAction) -> Result<(), Outcome> {
        match action {
            DestructiveAction::DeletePrimary(id)
            | DestructiveAction::RemoveFavorite(id)
            | DestructiveAction::RemoveImportant(id) => {
                if self.get(action.collection(), id).is_none() {
                    debug!("{:?}: target not found", action);
                    return Err(Outcome::NotFound);
                }
            }
            DestructiveAction::Clear(collection) => {
                if self.entries(collection).is_empty() {
                    return Err(self.reject(Rejection::NothingToClear(collection)));
                }
            }
        }
        Ok(())
    }

    fn apply(&mut self, action: DestructiveAction) -> Outcome {
        let collection = action.collection();
        let outcome = match action {
            DestructiveAction::DeletePrimary(id)
            | DestructiveAction::RemoveFavorite(id)
            | DestructiveAction::RemoveImportant(id) => {
                let entries = self.entries_mut(collection);
                match resolver::position_by_id(entries, id) {
                    Some(index) => {
                        entries.remove(index);
                    }
                    None => return Outcome::NotFound,
                }
                info!("Removed {} from {}", id, collection);
                Outcome::Removed { collection, id }
            }
            DestructiveAction::Clear(collection) => {
                let entries = self.entries_mut(collection);
                let count = entries.len();
                entries.clear();
                info!("Cleared {} {}", count, collection);
                Outcome::Cleared { collection, count }
            }
        };

        self.persist(collection);
        if collection == Collection::Important {
            self.render_marked_views();
        } else {
            self.render(collection);
        }
        self.ui.notify(success_message(action));

        outcome
    }

    /// Write one whole collection through the adapter
    fn persist(&mut self, collection: Collection) {
        let entries = match collection {
            Collection::Texts => &self.texts,
            Collection::Favorites => &self.favorites,
            Collection::Important => &self.important,
        };

        match self.persistence.save(collection, entries) {
            Ok(()) => {
                if self.degraded {
                    info!("Storage writable again");
                    self.degraded = false;
                }
            }
            Err(e) => {
                warn!("Failed to save {}: {}", collection, e);
                self.degraded = true;
                let mut message = format!("Could not save {}: {}", collection.label().to_lowercase(), e);
                if let Some(hint) = e.recovery_suggestion() {
                    message.push(' ');
                    message.push_str(hint);
                }
                self.ui.notify(&message);
            }
        }
    }
}

fn success_message(action: DestructiveAction) -> &'static str {
    match action {
        DestructiveAction::DeletePrimary(_) => "Text deleted",
        DestructiveAction::RemoveFavorite(_) => "Removed from favorites",
        DestructiveAction::RemoveImportant(_) => "Removed from important",
        DestructiveAction::Clear(Collection::Texts) => "All texts cleared",
        DestructiveAction::Clear(Collection::Favorites) => "All favorites cleared",
        DestructiveAction::Clear(Collection::Important) => "All important texts cleared",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::testing::RecordingUi;
    use crate::storage::{JsonFilePersistence, MemoryPersistence, StorageError};
    use tempfile::TempDir;

    type TestStore = Store<MemoryPersistence, RecordingUi>;

    fn open(ui: RecordingUi) -> TestStore {
        Store::open(MemoryPersistence::new(), ui, StoreSettings::default())
    }

    fn added(outcome: Outcome) -> EntryId {
        match outcome {
            Outcome::Added { id, .. } => id,
            other => panic!("expected Added, got {other:?}"),
        }
    }

    /// Reopen with the same persistence and a fresh surface
    fn reopen(store: TestStore) -> TestStore {
        let (persistence, _) = store.into_parts();
        Store::open(persistence, RecordingUi::accepting(), StoreSettings::default())
    }

    #[test]
    fn test_open_empty_renders_all_views() {
        let store = open(RecordingUi::accepting());
        assert_eq!(store.counts(), Counts::default());
        assert_eq!(store.ui().renders.len(), 3);
        assert!(!store.is_degraded());
    }

    #[test]
    fn test_add_primary_trims_prepends_and_persists() {
        let mut store = open(RecordingUi::accepting());

        let first = added(store.add_primary("  first  "));
        let second = added(store.add_primary("Remember to confirm venue"));

        assert_eq!(store.texts()[0].id, second);
        assert_eq!(store.texts()[1].id, first);
        assert_eq!(store.texts()[1].content, "first");
        assert!(store.texts().iter().all(|e| e.original_id.is_none()));
        assert_eq!(store.ui().input_clears, 2);
        assert_eq!(store.ui().last_notice(), Some("Text recorded"));

        let saved = store.persistence().load(Collection::Texts).unwrap();
        assert_eq!(saved, store.texts());
    }

    #[test]
    fn test_add_primary_rejects_blank() {
        let mut store = open(RecordingUi::accepting());
        let outcome = store.add_primary(" \n\t ");
        assert_eq!(outcome, Outcome::Rejected(Rejection::EmptyContent));
        assert!(store.texts().is_empty());
        assert!(store.persistence().raw(Collection::Texts).is_none());
        assert_eq!(store.ui().input_clears, 0);
        assert_eq!(store.ui().last_notice(), Some("Please enter some text to record"));
    }

    #[test]
    fn test_rapid_adds_get_distinct_ids() {
        let mut store = open(RecordingUi::accepting());
        let mut ids: Vec<_> = (0..50)
            .map(|i| added(store.add_primary(&format!("note {i}"))))
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_delete_primary_declined_changes_nothing() {
        let mut store = open(RecordingUi::declining());
        let id = added(store.add_primary("keep me"));

        assert_eq!(store.delete_primary(id), Outcome::Declined);
        assert_eq!(store.texts().len(), 1);
        assert_eq!(store.ui().prompts, vec!["Delete this text?".to_string()]);
        assert_eq!(store.pending_confirmations(), 0);
    }

    #[test]
    fn test_delete_primary_does_not_cascade() {
        let mut store = open(RecordingUi::accepting());
        let id = added(store.add_primary("call vendor"));
        let fav = added(store.add_to_favorites(id));
        added(store.add_to_important(id));

        let outcome = store.delete_primary(id);
        assert_eq!(
            outcome,
            Outcome::Removed {
                collection: Collection::Texts,
                id
            }
        );
        assert!(store.get(Collection::Texts, id).is_none());

        let favorite = store.get(Collection::Favorites, fav).unwrap();
        assert_eq!(favorite.original_id, Some(id));
        assert_eq!(favorite.content, "call vendor");
        assert!(store.is_important(id));
        assert_eq!(store.important()[0].content, "call vendor");
    }

    #[test]
    fn test_delete_missing_is_silent() {
        let mut store = open(RecordingUi::accepting());
        store.ui_mut().clear_records();

        assert_eq!(store.delete_primary(EntryId::new(42)), Outcome::NotFound);
        assert!(store.ui().prompts.is_empty());
        assert!(store.ui().notices.is_empty());
    }

    #[test]
    fn test_clear_empty_collections_skip_prompt() {
        let mut store = open(RecordingUi::accepting());

        assert_eq!(
            store.clear_primary(),
            Outcome::Rejected(Rejection::NothingToClear(Collection::Texts))
        );
        assert_eq!(store.ui().last_notice(), Some("No texts to clear"));
        assert_eq!(
            store.clear_favorites(),
            Outcome::Rejected(Rejection::NothingToClear(Collection::Favorites))
        );
        assert_eq!(
            store.clear_important(),
            Outcome::Rejected(Rejection::NothingToClear(Collection::Important))
        );
        assert_eq!(store.ui().last_notice(), Some("No important texts to clear"));
        assert!(store.ui().prompts.is_empty());
    }

    #[test]
    fn test_clear_primary_with_confirmation() {
        let mut store = open(RecordingUi::accepting());
        let id = added(store.add_primary("a"));
        store.add_primary("b");
        store.add_to_favorites(id);

        assert_eq!(
            store.clear_primary(),
            Outcome::Cleared {
                collection: Collection::Texts,
                count: 2
            }
        );
        assert!(store.texts().is_empty());
        assert_eq!(store.favorites().len(), 1);
        assert!(store
            .persistence()
            .load(Collection::Texts)
            .unwrap()
            .is_empty());
        assert_eq!(store.ui().last_notice(), Some("All texts cleared"));
    }

    #[test]
    fn test_clear_declined_keeps_collection() {
        let mut store = open(RecordingUi::accepting());
        let id = added(store.add_primary("a"));
        store.add_to_important(id);
        store.ui_mut().answers.push_back(false);

        assert_eq!(store.clear_important(), Outcome::Declined);
        assert!(store.is_important(id));
    }

    #[test]
    fn test_add_to_favorites_rejects_duplicates() {
        let mut store = open(RecordingUi::accepting());
        let id = added(store.add_primary("call vendor"));

        let fav = added(store.add_to_favorites(id));
        let before = store.favorites().to_vec();
        let persisted_before = store.persistence().raw(Collection::Favorites).map(<[u8]>::to_vec);

        assert_eq!(
            store.add_to_favorites(id),
            Outcome::Rejected(Rejection::AlreadyFavorited)
        );
        assert_eq!(store.favorites(), before.as_slice());
        assert_eq!(
            store.persistence().raw(Collection::Favorites).map(<[u8]>::to_vec),
            persisted_before
        );
        assert_eq!(store.ui().last_notice(), Some("This text is already in favorites"));
        assert_eq!(store.favorites()[0].id, fav);
        assert_eq!(store.favorites()[0].original_id, Some(id));
    }

    #[test]
    fn test_add_to_favorites_missing_text() {
        let mut store = open(RecordingUi::accepting());
        assert_eq!(store.add_to_favorites(EntryId::new(9)), Outcome::NotFound);
        assert!(store.favorites().is_empty());
    }

    #[test]
    fn test_remove_from_favorites_keeps_important() {
        let mut store = open(RecordingUi::accepting());
        let id = added(store.add_primary("a"));
        let fav = added(store.add_to_favorites(id));
        added(store.add_favorite_to_important(fav));

        assert_eq!(
            store.remove_from_favorites(fav),
            Outcome::Removed {
                collection: Collection::Favorites,
                id: fav
            }
        );
        assert!(store.favorites().is_empty());
        assert!(store.is_important(id));
        assert_eq!(
            store.ui().prompts.last().map(String::as_str),
            Some("Remove this text from favorites?")
        );
    }

    #[test]
    fn test_add_to_important_rejects_duplicates() {
        let mut store = open(RecordingUi::accepting());
        let id = added(store.add_primary("a"));

        added(store.add_to_important(id));
        assert_eq!(
            store.add_to_important(id),
            Outcome::Rejected(Rejection::AlreadyImportant)
        );
        assert_eq!(store.important().len(), 1);
    }

    #[test]
    fn test_add_to_important_renders_marker_on_texts() {
        let mut store = open(RecordingUi::accepting());
        let id = added(store.add_primary("a"));
        store.ui_mut().clear_records();

        added(store.add_to_important(id));

        let (_, ids, marks) = store
            .ui()
            .renders
            .iter()
            .rev()
            .find(|(c, ..)| *c == Collection::Texts)
            .unwrap();
        assert_eq!(ids, &vec![id]);
        assert_eq!(marks, &vec![true]);
        assert_eq!(store.ui().rendered(Collection::Important), 1);
    }

    #[test]
    fn test_favorite_to_important_points_at_primary() {
        let mut store = open(RecordingUi::accepting());
        let id = added(store.add_primary("call vendor"));
        let fav = added(store.add_to_favorites(id));

        added(store.add_favorite_to_important(fav));

        let important = &store.important()[0];
        assert_eq!(important.original_id, Some(id));
        assert_ne!(important.original_id, Some(fav));
        assert_eq!(important.content, "call vendor");
        assert!(store.is_important(id));
        assert!(store.ui().rendered(Collection::Favorites) >= 2);

        // Same origin reached from the texts view is a duplicate
        assert_eq!(
            store.add_to_important(id),
            Outcome::Rejected(Rejection::AlreadyImportant)
        );
    }

    #[test]
    fn test_favorite_to_important_copies_favorite_content() {
        let mut store = open(RecordingUi::accepting());
        let id = added(store.add_primary("original"));
        let fav = added(store.add_to_favorites(id));

        // Favorite outlives its text
        store.delete_primary(id);
        added(store.add_favorite_to_important(fav));

        assert_eq!(store.important()[0].content, "original");
        assert_eq!(store.important()[0].original_id, Some(id));
    }

    #[test]
    fn test_toggle_important_twice_restores_membership() {
        let mut store = open(RecordingUi::accepting());
        let id = added(store.add_primary("a"));

        assert!(!store.is_important(id));
        added(store.toggle_important(id));
        assert!(store.is_important(id));
        assert_eq!(store.toggle_important(id), Outcome::Unmarked(id));
        assert!(!store.is_important(id));
        assert!(store.important().is_empty());
        assert!(store.ui().prompts.is_empty());
        assert_eq!(store.ui().last_notice(), Some("Important mark removed"));
    }

    #[test]
    fn test_toggle_from_favorite_matches_toggle_from_text() {
        let mut store = open(RecordingUi::accepting());
        let id = added(store.add_primary("a"));
        let fav = added(store.add_to_favorites(id));

        added(store.toggle_favorite_important(fav));
        assert!(store.is_important(id));

        // Either view can turn it off again
        assert_eq!(store.toggle_important(id), Outcome::Unmarked(id));
        assert!(!store.is_important(id));

        added(store.toggle_important(id));
        assert_eq!(store.toggle_favorite_important(fav), Outcome::Unmarked(id));
        assert!(!store.is_important(id));
    }

    #[test]
    fn test_toggle_favorite_missing() {
        let mut store = open(RecordingUi::accepting());
        assert_eq!(
            store.toggle_favorite_important(EntryId::new(5)),
            Outcome::NotFound
        );
    }

    #[test]
    fn test_remove_from_important_requires_confirmation() {
        let mut store = open(RecordingUi::declining());
        let id = added(store.add_primary("a"));
        let imp = added(store.add_to_important(id));

        assert_eq!(store.remove_from_important(imp), Outcome::Declined);
        assert!(store.is_important(id));

        store.ui_mut().answers.push_back(true);
        assert_eq!(
            store.remove_from_important(imp),
            Outcome::Removed {
                collection: Collection::Important,
                id: imp
            }
        );
        assert!(!store.is_important(id));
    }

    #[test]
    fn test_reopen_restores_collections() {
        let mut store = open(RecordingUi::accepting());
        let id = added(store.add_primary("call vendor"));
        let fav = added(store.add_to_favorites(id));
        added(store.add_favorite_to_important(fav));
        let texts = store.texts().to_vec();
        let favorites = store.favorites().to_vec();
        let important = store.important().to_vec();

        let mut store = reopen(store);
        assert_eq!(store.texts(), texts.as_slice());
        assert_eq!(store.favorites(), favorites.as_slice());
        assert_eq!(store.important(), important.as_slice());
        assert!(store.is_important(id));

        // Ids keep increasing past what was loaded
        let next = added(store.add_primary("later"));
        assert!(next > fav);
        assert!(next > important[0].id);
    }

    #[test]
    fn test_corrupt_slot_opens_empty() {
        let mut persistence = MemoryPersistence::new();
        persistence.insert_raw(Collection::Favorites, "{ nope");

        let store = Store::open(persistence, RecordingUi::accepting(), StoreSettings::default());
        assert!(store.favorites().is_empty());
        assert_eq!(
            store.ui().notices,
            vec!["Could not read saved favorites; starting empty".to_string()]
        );
    }

    #[test]
    fn test_save_failure_keeps_memory_and_degrades() {
        let persistence = MemoryPersistence::with_quota(400);
        let mut store = Store::open(persistence, RecordingUi::accepting(), StoreSettings::default());

        added(store.add_primary("short"));
        assert!(!store.is_degraded());

        let long = "x".repeat(600);
        let id = added(store.add_primary(&long));
        assert!(store.is_degraded());
        assert_eq!(store.texts()[0].id, id);
        assert!(store
            .ui()
            .notices
            .iter()
            .any(|n| n.starts_with("Could not save texts")));
        assert_eq!(store.persistence().load(Collection::Texts).unwrap().len(), 1);
    }

    #[test]
    fn test_successful_save_clears_degraded() {
        let persistence = MemoryPersistence::with_quota(10);
        let mut store = Store::open(persistence, RecordingUi::accepting(), StoreSettings::default());
        let id = added(store.add_primary("too big for the slot"));
        assert!(store.is_degraded());

        store.persistence.set_quota(None);
        store.add_to_favorites(id);
        assert!(!store.is_degraded());
    }

    #[test]
    fn test_two_phase_decline_is_inert() {
        let mut store = open(RecordingUi::accepting());
        let id = added(store.add_primary("a"));
        let saved = store.persistence().raw(Collection::Texts).map(<[u8]>::to_vec);

        let request = store
            .request_confirmation(DestructiveAction::DeletePrimary(id))
            .unwrap();
        assert_eq!(request.prompt, "Delete this text?");
        assert_eq!(store.texts().len(), 1);

        assert_eq!(store.resolve_confirmation(request.token, false), Outcome::Declined);
        assert_eq!(store.texts().len(), 1);
        assert_eq!(store.persistence().raw(Collection::Texts).map(<[u8]>::to_vec), saved);

        // Tokens resolve once
        assert_eq!(store.resolve_confirmation(request.token, true), Outcome::NotFound);
        assert_eq!(store.texts().len(), 1);
        assert!(store.ui().prompts.is_empty());
    }

    #[test]
    fn test_two_phase_accept_applies() {
        let mut store = open(RecordingUi::accepting());
        store.add_primary("a");

        let request = store
            .request_confirmation(DestructiveAction::Clear(Collection::Texts))
            .unwrap();
        assert_eq!(
            store.resolve_confirmation(request.token, true),
            Outcome::Cleared {
                collection: Collection::Texts,
                count: 1
            }
        );
        assert!(store.texts().is_empty());
    }

    #[test]
    fn test_two_phase_rechecks_target() {
        let mut store = open(RecordingUi::accepting());
        let text = added(store.add_primary("a"));
        let important = added(store.add_to_important(text));

        let request = store
            .request_confirmation(DestructiveAction::RemoveImportant(important))
            .unwrap();
        // Unmarking needs no confirmation, so the token stays pending
        store.toggle_important(text);
        assert_eq!(store.pending_confirmations(), 1);

        assert_eq!(store.resolve_confirmation(request.token, true), Outcome::NotFound);
        assert_eq!(store.pending_confirmations(), 0);
    }

    #[test]
    fn test_new_request_abandons_unresolved_one() {
        let mut store = open(RecordingUi::accepting());
        let id = added(store.add_primary("a"));

        let stale = store
            .request_confirmation(DestructiveAction::DeletePrimary(id))
            .unwrap();
        let fresh = store
            .request_confirmation(DestructiveAction::Clear(Collection::Texts))
            .unwrap();
        assert_eq!(store.pending_confirmations(), 1);

        assert_eq!(store.resolve_confirmation(stale.token, true), Outcome::NotFound);
        assert_eq!(store.texts().len(), 1);
        assert_eq!(
            store.resolve_confirmation(fresh.token, true),
            Outcome::Cleared {
                collection: Collection::Texts,
                count: 1
            }
        );
        assert_eq!(store.pending_confirmations(), 0);
    }

    #[test]
    fn test_unrenderable_timestamp_format_does_not_panic() {
        let settings = StoreSettings {
            timestamp_format: "%Q".to_string(),
        };
        let mut store = Store::open(MemoryPersistence::new(), RecordingUi::accepting(), settings);

        let text = added(store.add_primary("hello"));
        added(store.add_to_favorites(text));
        added(store.add_to_important(text));

        let expected = crate::models::format_display_timestamp(
            store.texts()[0].created_at,
            DEFAULT_TIMESTAMP_FORMAT,
        );
        assert_eq!(store.texts()[0].display_timestamp, expected);
        assert_eq!(store.counts().favorites, 1);
        assert_eq!(store.counts().important, 1);
    }

    #[test]
    fn test_two_phase_request_on_empty_is_rejected() {
        let mut store = open(RecordingUi::accepting());
        let err = store
            .request_confirmation(DestructiveAction::Clear(Collection::Favorites))
            .unwrap_err();
        assert_eq!(
            err,
            Outcome::Rejected(Rejection::NothingToClear(Collection::Favorites))
        );
        assert_eq!(store.pending_confirmations(), 0);
    }

    #[test]
    fn test_export_empty_produces_no_file() {
        let mut store = open(RecordingUi::accepting());
        assert_eq!(
            store.export_primary(),
            Outcome::Rejected(Rejection::NothingToExport)
        );
        assert!(store.ui().files.is_empty());
        assert_eq!(store.ui().last_notice(), Some("No texts to export"));
    }

    #[test]
    fn test_export_renders_newest_first() {
        let mut store = open(RecordingUi::accepting());
        store.add_primary("older");
        store.add_primary("newer");

        let outcome = store.export_primary();
        let Outcome::Exported { file_name } = outcome else {
            panic!("expected export");
        };
        assert!(file_name.starts_with("texts_"));
        assert!(file_name.ends_with(".txt"));

        let (name, content) = &store.ui().files[0];
        assert_eq!(name, &file_name);
        let blocks: Vec<_> = content.split("\n\n").collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].ends_with("] newer"));
        assert!(blocks[1].ends_with("] older"));
        assert_eq!(store.texts().len(), 2);
    }

    #[test]
    fn test_export_sink_failure_is_notified() {
        let mut ui = RecordingUi::accepting();
        ui.fail_files = true;
        let mut store = open(ui);
        store.add_primary("a");

        assert!(matches!(store.export_primary(), Outcome::Failed(_)));
        assert_eq!(store.ui().last_notice(), Some("Export failed: disk unavailable"));
    }

    #[test]
    fn test_copy_entry() {
        let mut store = open(RecordingUi::accepting());
        let id = added(store.add_primary("copy me"));
        let fav = added(store.add_to_favorites(id));

        assert_eq!(store.copy_entry(Collection::Favorites, fav), Outcome::Copied(fav));
        assert_eq!(store.ui().clipboard, vec!["copy me".to_string()]);
        assert_eq!(store.ui().last_notice(), Some("Copied: copy me"));

        assert_eq!(store.copy_entry(Collection::Important, fav), Outcome::NotFound);
    }

    #[test]
    fn test_store_over_json_files() {
        let temp_dir = TempDir::new().unwrap();
        let settings = StoreSettings {
            timestamp_format: "%Y".to_string(),
        };

        let id = {
            let mut store = Store::open(
                JsonFilePersistence::new(temp_dir.path()),
                RecordingUi::accepting(),
                settings.clone(),
            );
            let id = added(store.add_primary("on disk"));
            store.add_to_favorites(id);
            id
        };

        let store = Store::open(
            JsonFilePersistence::new(temp_dir.path()),
            RecordingUi::accepting(),
            settings,
        );
        assert_eq!(store.texts()[0].id, id);
        assert_eq!(store.texts()[0].display_timestamp.len(), 4);
        assert_eq!(store.favorites()[0].original_id, Some(id));
        assert!(temp_dir.path().join("favorites.json").exists());
        assert!(!temp_dir.path().join("important.json").exists());
    }

    #[test]
    fn test_rejection_messages() {
        assert_eq!(
            Rejection::NothingToClear(Collection::Favorites).to_string(),
            "No favorites to clear"
        );
        assert_eq!(Rejection::AlreadyImportant.to_string(), "This text is already marked important");
    }

    #[test]
    fn test_outcome_changed() {
        assert!(Outcome::Unmarked(EntryId::new(1)).changed());
        assert!(!Outcome::Declined.changed());
        assert!(!Outcome::Rejected(Rejection::EmptyContent).changed());
    }

    #[test]
    fn test_storage_error_message_includes_hint() {
        let err = StorageError::QuotaExceeded {
            key: "texts".into(),
            size: 2,
            limit: 1,
        };
        assert!(err.recovery_suggestion().is_some());
    }
}
