//! Edit-session state machine for a profile's badge list.
//!
//! A session holds a working copy of one profile's records plus the last
//! saved snapshot, and derives its state by comparing the two. Saves go
//! through [`BadgeStore::save`]; while one is in flight the session is
//! `Saving` and a host must not start another for the same profile.

use insignia_core::{BadgeRecord, InsigniaResult, ProfileId};
use insignia_storage::BadgeStore;

/// Where an edit session sits relative to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    /// Working copy matches the last saved snapshot.
    Clean,
    /// Working copy has unsaved changes.
    Dirty,
    /// A save is in flight.
    Saving,
}

/// A mutable working copy of one profile's badge records.
#[derive(Debug, Clone)]
pub struct EditSession {
    profile: ProfileId,
    records: Vec<BadgeRecord>,
    saved: Vec<BadgeRecord>,
    state: EditState,
}

impl EditSession {
    /// Open a session on the profile's current records.
    ///
    /// Unlike display paths this surfaces store failures; an editor opened
    /// on stale or guessed data would silently overwrite whatever is
    /// actually persisted on the next save.
    pub async fn open(store: &BadgeStore, profile: &str) -> InsigniaResult<Self> {
        let records = store.fetch(profile).await?;
        Ok(Self::from_records(profile, records))
    }

    /// Build a session from records already in hand.
    pub fn from_records(profile: impl Into<ProfileId>, records: Vec<BadgeRecord>) -> Self {
        Self {
            profile: profile.into(),
            saved: records.clone(),
            records,
            state: EditState::Clean,
        }
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn records(&self) -> &[BadgeRecord] {
        &self.records
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == EditState::Dirty
    }

    /// Append a blank record, returning its index.
    pub fn add_record(&mut self) -> usize {
        self.records.push(BadgeRecord::default());
        self.refresh_state();
        self.records.len() - 1
    }

    /// Remove the record at `index`, if it exists.
    pub fn remove_record(&mut self, index: usize) -> Option<BadgeRecord> {
        if index >= self.records.len() {
            return None;
        }
        let removed = self.records.remove(index);
        self.refresh_state();
        Some(removed)
    }

    /// Set a record's name. Returns false when `index` is out of range.
    pub fn set_name(&mut self, index: usize, name: impl Into<String>) -> bool {
        let Some(record) = self.records.get_mut(index) else {
            return false;
        };
        record.name = name.into();
        self.refresh_state();
        true
    }

    /// Set a record's emoji glyph. Returns false when `index` is out of range.
    pub fn set_emoji(&mut self, index: usize, emoji: impl Into<String>) -> bool {
        let Some(record) = self.records.get_mut(index) else {
            return false;
        };
        record.emoji = emoji.into();
        self.refresh_state();
        true
    }

    /// Set a record's image URL. Returns false when `index` is out of range.
    pub fn set_image_url(&mut self, index: usize, url: impl Into<String>) -> bool {
        let Some(record) = self.records.get_mut(index) else {
            return false;
        };
        record.image_url = url.into();
        self.refresh_state();
        true
    }

    /// Discard unsaved edits, restoring the last saved snapshot.
    pub fn revert(&mut self) {
        self.records = self.saved.clone();
        self.state = EditState::Clean;
    }

    /// Persist the working copy through the store.
    ///
    /// On success the working copy becomes the saved snapshot and the
    /// session is `Clean`. On failure the edits stay in the working copy
    /// so nothing typed is lost, and the error is surfaced.
    pub async fn save(&mut self, store: &BadgeStore) -> InsigniaResult<()> {
        self.state = EditState::Saving;
        match store.save(&self.profile, self.records.clone()).await {
            Ok(()) => {
                self.saved = self.records.clone();
                self.state = EditState::Clean;
                Ok(())
            }
            Err(err) => {
                self.refresh_state();
                Err(err)
            }
        }
    }

    // Editing while a save is in flight leaves the session Dirty even if
    // that save later succeeds; the next save picks the edits up.
    fn refresh_state(&mut self) {
        self.state = if self.records == self.saved {
            EditState::Clean
        } else {
            EditState::Dirty
        };
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use insignia_core::{InsigniaConfig, StoreError};
    use insignia_storage::{KeyValueStore, MemoryStore, StoreKey};
    use std::sync::Arc;

    fn make_store() -> BadgeStore {
        let kv = Arc::new(MemoryStore::new());
        BadgeStore::new(kv, &InsigniaConfig::default())
    }

    fn gaming() -> BadgeRecord {
        BadgeRecord::new("Gaming", "🎮", "")
    }

    #[tokio::test]
    async fn test_open_starts_clean() {
        let store = make_store();
        store.save("42", vec![gaming()]).await.unwrap();

        let session = EditSession::open(&store, "42").await.unwrap();

        assert_eq!(session.state(), EditState::Clean);
        assert_eq!(session.records(), &[gaming()]);
    }

    #[tokio::test]
    async fn test_add_record_marks_dirty() {
        let store = make_store();
        let mut session = EditSession::open(&store, "42").await.unwrap();

        let index = session.add_record();

        assert_eq!(index, 0);
        assert_eq!(session.state(), EditState::Dirty);
        assert_eq!(session.records().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_record_returns_it() {
        let mut session = EditSession::from_records("42", vec![gaming()]);

        let removed = session.remove_record(0);

        assert_eq!(removed, Some(gaming()));
        assert!(session.records().is_empty());
        assert!(session.is_dirty());
    }

    #[tokio::test]
    async fn test_remove_out_of_range_is_none() {
        let mut session = EditSession::from_records("42", vec![gaming()]);

        assert_eq!(session.remove_record(5), None);
        assert_eq!(session.state(), EditState::Clean);
    }

    #[tokio::test]
    async fn test_field_edits_mark_dirty() {
        let mut session = EditSession::from_records("42", vec![gaming()]);

        assert!(session.set_name(0, "Speedrunning"));

        assert!(session.is_dirty());
        assert_eq!(session.records()[0].name, "Speedrunning");
    }

    #[tokio::test]
    async fn test_edit_out_of_range_is_rejected() {
        let mut session = EditSession::from_records("42", vec![gaming()]);

        assert!(!session.set_name(3, "X"));
        assert!(!session.set_emoji(3, "🎮"));
        assert!(!session.set_image_url(3, "https://a/b.png"));
        assert_eq!(session.state(), EditState::Clean);
    }

    #[tokio::test]
    async fn test_undoing_an_edit_returns_to_clean() {
        let mut session = EditSession::from_records("42", vec![gaming()]);

        session.set_name(0, "Speedrunning");
        assert!(session.is_dirty());

        session.set_name(0, "Gaming");
        assert_eq!(session.state(), EditState::Clean);
    }

    #[tokio::test]
    async fn test_revert_restores_saved_snapshot() {
        let mut session = EditSession::from_records("42", vec![gaming()]);

        session.set_name(0, "Speedrunning");
        session.add_record();
        session.revert();

        assert_eq!(session.state(), EditState::Clean);
        assert_eq!(session.records(), &[gaming()]);
    }

    #[tokio::test]
    async fn test_save_persists_and_goes_clean() {
        let store = make_store();
        let mut session = EditSession::from_records("42", Vec::new());

        session.add_record();
        session.set_name(0, "Gaming");
        session.set_emoji(0, "🎮");
        session.save(&store).await.unwrap();

        assert_eq!(session.state(), EditState::Clean);
        assert_eq!(store.load("42").await, session.records().to_vec());
    }

    #[tokio::test]
    async fn test_saving_an_empty_list_clears_the_profile() {
        let store = make_store();
        store.save("42", vec![gaming()]).await.unwrap();

        let mut session = EditSession::open(&store, "42").await.unwrap();
        session.remove_record(0);
        session.save(&store).await.unwrap();

        assert!(store.load("42").await.is_empty());
        assert_eq!(session.state(), EditState::Clean);
    }

    struct FailingStore;

    #[async_trait]
    impl KeyValueStore for FailingStore {
        async fn get(&self, _key: &StoreKey) -> insignia_core::InsigniaResult<Option<Vec<u8>>> {
            Ok(None)
        }

        async fn set(&self, key: &StoreKey, _value: Vec<u8>) -> insignia_core::InsigniaResult<()> {
            Err(StoreError::WriteFailed {
                key: key.encode(),
                reason: "simulated failure".to_string(),
            }
            .into())
        }

        async fn delete(&self, _key: &StoreKey) -> insignia_core::InsigniaResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_failed_save_keeps_edits_and_dirty_state() {
        let store = BadgeStore::new(Arc::new(FailingStore), &InsigniaConfig::default());
        let mut session = EditSession::from_records("42", Vec::new());

        session.add_record();
        session.set_name(0, "Gaming");
        session.set_emoji(0, "🎮");

        let result = session.save(&store).await;

        assert!(result.is_err());
        assert_eq!(session.state(), EditState::Dirty);
        assert_eq!(session.records()[0].name, "Gaming");
    }

    #[tokio::test]
    async fn test_failed_save_of_unchanged_records_returns_clean() {
        let store = BadgeStore::new(Arc::new(FailingStore), &InsigniaConfig::default());
        let mut session = EditSession::from_records("42", vec![gaming()]);

        // Force a save of records identical to the snapshot; the failure
        // leaves nothing unsaved, so the session settles back to Clean.
        let result = session.save(&store).await;

        assert!(result.is_err());
        assert_eq!(session.state(), EditState::Clean);
    }
}
