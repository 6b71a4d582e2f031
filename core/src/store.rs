//! Session-local copy of the remote item collection.
//!
//! # Design
//! The store mutates `items` only after the remote call succeeds, so a
//! failure never leaves a partial change behind. Every operation returns a
//! `Result` carrying the current collection or the error; the same error is
//! also kept as a human-readable `error_message` for presentation.
//!
//! Only `load` drives `is_loading`. `add` and `remove` leave it alone.
//!
//! Operations take `&mut self`, one at a time. The store is not safe for
//! concurrent invocation without external synchronization and does no
//! locking of its own.

use tracing::{info, warn};

use crate::error::ApiError;
use crate::remote::ItemRemote;
use crate::types::{Item, ItemDraft, ItemId};

pub struct ItemStore<R> {
    remote: R,
    items: Vec<Item>,
    is_loading: bool,
    error_message: Option<String>,
}

impl<R: ItemRemote> ItemStore<R> {
    pub fn new(remote: R) -> Self {
        Self {
            remote,
            items: Vec::new(),
            is_loading: false,
            error_message: None,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Dismiss the current error without touching the collection.
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Replace the collection wholesale with the remote list.
    ///
    /// `is_loading` is set for the duration of the call and reset on every
    /// exit path.
    pub fn load(&mut self) -> Result<&[Item], ApiError> {
        self.is_loading = true;
        self.error_message = None;
        let result = self.remote.list();
        self.is_loading = false;

        match result {
            Ok(items) => {
                info!(count = items.len(), "loaded items");
                self.items = items;
                Ok(&self.items)
            }
            Err(err) => Err(self.record(err)),
        }
    }

    /// Create an item remotely and append the server's copy.
    pub fn add(&mut self, name: &str, description: Option<&str>) -> Result<&[Item], ApiError> {
        let draft = ItemDraft::new(name, description.map(str::to_string));
        match self.remote.create(&draft) {
            Ok(item) => {
                self.items.push(item);
                Ok(&self.items)
            }
            Err(err) => Err(self.record(err)),
        }
    }

    /// Delete `item` remotely, then drop it locally. Only the id is used.
    pub fn remove(&mut self, item: &Item) -> Result<&[Item], ApiError> {
        self.remove_by_id(item.id)
    }

    pub fn remove_by_id(&mut self, id: ItemId) -> Result<&[Item], ApiError> {
        match self.remote.delete(id) {
            Ok(()) => {
                if let Some(pos) = self.items.iter().position(|item| item.id == id) {
                    self.items.remove(pos);
                }
                Ok(&self.items)
            }
            Err(err) => Err(self.record(err)),
        }
    }

    /// Remove each target in order, waiting for one delete before starting
    /// the next. A failure does not stop the batch; the collection ends up
    /// without exactly the items whose delete succeeded.
    ///
    /// Returns the last failure, if any.
    pub fn remove_all(&mut self, targets: &[Item]) -> Result<&[Item], ApiError> {
        let ids: Vec<ItemId> = targets.iter().map(|item| item.id).collect();
        let mut last_err = None;
        for id in ids {
            if let Err(err) = self.remove_by_id(id) {
                last_err = Some(err);
            }
        }
        match last_err {
            Some(err) => Err(err),
            None => Ok(&self.items),
        }
    }

    fn record(&mut self, err: ApiError) -> ApiError {
        warn!(error = %err, "item operation failed");
        self.error_message = Some(err.to_string());
        err
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;

    fn item(id: ItemId, name: &str) -> Item {
        Item {
            id,
            name: name.to_string(),
            description: None,
        }
    }

    fn http_error(status: u16) -> ApiError {
        ApiError::HttpError {
            status,
            body: "failed".to_string(),
        }
    }

    /// Remote that answers each call kind from its own queue, in order.
    #[derive(Default)]
    struct ScriptedRemote {
        lists: RefCell<VecDeque<Result<Vec<Item>, ApiError>>>,
        creates: RefCell<VecDeque<Result<Item, ApiError>>>,
        deletes: RefCell<VecDeque<Result<(), ApiError>>>,
        deleted: RefCell<Vec<ItemId>>,
        drafts: RefCell<Vec<ItemDraft>>,
    }

    impl ScriptedRemote {
        fn list_returns(self, result: Result<Vec<Item>, ApiError>) -> Self {
            self.lists.borrow_mut().push_back(result);
            self
        }

        fn create_returns(self, result: Result<Item, ApiError>) -> Self {
            self.creates.borrow_mut().push_back(result);
            self
        }

        fn delete_returns(self, result: Result<(), ApiError>) -> Self {
            self.deletes.borrow_mut().push_back(result);
            self
        }
    }

    impl ItemRemote for ScriptedRemote {
        fn list(&self) -> Result<Vec<Item>, ApiError> {
            self.lists.borrow_mut().pop_front().expect("unexpected list call")
        }

        fn get(&self, _id: ItemId) -> Result<Item, ApiError> {
            panic!("unexpected get call")
        }

        fn create(&self, draft: &ItemDraft) -> Result<Item, ApiError> {
            self.drafts.borrow_mut().push(draft.clone());
            self.creates.borrow_mut().pop_front().expect("unexpected create call")
        }

        fn delete(&self, id: ItemId) -> Result<(), ApiError> {
            self.deleted.borrow_mut().push(id);
            self.deletes.borrow_mut().pop_front().expect("unexpected delete call")
        }
    }

    fn loaded_store(remote: ScriptedRemote, items: Vec<Item>) -> ItemStore<ScriptedRemote> {
        let mut store = ItemStore::new(remote.list_returns(Ok(items)));
        store.load().unwrap();
        store
    }

    #[test]
    fn new_store_is_empty() {
        let store = ItemStore::new(ScriptedRemote::default());
        assert!(store.items().is_empty());
        assert!(!store.is_loading());
        assert!(store.error_message().is_none());
    }

    #[test]
    fn load_replaces_wholesale() {
        let remote = ScriptedRemote::default()
            .list_returns(Ok(vec![item(1, "A"), item(2, "B")]))
            .list_returns(Ok(vec![item(3, "C")]));
        let mut store = ItemStore::new(remote);

        store.load().unwrap();
        let items = store.load().unwrap();
        assert_eq!(items, &[item(3, "C")]);
    }

    #[test]
    fn loading_flag_clears_on_success() {
        let mut store = ItemStore::new(ScriptedRemote::default().list_returns(Ok(vec![])));
        store.load().unwrap();
        assert!(!store.is_loading());
    }

    #[test]
    fn loading_flag_clears_on_failure() {
        let remote = ScriptedRemote::default()
            .list_returns(Err(ApiError::TransportError("offline".to_string())));
        let mut store = ItemStore::new(remote);
        let err = store.load().unwrap_err();
        assert!(matches!(err, ApiError::TransportError(_)));
        assert!(!store.is_loading());
    }

    #[test]
    fn failed_load_keeps_previous_items() {
        let remote = ScriptedRemote::default()
            .list_returns(Ok(vec![item(1, "A")]))
            .list_returns(Err(ApiError::DecodeError("bad body".to_string())));
        let mut store = ItemStore::new(remote);
        store.load().unwrap();

        assert!(store.load().is_err());
        assert_eq!(store.items(), &[item(1, "A")]);
        assert_eq!(store.error_message(), Some("decoding failed: bad body"));
    }

    #[test]
    fn load_clears_previous_error() {
        let remote = ScriptedRemote::default()
            .list_returns(Err(http_error(503)))
            .list_returns(Ok(vec![item(1, "A")]));
        let mut store = ItemStore::new(remote);
        assert!(store.load().is_err());
        assert!(store.error_message().is_some());

        store.load().unwrap();
        assert!(store.error_message().is_none());
    }

    #[test]
    fn failed_create_is_noop_on_state() {
        let remote = ScriptedRemote::default().create_returns(Err(http_error(500)));
        let mut store = loaded_store(remote, vec![item(1, "A")]);

        let err = store.add("X", None).unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(store.items(), &[item(1, "A")]);
        assert!(!store.error_message().unwrap_or_default().is_empty());
    }

    #[test]
    fn successful_create_appends_exactly_one() {
        let remote = ScriptedRemote::default().create_returns(Ok(item(7, "X")));
        let mut store = loaded_store(remote, vec![item(1, "A"), item(2, "B")]);

        let items = store.add("X", None).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items.last(), Some(&item(7, "X")));
        assert!(!store.is_loading());
    }

    #[test]
    fn add_sends_name_and_description() {
        let remote = ScriptedRemote::default().create_returns(Ok(Item {
            id: 4,
            name: "Cable".to_string(),
            description: Some("XLR".to_string()),
        }));
        let mut store = ItemStore::new(remote);
        store.add("Cable", Some("XLR")).unwrap();

        let drafts = store.remote().drafts.borrow();
        assert_eq!(drafts[0], ItemDraft::new("Cable", Some("XLR".to_string())));
    }

    #[test]
    fn add_does_not_clear_previous_error() {
        let remote = ScriptedRemote::default()
            .list_returns(Err(http_error(500)))
            .create_returns(Ok(item(1, "A")));
        let mut store = ItemStore::new(remote);
        assert!(store.load().is_err());

        store.add("A", None).unwrap();
        assert!(store.error_message().is_some());
    }

    #[test]
    fn remove_by_id_is_precise() {
        let remote = ScriptedRemote::default().delete_returns(Ok(()));
        let mut store = loaded_store(remote, vec![item(1, "A"), item(2, "B"), item(3, "C")]);

        let items = store.remove(&item(2, "B")).unwrap();
        assert_eq!(items, &[item(1, "A"), item(3, "C")]);
        assert_eq!(*store.remote().deleted.borrow(), vec![2]);
    }

    #[test]
    fn failed_remove_keeps_items() {
        let remote = ScriptedRemote::default().delete_returns(Err(http_error(404)));
        let mut store = loaded_store(remote, vec![item(1, "A")]);

        let err = store.remove(&item(1, "A")).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.items(), &[item(1, "A")]);
        assert!(store.error_message().is_some());
    }

    #[test]
    fn batch_delete_partial_failure() {
        let remote = ScriptedRemote::default()
            .delete_returns(Ok(()))
            .delete_returns(Err(http_error(500)));
        let mut store = loaded_store(remote, vec![item(1, "A"), item(2, "B"), item(3, "C")]);

        let targets = vec![item(1, "A"), item(2, "B")];
        assert!(store.remove_all(&targets).is_err());

        assert_eq!(store.items(), &[item(2, "B"), item(3, "C")]);
        assert!(store.error_message().is_some());
        assert_eq!(*store.remote().deleted.borrow(), vec![1, 2]);
    }

    #[test]
    fn batch_delete_continues_after_failure() {
        let remote = ScriptedRemote::default()
            .delete_returns(Err(http_error(500)))
            .delete_returns(Ok(()));
        let mut store = loaded_store(remote, vec![item(1, "A"), item(2, "B")]);

        let targets = store.items().to_vec();
        assert!(store.remove_all(&targets).is_err());
        assert_eq!(store.items(), &[item(1, "A")]);
    }

    #[test]
    fn batch_delete_of_everything() {
        let remote = ScriptedRemote::default()
            .delete_returns(Ok(()))
            .delete_returns(Ok(()));
        let mut store = loaded_store(remote, vec![item(1, "A"), item(2, "B")]);

        let targets = store.items().to_vec();
        assert!(store.remove_all(&targets).unwrap().is_empty());
        assert!(store.error_message().is_none());
    }

    #[test]
    fn clear_error_dismisses_message() {
        let remote = ScriptedRemote::default().create_returns(Err(http_error(422)));
        let mut store = ItemStore::new(remote);
        assert!(store.add("X", None).is_err());

        store.clear_error();
        assert!(store.error_message().is_none());
    }

    #[test]
    fn get_finds_loaded_item() {
        let store = loaded_store(ScriptedRemote::default(), vec![item(5, "E")]);
        assert_eq!(store.get(5), Some(&item(5, "E")));
        assert!(store.get(6).is_none());
    }
}
