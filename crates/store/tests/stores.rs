//! Round-trip tests for the key-value adapters, including the call history
//! document written through them.

use std::sync::Arc;

use assert_matches::assert_matches;
use callpilot_core::call::{CallDraft, CallStatus, ProviderCallOutcome};
use callpilot_core::history::{self, CallHistory, HISTORY_STORAGE_KEY};
use callpilot_core::store::{KeyValueStore, StorageError};
use callpilot_store::{FileStore, MemoryStore};

fn draft() -> CallDraft {
    CallDraft {
        client_name: "Jordan".into(),
        business_name: "Summit Dental".into(),
        phone_number: "+15551231234".into(),
        preferred_date: "2024-12-01".into(),
        appointment_goal: "Schedule a follow-up cleaning for Maria Lopez".into(),
        script: "Hello, this is Jordan.".into(),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[test]
fn memory_store_get_missing_is_none() {
    let store = MemoryStore::new();
    assert_eq!(store.get("anything").unwrap(), None);
}

#[test]
fn memory_store_set_overwrites() {
    let store = MemoryStore::new();
    store.set("k", "one").unwrap();
    store.set("k", "two").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

#[test]
fn file_store_creates_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("nested").join("data");
    let store = FileStore::open(&dir).unwrap();
    assert!(store.dir().is_dir());
}

#[test]
fn file_store_round_trips_values() {
    let tmp = tempfile::tempdir().unwrap();
    let store = FileStore::open(tmp.path()).unwrap();

    assert_eq!(store.get(HISTORY_STORAGE_KEY).unwrap(), None);
    store.set(HISTORY_STORAGE_KEY, "[]").unwrap();
    assert_eq!(store.get(HISTORY_STORAGE_KEY).unwrap().as_deref(), Some("[]"));
    assert!(tmp.path().join("callpilot-history.json").is_file());
}

#[test]
fn file_store_survives_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    FileStore::open(tmp.path()).unwrap().set("k", "v").unwrap();
    let reopened = FileStore::open(tmp.path()).unwrap();
    assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
}

#[test]
fn file_store_rejects_path_like_keys() {
    let tmp = tempfile::tempdir().unwrap();
    let store = FileStore::open(tmp.path()).unwrap();
    assert_matches!(store.set("../escape", "x"), Err(StorageError::InvalidKey(_)));
    assert_matches!(store.get("a/b"), Err(StorageError::InvalidKey(_)));
}

// ---------------------------------------------------------------------------
// History through the adapters
// ---------------------------------------------------------------------------

#[test]
fn history_persists_across_file_store_instances() {
    let tmp = tempfile::tempdir().unwrap();

    let id = {
        let store = Arc::new(FileStore::open(tmp.path()).unwrap());
        let mut calls = CallHistory::open(store);
        let outcome = ProviderCallOutcome {
            status: Some(CallStatus::Queued),
            sid: Some("CA42".into()),
            message: Some("Call queued successfully".into()),
        };
        calls.record(draft(), outcome).unwrap().id
    };

    let store = Arc::new(FileStore::open(tmp.path()).unwrap());
    let calls = CallHistory::open(store);
    assert_eq!(calls.len(), 1);
    let restored = calls.get(id).unwrap();
    assert_eq!(restored.provider_sid.as_deref(), Some("CA42"));
    assert_eq!(restored.to_draft(), draft());
}

#[test]
fn corrupt_history_file_restores_empty() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("callpilot-history.json"), "{{{").unwrap();
    let store = FileStore::open(tmp.path()).unwrap();
    assert!(history::restore(&store).is_empty());
}

#[test]
fn arc_wrapped_store_is_a_store() {
    let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    history::persist(&store, &[]).unwrap();
    assert_eq!(store.get(HISTORY_STORAGE_KEY).unwrap().as_deref(), Some("[]"));
}
