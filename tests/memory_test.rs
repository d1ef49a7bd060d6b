use arcadia::memory::store::USERS_DIR;
use arcadia::memory::{MemoryError, MemoryStore};
use serde_json::{json, Value};
use tempfile::TempDir;

#[test]
fn nested_update_and_get() {
    let tmp = TempDir::new().unwrap();
    let mut store = MemoryStore::open(tmp.path(), "default").unwrap();

    assert!(store.update("a.b.c", json!(5)).unwrap());
    assert_eq!(store.get("a.b.c", Value::Null), json!(5));
    assert_eq!(store.get("a.b.x", json!(7)), json!(7));
    assert_eq!(store.get("a.b", Value::Null), json!({"c": 5}));
}

#[test]
fn document_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    {
        let mut store = MemoryStore::open(tmp.path(), "mirko").unwrap();
        store
            .update("user.preferences.food", json!("pizza"))
            .unwrap();
    }

    let store = MemoryStore::open(tmp.path(), "mirko").unwrap();
    assert_eq!(store.get("user.preferences.food", Value::Null), json!("pizza"));
    assert!(tmp.path().join(USERS_DIR).join("mirko.json").exists());
}

#[test]
fn identities_are_isolated() {
    let tmp = TempDir::new().unwrap();
    let mut alice = MemoryStore::open(tmp.path(), "alice").unwrap();
    alice.update("user.name", json!("Alice")).unwrap();

    let bob = MemoryStore::open(tmp.path(), "bob").unwrap();
    assert_eq!(bob.get("user.name", json!("?")), json!("?"));
}

#[test]
fn clear_then_load_yields_default_document() {
    let tmp = TempDir::new().unwrap();
    let mut store = MemoryStore::open(tmp.path(), "default").unwrap();
    store.update("user.name", json!("Mirko")).unwrap();

    store.clear().unwrap();
    assert!(!store.path().exists());

    store.load();
    assert_eq!(store.get("system.memory_enabled", Value::Null), json!(true));
    assert_eq!(store.get("user.name", Value::Null), Value::Null);
    assert_eq!(store.document()["conversations"]["frequent_topics"], json!([]));
}

#[test]
fn clear_without_file_is_fine() {
    let tmp = TempDir::new().unwrap();
    let mut store = MemoryStore::open(tmp.path(), "nuovo").unwrap();
    store.clear().unwrap();
    assert!(store.is_enabled());
}

#[test]
fn disabled_memory_refuses_writes_and_hides_reads() {
    let tmp = TempDir::new().unwrap();
    let mut store = MemoryStore::open(tmp.path(), "default").unwrap();
    store.update("user.city", json!("Roma")).unwrap();
    store.set_enabled(false).unwrap();

    assert!(!store.update("user.city", json!("Milano")).unwrap());
    assert_eq!(store.get("user.city", json!("default")), json!("default"));

    store.set_enabled(true).unwrap();
    assert_eq!(store.get("user.city", Value::Null), json!("Roma"));
}

#[test]
fn delete_checks_user_before_conversations() {
    let tmp = TempDir::new().unwrap();
    let mut store = MemoryStore::open(tmp.path(), "default").unwrap();
    store.update("user.topic", json!("utente")).unwrap();
    store.update("conversations.topic", json!("conversazioni")).unwrap();

    assert!(store.delete("topic").unwrap());
    assert_eq!(store.get("user.topic", Value::Null), Value::Null);
    assert_eq!(store.get("conversations.topic", Value::Null), json!("conversazioni"));

    assert!(store.delete("topic").unwrap());
    assert_eq!(store.get("conversations.topic", Value::Null), Value::Null);

    assert!(!store.delete("topic").unwrap());
}

#[test]
fn delete_ignores_system_section() {
    let tmp = TempDir::new().unwrap();
    let mut store = MemoryStore::open(tmp.path(), "default").unwrap();
    assert!(!store.delete("memory_enabled").unwrap());
    assert!(store.is_enabled());
}

#[test]
fn corrupt_document_resets_to_default() {
    let tmp = TempDir::new().unwrap();
    let users = tmp.path().join(USERS_DIR);
    std::fs::create_dir_all(&users).unwrap();
    std::fs::write(users.join("default.json"), "{ broken json").unwrap();

    let store = MemoryStore::open(tmp.path(), "default").unwrap();
    assert!(store.is_enabled());
    assert_eq!(store.document()["user"], json!({}));
}

#[test]
fn non_object_document_resets_to_default() {
    let tmp = TempDir::new().unwrap();
    let users = tmp.path().join(USERS_DIR);
    std::fs::create_dir_all(&users).unwrap();
    std::fs::write(users.join("default.json"), "[1, 2, 3]").unwrap();

    let store = MemoryStore::open(tmp.path(), "default").unwrap();
    assert_eq!(store.document()["system"]["version"], json!("1.0"));
}

#[test]
fn writing_through_a_scalar_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let mut store = MemoryStore::open(tmp.path(), "default").unwrap();
    store.update("user.age", json!(30)).unwrap();

    let err = store.update("user.age.years", json!(31)).unwrap_err();
    assert!(matches!(err, MemoryError::PathConflict(_)));
    assert_eq!(store.get("user.age", Value::Null), json!(30));
}

#[test]
fn change_log_is_bounded_and_shared() {
    let tmp = TempDir::new().unwrap();
    let mut store = MemoryStore::open(tmp.path(), "default").unwrap();
    for i in 0..120 {
        store.update("user.counter", json!(i)).unwrap();
    }

    let entries = store.log().entries();
    assert_eq!(entries.len(), 100);
    assert_eq!(entries.last().unwrap().value_preview, "119");
    assert!(tmp.path().join("log.json").exists());
}

#[test]
fn user_named_log_does_not_clobber_change_log() {
    let tmp = TempDir::new().unwrap();
    let mut default = MemoryStore::open(tmp.path(), "default").unwrap();
    default.update("user.name", json!("Mirko")).unwrap();

    let mut log_user = MemoryStore::open(tmp.path(), "log").unwrap();
    log_user.update("user.a", json!(1)).unwrap();
    log_user.update("user.b", json!(2)).unwrap();

    assert_eq!(log_user.log().entries().len(), 3);
    let reopened = MemoryStore::open(tmp.path(), "default").unwrap();
    assert_eq!(reopened.log().entries().len(), 3);
    assert_eq!(reopened.get("user.name", Value::Null), json!("Mirko"));
    assert_eq!(log_user.get("user.b", Value::Null), json!(2));
}

#[test]
fn traversal_user_ids_are_refused() {
    let tmp = TempDir::new().unwrap();
    let memory_dir = tmp.path().join("memory");

    for bad in ["../escaped", "a/b", "", ".."] {
        assert!(matches!(
            MemoryStore::open(&memory_dir, bad),
            Err(MemoryError::InvalidUserId(_))
        ));
    }
    assert!(!tmp.path().join("escaped.json").exists());
    assert!(!memory_dir.join("escaped.json").exists());
}
