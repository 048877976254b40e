//! Integration test: full author directory lifecycle.
//!
//! Exercises the directory against both store backends: legacy data left by
//! an old release, merge updates, lazy upgrade on write, delete and reset.

use std::collections::BTreeMap;

use git_whoami::codec::{self, DisplayMode};
use git_whoami::{
    AuthorDirectory, AuthorPatch, AuthorRecord, FileStore, KeyValueStore, MemoryStore,
    StoredAuthor, AUTHOR_DETAILS_KEY,
};

#[tokio::test]
async fn full_directory_lifecycle() {
    // ── Step 1: Start from a registry written by an old release ─────────
    let legacy = r#"{"jane@x.com":"Jane Doe","joe@x.com":"{\"name\":\"Joe\",\"email\":\"joe@x.com\",\"privateKeyPath\":\"~/.ssh/joe\"}"}"#;
    let store = MemoryStore::new().with_value(AUTHOR_DETAILS_KEY, legacy);
    let directory = AuthorDirectory::new(store.clone());

    let all = directory.get_all().await;
    assert_eq!(all.len(), 2, "Mixed registry should decode both entries");
    assert_eq!(all["jane@x.com"], AuthorRecord::new("Jane Doe", "jane@x.com"));
    assert_eq!(all["joe@x.com"].signing_key(), Some("~/.ssh/joe"));

    // ── Step 2: Merge a partial update ──────────────────────────────────
    directory
        .update([("jane@x.com", AuthorPatch::new().private_key_path("~/.ssh/jane"))])
        .await
        .expect("update should succeed");

    let jane = directory
        .get_by_email("jane@x.com")
        .await
        .expect("jane should still be saved");
    assert_eq!(jane.name.as_deref(), Some("Jane Doe"), "Name should be preserved");
    assert_eq!(jane.signing_key(), Some("~/.ssh/jane"));

    // ── Step 3: Every entry is now in the structured format ─────────────
    let bytes = store.get(AUTHOR_DETAILS_KEY).await.expect("slot should exist");
    let raw: BTreeMap<String, String> =
        serde_json::from_slice(&bytes).expect("slot should be a string map");
    for (email, value) in &raw {
        assert!(
            !StoredAuthor::decode_str(value).is_legacy(),
            "{email} should have been upgraded"
        );
    }

    // ── Step 4: Display lines round-trip through the codec ──────────────
    for record in directory.get_all().await.values() {
        let line = codec::encode(record, DisplayMode::Full);
        let parsed = codec::decode(&line);
        assert_eq!(Some(parsed.name.as_str()), record.name());
        assert_eq!(parsed.email, record.email);
    }

    // ── Step 5: Delete then get ─────────────────────────────────────────
    directory.delete("jane@x.com").await.expect("delete should succeed");
    assert!(directory.get_by_email("jane@x.com").await.is_none());

    let before = directory.get_all().await;
    directory
        .delete("nobody@x.com")
        .await
        .expect("deleting an unknown email is a no-op");
    assert_eq!(directory.get_all().await, before);

    // ── Step 6: Reset ───────────────────────────────────────────────────
    directory.reset().await.expect("reset should succeed");
    assert!(directory.get_all().await.is_empty());
}

#[tokio::test]
async fn file_store_directory_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let directory = AuthorDirectory::new(FileStore::new(dir.path()));
        directory
            .update_author(&AuthorRecord::new("Jane Doe", "jane@x.com").with_private_key("k"))
            .await
            .unwrap();
    }

    let reopened = AuthorDirectory::new(FileStore::new(dir.path()));
    assert_eq!(
        reopened.get_by_email("jane@x.com").await,
        Some(AuthorRecord::new("Jane Doe", "jane@x.com").with_private_key("k"))
    );
}

#[tokio::test]
async fn legacy_file_on_disk_is_read_and_upgraded() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(format!("{AUTHOR_DETAILS_KEY}.json")),
        r#"{"jane@x.com":"Jane Doe"}"#,
    )
    .unwrap();

    let directory = AuthorDirectory::new(FileStore::new(dir.path()));
    assert_eq!(
        directory.get_by_email("jane@x.com").await,
        Some(AuthorRecord::new("Jane Doe", "jane@x.com"))
    );

    directory.update([("jane@x.com", AuthorPatch::new())]).await.unwrap();
    let text = std::fs::read_to_string(dir.path().join(format!("{AUTHOR_DETAILS_KEY}.json")))
        .unwrap();
    assert!(text.contains(r#"\"name\":\"Jane Doe\""#), "got: {text}");
}
