//! Edge case tests: corrupt slots, odd stored values, codec boundaries,
//! merge semantics.

use git_whoami::codec::{self, DisplayIdentity};
use git_whoami::{
    AuthorDirectory, AuthorPatch, AuthorRecord, DisplayMode, FileStore, KeyValueStore,
    MemoryStore, StoredAuthor, AUTHOR_DETAILS_KEY,
};

fn directory_with(raw: &str) -> AuthorDirectory<MemoryStore> {
    AuthorDirectory::new(MemoryStore::new().with_value(AUTHOR_DETAILS_KEY, raw))
}

// === Stored Format Edge Cases ===

#[tokio::test]
async fn edge_non_utf8_slot_is_empty_registry() {
    let store = MemoryStore::new().with_value(AUTHOR_DETAILS_KEY, vec![0xff, 0xfe, 0x00]);
    let directory = AuthorDirectory::new(store);
    assert!(directory.get_all().await.is_empty());
}

#[tokio::test]
async fn edge_corrupt_slot_survives_failed_update() {
    let directory = directory_with("{ truncated");
    let result = directory
        .update([("a@x.com", AuthorPatch::new().name("A"))])
        .await;

    assert!(result.is_err());
    assert_eq!(
        directory.store().get(AUTHOR_DETAILS_KEY).await,
        Some(b"{ truncated".to_vec())
    );
}

#[tokio::test]
async fn edge_truncated_file_keeps_saved_authors() {
    let dir = tempfile::tempdir().unwrap();
    let directory = AuthorDirectory::new(FileStore::new(dir.path()));
    directory
        .update([
            ("a@x.com", AuthorPatch::new().name("A")),
            ("b@x.com", AuthorPatch::new().name("B")),
            ("c@x.com", AuthorPatch::new().name("C")),
        ])
        .await
        .unwrap();

    // Drop the closing brace, as an interrupted copy would
    let slot = dir.path().join(format!("{AUTHOR_DETAILS_KEY}.json"));
    let mut bytes = std::fs::read(&slot).unwrap();
    bytes.pop();
    std::fs::write(&slot, &bytes).unwrap();

    assert!(directory
        .update([("new@x.com", AuthorPatch::new().name("New"))])
        .await
        .is_err());
    assert!(directory.delete("a@x.com").await.is_err());
    assert_eq!(std::fs::read(&slot).unwrap(), bytes);

    // Repairing the file brings every author back
    bytes.push(b'}');
    std::fs::write(&slot, &bytes).unwrap();
    let emails: Vec<_> = directory.get_all().await.into_keys().collect();
    assert_eq!(emails, ["a@x.com", "b@x.com", "c@x.com"]);
}

#[tokio::test]
async fn edge_non_string_entries_decode_through_legacy_rule() {
    let directory = directory_with(r#"{"a@x.com":42,"b@x.com":{"name":"B"}}"#);
    let all = directory.get_all().await;

    assert_eq!(all["a@x.com"].name.as_deref(), Some("42"));
    assert_eq!(all["b@x.com"], AuthorRecord::new("B", "b@x.com"));
}

#[tokio::test]
async fn edge_legacy_name_that_looks_like_json() {
    let directory = directory_with(r#"{"a@x.com":"[Bot] Builder"}"#);
    assert_eq!(
        directory.get_by_email("a@x.com").await,
        Some(AuthorRecord::new("[Bot] Builder", "a@x.com"))
    );
}

#[tokio::test]
async fn edge_embedded_email_divergence_uses_key() {
    let directory = directory_with(r#"{"key@x.com":"{\"name\":\"K\",\"email\":\"other@x.com\"}"}"#);
    let record = directory.get_by_email("key@x.com").await.unwrap();
    assert_eq!(record.email, "key@x.com");
    assert!(directory.get_by_email("other@x.com").await.is_none());
}

#[test]
fn edge_empty_legacy_name_is_not_usable() {
    let record = StoredAuthor::decode_str("").into_record("a@x.com");
    assert_eq!(record.name.as_deref(), Some(""));
    assert!(!record.is_usable());
}

// === Merge Edge Cases ===

#[tokio::test]
async fn edge_last_write_wins_within_one_update() {
    let directory = AuthorDirectory::new(MemoryStore::new());
    directory
        .update([
            ("a@x.com", AuthorPatch::new().name("First")),
            ("a@x.com", AuthorPatch::new().name("Second")),
        ])
        .await
        .unwrap();
    assert_eq!(
        directory.get_by_email("a@x.com").await.unwrap().name.as_deref(),
        Some("Second")
    );
}

#[tokio::test]
async fn edge_empty_key_path_clears_signing() {
    let directory = AuthorDirectory::new(MemoryStore::new());
    directory
        .update_author(&AuthorRecord::new("A", "a@x.com").with_private_key("k"))
        .await
        .unwrap();
    directory
        .update([("a@x.com", AuthorPatch::new().private_key_path(""))])
        .await
        .unwrap();
    assert_eq!(directory.get_by_email("a@x.com").await.unwrap().signing_key(), None);
}

#[tokio::test]
async fn edge_update_with_no_entries_keeps_registry() {
    let directory = directory_with(r#"{"a@x.com":"A"}"#);
    directory
        .update(Vec::<(String, AuthorPatch)>::new())
        .await
        .unwrap();
    assert_eq!(
        directory.get_by_email("a@x.com").await,
        Some(AuthorRecord::new("A", "a@x.com"))
    );
}

// === Codec Edge Cases ===

#[test]
fn edge_decode_without_name() {
    let parsed = codec::decode("<jane@x.com>");
    assert_eq!(parsed.name, "");
    assert_eq!(parsed.email, "jane@x.com");
    assert!(parsed.is_selection());
}

#[test]
fn edge_decode_sentinel_is_never_a_selection() {
    assert!(!DisplayIdentity::not_available().is_selection());
    assert!(!codec::decode("N/A <N/A>").is_selection());
}

#[test]
fn edge_unicode_names_roundtrip() {
    let record = AuthorRecord::new("Zoë Ångström 山田", "zoe@例え.jp");
    let parsed = codec::decode(&codec::encode(&record, DisplayMode::Full));
    assert_eq!(parsed.name, "Zoë Ångström 山田");
    assert_eq!(parsed.email, "zoe@例え.jp");
    assert_eq!(codec::encode(&record, DisplayMode::Domain), "例え.jp");
}
