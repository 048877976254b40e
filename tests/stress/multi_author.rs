//! Stress tests: many authors, repeated merges, large mixed registries.

use std::collections::BTreeMap;

use git_whoami::{
    AuthorDirectory, AuthorPatch, AuthorRecord, FileStore, MemoryStore, AUTHOR_DETAILS_KEY,
};

#[tokio::test]
async fn stress_500_authors_single_update() {
    let directory = AuthorDirectory::new(MemoryStore::new());
    let patches: Vec<(String, AuthorPatch)> = (0..500)
        .map(|i| {
            (
                format!("user{i}@x.com"),
                AuthorPatch::new().name(format!("User {i}")),
            )
        })
        .collect();

    directory.update(patches).await.unwrap();

    let all = directory.get_all().await;
    assert_eq!(all.len(), 500);
    assert_eq!(all["user250@x.com"].name.as_deref(), Some("User 250"));
}

#[tokio::test]
async fn stress_large_mixed_registry_decodes_every_entry() {
    let mut raw = BTreeMap::new();
    for i in 0..1000 {
        let email = format!("user{i}@x.com");
        let value = if i % 2 == 0 {
            format!("Legacy {i}")
        } else {
            serde_json::to_string(&AuthorRecord::new(format!("Current {i}"), email.clone()))
                .unwrap()
        };
        raw.insert(email, value);
    }
    let store = MemoryStore::new().with_value(
        AUTHOR_DETAILS_KEY,
        serde_json::to_vec(&raw).unwrap(),
    );
    let directory = AuthorDirectory::new(store);

    let all = directory.get_all().await;
    assert_eq!(all.len(), 1000);
    assert_eq!(all["user10@x.com"].name.as_deref(), Some("Legacy 10"));
    assert_eq!(all["user11@x.com"].name.as_deref(), Some("Current 11"));
    assert!(all.iter().all(|(email, record)| *email == record.email));
}

#[tokio::test]
async fn stress_repeated_updates_converge() {
    let dir = tempfile::tempdir().unwrap();
    let directory = AuthorDirectory::new(FileStore::new(dir.path()));

    for round in 0..50 {
        let email = format!("user{}@x.com", round % 5);
        directory
            .update([(email, AuthorPatch::new().name(format!("Round {round}")))])
            .await
            .unwrap();
    }

    let all = directory.get_all().await;
    assert_eq!(all.len(), 5);
    for i in 0..5 {
        let expected = format!("Round {}", 45 + i);
        assert_eq!(all[&format!("user{i}@x.com")].name.as_deref(), Some(expected.as_str()));
    }
}
