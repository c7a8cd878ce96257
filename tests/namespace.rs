use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use time::OffsetDateTime;

use flatns::codec::encode;
use flatns::error::handlers::error_to_status_code;
use flatns::store::{ObjectInfo, ObjectMetadata};
use flatns::utils::setup_logging;
use flatns::{
    Entry, FolderId, Key, LimitsConfig, MemoryObjectStore, Namespace, NamespaceError, ObjectStore,
    OpaqueId, StoreError,
};

const BUCKET: &str = "team";

fn limits() -> LimitsConfig {
    LimitsConfig {
        retry_backoff_ms: 0,
        ..LimitsConfig::default()
    }
}

fn id(raw: &str) -> OpaqueId {
    encode(&Key::parse(raw).unwrap())
}

fn folder(raw: &str) -> FolderId {
    FolderId::Id(id(raw))
}

fn at(secs: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(secs).unwrap()
}

async fn setup(keys: &[&str]) -> (Arc<MemoryObjectStore>, Namespace<MemoryObjectStore>) {
    setup_with(keys, limits()).await
}

async fn setup_with(
    keys: &[&str],
    limits: LimitsConfig,
) -> (Arc<MemoryObjectStore>, Namespace<MemoryObjectStore>) {
    setup_logging("debug");
    let store = Arc::new(MemoryObjectStore::with_owner("alice"));
    store.create_bucket(BUCKET).await;
    for key in keys {
        store.insert_object(BUCKET, key, "data", at(1_000)).await;
    }
    let namespace = Namespace::new(Arc::clone(&store), limits);
    (store, namespace)
}

fn sorted_keys(items: &[flatns::Item]) -> Vec<String> {
    let mut keys: Vec<_> = items.iter().map(|i| i.key.to_string()).collect();
    keys.sort();
    keys
}

#[tokio::test]
async fn test_create_file_then_conflict() {
    let (_, ns) = setup(&[]).await;

    let created = ns
        .create_file(BUCKET, &FolderId::Root, "README.md", None)
        .await
        .unwrap();
    assert_eq!(created, id("README.md"));

    let err = ns
        .create_file(BUCKET, &FolderId::Root, "README.md", None)
        .await
        .unwrap_err();
    assert!(matches!(err, NamespaceError::Conflict(_)));
    assert_eq!(error_to_status_code(&err), 409);
}

#[tokio::test]
async fn test_create_folder_and_nested_file() {
    let (store, ns) = setup(&[]).await;

    let docs = ns.create_folder(BUCKET, &FolderId::Root, "docs").await.unwrap();
    let docs = FolderId::Id(docs);
    ns.create_file(BUCKET, &docs, "notes.txt", Some(Bytes::from_static(b"hello")))
        .await
        .unwrap();

    assert_eq!(store.keys(BUCKET).await, vec!["docs/", "docs/notes.txt"]);

    let root_items = ns.list_children(BUCKET, &FolderId::Root).await.unwrap();
    assert_eq!(sorted_keys(&root_items), vec!["docs/"]);

    let docs_items = ns.list_children(BUCKET, &docs).await.unwrap();
    assert_eq!(sorted_keys(&docs_items), vec!["docs/notes.txt"]);
    assert_eq!(docs_items[0].size_bytes, Some(5));
    assert_eq!(docs_items[0].display_name, "notes.txt");

    let err = ns.create_folder(BUCKET, &FolderId::Root, "docs").await.unwrap_err();
    assert!(matches!(err, NamespaceError::Conflict(_)));
}

#[tokio::test]
async fn test_implicit_folder_counts_as_existing() {
    let (_, ns) = setup(&["media/photo.jpg"]).await;

    assert!(ns.has_folder(BUCKET, &folder("media/")).await.unwrap());
    let err = ns
        .create_folder(BUCKET, &FolderId::Root, "media")
        .await
        .unwrap_err();
    assert!(matches!(err, NamespaceError::Conflict(_)));
}

#[tokio::test]
async fn test_nested_keys_collapse_into_one_child() {
    let (_, ns) = setup(&["a/b/x", "a/b/y", "a/b/z/w"]).await;

    let items = ns.list_children(BUCKET, &folder("a/")).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].key.as_str(), "a/b/");
    assert!(items[0].is_folder);
    assert_eq!(items[0].size_bytes, None);
}

#[tokio::test]
async fn test_file_and_folder_children() {
    let (_, ns) = setup(&["a/f1", "a/sub/f2"]).await;

    let items = ns.list_children(BUCKET, &folder("a/")).await.unwrap();
    assert_eq!(sorted_keys(&items), vec!["a/f1", "a/sub/"]);
    for item in &items {
        assert_eq!(item.is_folder, item.key.is_folder());
        assert_eq!(item.id, encode(&item.key));
    }
}

#[tokio::test]
async fn test_folder_child_tracks_latest_descendant() {
    let (store, ns) = setup(&[]).await;
    store.insert_object(BUCKET, "p/q/old", "x", at(100)).await;
    store.insert_object(BUCKET, "p/q/deep/newest", "x", at(900)).await;
    store.insert_object(BUCKET, "p/q/mid", "x", at(500)).await;

    let items = ns.list_children(BUCKET, &folder("p/")).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].modified_at, at(900));

    let entry = ns.get_folder(BUCKET, &folder("p/q/")).await.unwrap();
    assert_eq!(entry.display_name, "q");
    assert_eq!(entry.created_at, Some(at(100)));
    assert_eq!(entry.modified_at, Some(at(900)));
}

#[tokio::test]
async fn test_get_folder_prefers_marker_and_root_is_synthetic() {
    let (store, ns) = setup(&[]).await;
    store.insert_object(BUCKET, "docs/", "", at(10)).await;
    store.insert_object(BUCKET, "docs/later.txt", "x", at(50)).await;

    let entry = ns.get_folder(BUCKET, &folder("docs/")).await.unwrap();
    assert_eq!(entry.modified_at, Some(at(10)));
    assert_eq!(entry.owner_hint.as_deref(), Some("alice"));
    assert_eq!(entry.id, folder("docs/"));

    let root = ns.get_folder(BUCKET, &FolderId::Root).await.unwrap();
    assert_eq!(root.id, FolderId::Root);
    assert_eq!(root.display_name, BUCKET);
    assert!(root.modified_at.is_none());
}

#[tokio::test]
async fn test_get_file_entry() {
    let (_, ns) = setup(&["reports/q1.pdf"]).await;

    let entry = ns.get_file(BUCKET, &id("reports/q1.pdf")).await.unwrap();
    assert_eq!(entry.display_name, "q1.pdf");
    assert_eq!(entry.size_bytes, 4);
    assert_eq!(entry.mime_type_hint, "application/pdf");
    assert_eq!(entry.storage_class.as_deref(), Some("STANDARD"));
    assert_eq!(entry.modified_at, at(1_000));
}

#[tokio::test]
async fn test_get_entry_of_either_kind() {
    let (store, ns) = setup(&["reports/q1.pdf"]).await;

    let Entry::File(file) = ns.get_entry(BUCKET, &id("reports/q1.pdf")).await.unwrap() else {
        panic!("expected a file entry");
    };
    assert_eq!(file.size_bytes, 4);

    let entry = ns.get_entry(BUCKET, &id("reports/")).await.unwrap();
    assert_eq!(entry.display_name(), "reports");
    assert_eq!(entry.key().as_str(), "reports/");
    let Entry::Folder(folder) = entry else {
        panic!("expected a folder entry");
    };
    assert_eq!(folder.modified_at, Some(at(1_000)));

    assert!(ns.get_entry(BUCKET, &id("reports/q2.pdf")).await.unwrap_err().is_not_found());
    store.deny_bucket(BUCKET).await;
    assert!(ns.get_entry(BUCKET, &id("reports/")).await.unwrap_err().is_forbidden());
}

#[tokio::test]
async fn test_kind_mismatch_is_bad_request() {
    let (_, ns) = setup(&["docs/a.txt"]).await;

    let err = ns.get_file(BUCKET, &id("docs/")).await.unwrap_err();
    assert!(matches!(err, NamespaceError::BadRequest(_)));

    let err = ns.get_folder(BUCKET, &folder("docs/a.txt")).await.unwrap_err();
    assert!(matches!(err, NamespaceError::BadRequest(_)));

    let err = ns
        .create_file(BUCKET, &folder("docs/a.txt"), "b.txt", None)
        .await
        .unwrap_err();
    assert!(matches!(err, NamespaceError::BadRequest(_)));

    assert!(!ns.has_file(BUCKET, &id("docs/")).await.unwrap());
    assert!(!ns.has_folder(BUCKET, &folder("docs/a.txt")).await.unwrap());
}

#[tokio::test]
async fn test_has_probes() {
    let (_, ns) = setup(&["docs/a.txt"]).await;

    assert!(ns.has_file(BUCKET, &id("docs/a.txt")).await.unwrap());
    assert!(!ns.has_file(BUCKET, &id("docs/b.txt")).await.unwrap());
    assert!(ns.has_folder(BUCKET, &folder("docs/")).await.unwrap());
    assert!(ns.has_folder(BUCKET, &FolderId::Root).await.unwrap());
    assert!(!ns.has_folder(BUCKET, &folder("other/")).await.unwrap());
    assert!(!ns.has_file(BUCKET, &OpaqueId::new("***")).await.unwrap());
    assert!(!ns.has_folder("missing-bucket", &FolderId::Root).await.unwrap());
}

#[tokio::test]
async fn test_malformed_ids_are_not_found() {
    let (_, ns) = setup(&["docs/a.txt"]).await;

    for raw in ["", "***", "YQ==", "L2E"] {
        let bad = OpaqueId::new(raw);
        assert!(ns.get_file(BUCKET, &bad).await.unwrap_err().is_not_found());
        assert!(
            ns.list_children(BUCKET, &FolderId::Id(bad.clone()))
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(ns.delete_item(BUCKET, &bad, true).await.unwrap_err().is_not_found());
    }
}

#[tokio::test]
async fn test_forbidden_container_hides_everything() {
    let (store, ns) = setup(&["docs/a.txt"]).await;
    store.deny_bucket(BUCKET).await;

    let existing = id("docs/a.txt");
    let missing = id("nothing/here.txt");
    let malformed = OpaqueId::new("!!");

    for file in [&existing, &missing, &malformed] {
        assert!(ns.get_file(BUCKET, file).await.unwrap_err().is_forbidden());
        assert!(ns.has_file(BUCKET, file).await.unwrap_err().is_forbidden());
        assert!(ns.get_content(BUCKET, file).await.unwrap_err().is_forbidden());
        assert!(ns.delete_item(BUCKET, file, true).await.unwrap_err().is_forbidden());
        assert!(
            ns.put_content(BUCKET, file, &b"new"[..])
                .await
                .unwrap_err()
                .is_forbidden()
        );
    }

    for target in [
        FolderId::Root,
        folder("docs/"),
        folder("nothing/"),
        FolderId::Id(malformed.clone()),
    ] {
        assert!(ns.get_folder(BUCKET, &target).await.unwrap_err().is_forbidden());
        assert!(ns.list_children(BUCKET, &target).await.unwrap_err().is_forbidden());
        assert!(ns.has_folder(BUCKET, &target).await.unwrap_err().is_forbidden());
        assert!(
            ns.create_folder(BUCKET, &target, "new")
                .await
                .unwrap_err()
                .is_forbidden()
        );
    }

    // kind mismatches must not leak either
    assert!(ns.get_file(BUCKET, &id("docs/")).await.unwrap_err().is_forbidden());
    assert!(
        ns.container_attributes(BUCKET)
            .await
            .unwrap_err()
            .is_forbidden()
    );
}

#[tokio::test]
async fn test_missing_container_is_not_found() {
    let (_, ns) = setup(&[]).await;
    assert!(
        ns.list_children("nope", &FolderId::Root)
            .await
            .unwrap_err()
            .is_not_found()
    );
    assert!(
        ns.create_file("nope", &FolderId::Root, "a.txt", None)
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[tokio::test]
async fn test_item_level_forbidden() {
    let (store, ns) = setup(&["docs/secret.txt"]).await;
    store.deny_key(BUCKET, "docs/secret.txt").await;

    assert!(
        ns.get_file(BUCKET, &id("docs/secret.txt"))
            .await
            .unwrap_err()
            .is_forbidden()
    );
    assert!(
        ns.create_file(BUCKET, &folder("docs/"), "secret.txt", None)
            .await
            .unwrap_err()
            .is_forbidden()
    );

    let secret = id("docs/secret.txt");
    assert!(ns.has_file(BUCKET, &secret).await.unwrap_err().is_forbidden());
    assert!(ns.get_content(BUCKET, &secret).await.unwrap_err().is_forbidden());
    assert!(
        ns.put_content(BUCKET, &secret, &b"leak"[..])
            .await
            .unwrap_err()
            .is_forbidden()
    );
    assert!(
        ns.delete_item(BUCKET, &secret, false)
            .await
            .unwrap_err()
            .is_forbidden()
    );
    assert!(
        ns.delete_item(BUCKET, &id("docs/"), true)
            .await
            .unwrap_err()
            .is_forbidden()
    );
    assert_eq!(store.keys(BUCKET).await, vec!["docs/secret.txt"]);
}

#[tokio::test]
async fn test_denied_key_is_forbidden_even_when_absent() {
    let (store, ns) = setup(&["docs/a.txt"]).await;
    store.deny_key(BUCKET, "docs/hidden.txt").await;

    let hidden = id("docs/hidden.txt");
    assert!(ns.has_file(BUCKET, &hidden).await.unwrap_err().is_forbidden());
    assert!(ns.get_file(BUCKET, &hidden).await.unwrap_err().is_forbidden());
    assert!(!ns.has_file(BUCKET, &id("docs/b.txt")).await.unwrap());
}

#[tokio::test]
async fn test_non_empty_folder_guard() {
    let (store, ns) = setup(&["proj/", "proj/src/main.rs", "proj/README.md"]).await;

    let err = ns.delete_item(BUCKET, &id("proj/"), false).await.unwrap_err();
    assert!(matches!(err, NamespaceError::BadRequest(_)));
    assert_eq!(store.keys(BUCKET).await.len(), 3);

    let report = ns.delete_item(BUCKET, &id("proj/"), true).await.unwrap();
    assert!(report.is_complete());
    assert_eq!(report.deleted.len(), 3);
    assert!(store.keys(BUCKET).await.is_empty());
    assert!(!ns.has_folder(BUCKET, &folder("proj/")).await.unwrap());
}

#[tokio::test]
async fn test_folder_without_marker_is_guarded() {
    let (store, ns) = setup(&["loose/only.txt"]).await;

    let err = ns.delete_item(BUCKET, &id("loose/"), false).await.unwrap_err();
    assert!(matches!(err, NamespaceError::BadRequest(_)));
    assert_eq!(store.keys(BUCKET).await, vec!["loose/only.txt"]);
}

#[tokio::test]
async fn test_empty_folder_deletes_without_recursion() {
    let (store, ns) = setup(&["empty/", "emptyish.txt"]).await;

    let report = ns.delete_item(BUCKET, &id("empty/"), false).await.unwrap();
    assert_eq!(report.deleted, vec!["empty/"]);
    assert_eq!(store.keys(BUCKET).await, vec!["emptyish.txt"]);
}

#[tokio::test]
async fn test_folder_vanishes_with_last_child() {
    let (_, ns) = setup(&["tmp/one.log"]).await;

    ns.delete_item(BUCKET, &id("tmp/one.log"), false).await.unwrap();
    assert!(!ns.has_folder(BUCKET, &folder("tmp/")).await.unwrap());
    assert!(ns.list_children(BUCKET, &FolderId::Root).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_repeated_delete_is_not_found() {
    let (_, ns) = setup(&["a.txt"]).await;

    ns.delete_item(BUCKET, &id("a.txt"), false).await.unwrap();
    for _ in 0..2 {
        let err = ns.delete_item(BUCKET, &id("a.txt"), false).await.unwrap_err();
        assert!(err.is_not_found());
    }
}

#[tokio::test]
async fn test_partial_delete_then_retry_converges() {
    let limits = LimitsConfig {
        delete_retries: 0,
        ..limits()
    };
    let (store, ns) = setup_with(&["logs/", "logs/a", "logs/b", "logs/c"], limits).await;
    store.fail_deletes(BUCKET, "logs/b", 1).await;

    let err = ns.delete_item(BUCKET, &id("logs/"), true).await.unwrap_err();
    let NamespaceError::PartialDelete(report) = err else {
        panic!("expected a partial delete, got {:?}", err);
    };
    assert_eq!(report.deleted, vec!["logs/", "logs/a", "logs/c"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "logs/b");
    assert_eq!(store.keys(BUCKET).await, vec!["logs/b"]);

    let report = ns.delete_item(BUCKET, &id("logs/"), true).await.unwrap();
    assert_eq!(report.deleted, vec!["logs/b"]);
    assert!(store.keys(BUCKET).await.is_empty());
}

#[tokio::test]
async fn test_transient_delete_failures_are_retried() {
    let (store, ns) = setup(&["flaky.bin"]).await;
    store.fail_deletes(BUCKET, "flaky.bin", 2).await;

    let report = ns.delete_item(BUCKET, &id("flaky.bin"), false).await.unwrap();
    assert_eq!(report.deleted, vec!["flaky.bin"]);
}

#[tokio::test]
async fn test_total_delete_failure_is_internal() {
    let limits = LimitsConfig {
        delete_retries: 0,
        ..limits()
    };
    let (store, ns) = setup_with(&["stuck.bin"], limits).await;
    store.fail_deletes(BUCKET, "stuck.bin", 1).await;

    let err = ns.delete_item(BUCKET, &id("stuck.bin"), false).await.unwrap_err();
    assert!(matches!(err, NamespaceError::Internal { .. }));
    assert_eq!(store.keys(BUCKET).await, vec!["stuck.bin"]);
}

#[tokio::test]
async fn test_recursive_delete_walks_every_page() {
    let limits = LimitsConfig {
        max_list_keys: 2,
        ..limits()
    };
    let keys = ["big/", "big/1", "big/2", "big/3", "big/4", "big/sub/5"];
    let (store, ns) = setup_with(&keys, limits).await;
    store.insert_object(BUCKET, "bigger.txt", "x", at(1)).await;

    let report = ns.delete_item(BUCKET, &id("big/"), true).await.unwrap();
    assert_eq!(report.deleted.len(), keys.len());
    assert_eq!(store.keys(BUCKET).await, vec!["bigger.txt"]);
}

#[tokio::test]
async fn test_put_and_get_content() {
    let (_, ns) = setup(&[]).await;
    let file = ns
        .create_file(BUCKET, &FolderId::Root, "data.csv", None)
        .await
        .unwrap();
    assert_eq!(ns.get_content(BUCKET, &file).await.unwrap(), Bytes::new());

    ns.put_content(BUCKET, &file, &b"a,b\n1,2\n"[..]).await.unwrap();
    assert_eq!(
        ns.get_content(BUCKET, &file).await.unwrap(),
        Bytes::from_static(b"a,b\n1,2\n")
    );
    assert_eq!(ns.get_file(BUCKET, &file).await.unwrap().size_bytes, 8);
}

#[tokio::test]
async fn test_put_content_requires_existing_file() {
    let (_, ns) = setup(&["dir/"]).await;

    let err = ns
        .put_content(BUCKET, &id("absent.txt"), &b"x"[..])
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = ns.put_content(BUCKET, &id("dir/"), &b"x"[..]).await.unwrap_err();
    assert!(matches!(err, NamespaceError::BadRequest(_)));
}

#[tokio::test]
async fn test_upload_limit() {
    let limits = LimitsConfig {
        max_upload_size_mb: 1,
        ..limits()
    };
    let (_, ns) = setup_with(&["big.bin"], limits).await;
    let oversized = vec![0u8; 1024 * 1024 + 1];

    let err = ns
        .put_content(BUCKET, &id("big.bin"), &oversized[..])
        .await
        .unwrap_err();
    assert!(matches!(err, NamespaceError::BadRequest(_)));

    let err = ns
        .create_file(BUCKET, &FolderId::Root, "too-big.bin", Some(Bytes::from(oversized)))
        .await
        .unwrap_err();
    assert!(matches!(err, NamespaceError::BadRequest(_)));

    let exact = vec![1u8; 1024 * 1024];
    ns.put_content(BUCKET, &id("big.bin"), &exact[..]).await.unwrap();
}

#[tokio::test]
async fn test_invalid_names_are_rejected() {
    let (store, ns) = setup(&[]).await;

    for name in ["a/b", "", "..", "line\nbreak"] {
        let err = ns
            .create_file(BUCKET, &FolderId::Root, name, None)
            .await
            .unwrap_err();
        assert!(matches!(err, NamespaceError::BadRequest(_)), "{:?}", name);
        let err = ns.create_folder(BUCKET, &FolderId::Root, name).await.unwrap_err();
        assert!(matches!(err, NamespaceError::BadRequest(_)), "{:?}", name);
    }
    assert!(store.keys(BUCKET).await.is_empty());
}

#[tokio::test]
async fn test_create_in_missing_parent() {
    let (_, ns) = setup(&[]).await;
    let err = ns
        .create_file(BUCKET, &folder("ghost/"), "a.txt", None)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_container_attributes() {
    let (store, ns) = setup(&[]).await;
    store.set_object_lock(BUCKET, true).await;
    store
        .set_tags(BUCKET, BTreeMap::from([("cost-center".to_string(), "42".to_string())]))
        .await;

    let attrs = ns.container_attributes(BUCKET).await.unwrap();
    assert!(attrs.object_lock_enabled);
    assert!(!attrs.versioning_enabled);
    assert!(attrs.encryption.is_none());
    assert_eq!(attrs.tags.len(), 1);
}

/// Store whose existence checks never see any object, as when two creators
/// check before either has written.
struct StaleHeadStore {
    inner: MemoryObjectStore,
}

#[async_trait]
impl ObjectStore for StaleHeadStore {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, StoreError> {
        self.inner.bucket_exists(bucket).await
    }

    async fn head(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, StoreError> {
        Err(StoreError::NotFound(format!("{}/{}", bucket, key)))
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes, StoreError> {
        self.inner.get(bucket, key).await
    }

    async fn put(&self, bucket: &str, key: &str, body: Bytes) -> Result<(), StoreError> {
        self.inner.put(bucket, key, body).await
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        self.inner.delete(bucket, key).await
    }

    async fn list_by_prefix(
        &self,
        bucket: &str,
        prefix: &str,
        max_keys: usize,
    ) -> Result<Vec<ObjectInfo>, StoreError> {
        self.inner.list_by_prefix(bucket, prefix, max_keys).await
    }

    async fn versioning_enabled(&self, bucket: &str) -> Result<bool, StoreError> {
        self.inner.versioning_enabled(bucket).await
    }

    async fn encryption_algorithm(&self, bucket: &str) -> Result<String, StoreError> {
        self.inner.encryption_algorithm(bucket).await
    }

    async fn object_lock_enabled(&self, bucket: &str) -> Result<bool, StoreError> {
        self.inner.object_lock_enabled(bucket).await
    }

    async fn access_policy(&self, bucket: &str) -> Result<String, StoreError> {
        self.inner.access_policy(bucket).await
    }

    async fn tags(&self, bucket: &str) -> Result<BTreeMap<String, String>, StoreError> {
        self.inner.tags(bucket).await
    }
}

#[tokio::test]
async fn test_racing_creates_last_write_wins() {
    let inner = MemoryObjectStore::new();
    inner.create_bucket(BUCKET).await;
    let ns = Namespace::new(Arc::new(StaleHeadStore { inner }), limits());

    let first = ns
        .create_file(BUCKET, &FolderId::Root, "race.txt", Some(Bytes::from_static(b"first")))
        .await
        .unwrap();
    let second = ns
        .create_file(BUCKET, &FolderId::Root, "race.txt", Some(Bytes::from_static(b"second")))
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(
        ns.store().get(BUCKET, "race.txt").await.unwrap(),
        Bytes::from_static(b"second")
    );
}

#[tokio::test]
async fn test_namespace_over_trait_object() {
    let store = MemoryObjectStore::new();
    store.create_bucket(BUCKET).await;
    let store: Arc<dyn ObjectStore> = Arc::new(store);
    let ns = Namespace::new(store, limits());

    ns.create_folder(BUCKET, &FolderId::Root, "shared").await.unwrap();
    assert!(ns.has_folder(BUCKET, &folder("shared/")).await.unwrap());
}
