use methoddb::{memory::InMemoryStore, prelude::*};
use serde::{Deserialize, Serialize};
use serde_json::{Value as Json, json};

fn users_payload() -> Json {
    json!([
        {
            "username": "johnperry",
            "email": "johnperry@example.com",
            "first_name": "John",
            "last_name": "Perry",
            "age": 75
        },
        {
            "username": "louiswu",
            "email": "louiswu@example.com",
            "first_name": "Louis",
            "last_name": "Wu",
            "age": 200
        }
    ])
}

fn john() -> Json {
    json!({
        "username": "johnperry",
        "email": "johnperry@example.com",
        "first_name": "John",
        "last_name": "Perry",
        "age": 75
    })
}

fn seeded_store() -> DocumentStore<InMemoryStore> {
    let store = DocumentStore::new(InMemoryStore::new());
    let ids = store.insert_json("test", users_payload()).unwrap();
    assert_eq!(ids, vec![1, 2]);
    store
}

#[test]
fn insert_returns_ids_in_order() {
    let store = DocumentStore::new(InMemoryStore::new());
    assert_eq!(store.insert_json("test", users_payload()).unwrap(), vec![1, 2]);
    assert_eq!(store.insert_json("test", users_payload()).unwrap(), vec![3, 4]);
}

#[test]
fn find_one_field() {
    let store = seeded_store();
    let found = store
        .query_json("test", Some(r#"{username:"johnperry"}"#))
        .unwrap();
    assert_eq!(found, json!([john()]));
}

#[test]
fn find_two_fields() {
    let store = seeded_store();
    let found = store
        .query_json("test", Some(r#"{username:"johnperry",age:75}"#))
        .unwrap();
    assert_eq!(found, json!([john()]));
}

#[test]
fn mismatched_value_finds_nothing() {
    let store = seeded_store();
    let found = store
        .query_json("test", Some(r#"{username:"johnperry",age:76}"#))
        .unwrap();
    assert_eq!(found, json!([]));
}

#[test]
fn missing_query_matches_everything() {
    let store = seeded_store();
    let found = store.query_json("test", None).unwrap();
    assert_eq!(found.as_array().map(Vec::len), Some(2));
    assert_eq!(found[0]["username"], "johnperry");
    assert_eq!(found[1]["username"], "louiswu");
}

#[test]
fn results_keep_field_order() {
    let store = seeded_store();
    let found = store.query("test", r#"{username:"louiswu"}"#).unwrap();
    assert_eq!(
        serde_json::to_string(&found).unwrap(),
        r#"[{"username":"louiswu","email":"louiswu@example.com","first_name":"Louis","last_name":"Wu","age":200}]"#
    );
}

#[test]
fn integer_filters_skip_float_values() {
    let store = DocumentStore::new(InMemoryStore::new());
    store
        .insert_json("scores", json!([{ "age": 75.0 }, { "age": 75 }]))
        .unwrap();

    let found = store.query_json("scores", Some("{age:75}")).unwrap();
    assert_eq!(serde_json::to_string(&found).unwrap(), r#"[{"age":75}]"#);

    let found = store.query_json("scores", Some("{age:75.0}")).unwrap();
    assert_eq!(serde_json::to_string(&found).unwrap(), r#"[{"age":75.0}]"#);
}

#[test]
fn malformed_filter_is_a_client_error_and_changes_nothing() {
    let store = seeded_store();

    for text in ["{username:\"johnperry\"", "{age 75}", "{age:seventy}", "{age:75,}"] {
        let err = store.query("test", text).unwrap_err();
        assert!(err.is_client_error(), "{text}: {err}");
        assert!(matches!(err, DocumentStoreError::QuerySyntax(_)));
    }

    assert_eq!(store.collection("test").count().unwrap(), 2);
    assert_eq!(store.insert_json("test", json!([{}])).unwrap(), vec![3]);
}

#[test]
fn invalid_documents_reject_the_whole_batch() {
    let store = DocumentStore::new(InMemoryStore::new());

    let err = store
        .insert_json("test", json!([{ "ok": 1 }, { "tags": ["a"] }]))
        .unwrap_err();
    assert!(matches!(err, DocumentStoreError::InvalidDocument(_)));

    let err = store.insert_json("test", json!({ "ok": 1 })).unwrap_err();
    assert!(matches!(err, DocumentStoreError::InvalidDocument(_)));

    assert_eq!(store.collection("test").count().unwrap(), 0);
    assert!(store.list_collections().unwrap().is_empty());
}

#[test]
fn storage_errors_are_server_errors() {
    let backend = InMemoryStore::builder().max_documents(1).build().unwrap();
    let store = DocumentStore::new(backend);

    let err = store.insert_json("test", users_payload()).unwrap_err();
    assert!(!err.is_client_error());
    assert_eq!(store.query_json("test", None).unwrap(), json!([]));
}

#[test]
fn collection_handles_share_the_backend() {
    let store = DocumentStore::new(InMemoryStore::new());
    let users = store.collection("users");
    assert_eq!(users.name(), "users");

    users
        .insert_many(vec![Document::new().with("username", "nessus").with("heads", 2)])
        .unwrap();

    let found = store
        .find("users", &Filter::builder().eq("heads", 2).build())
        .unwrap();
    assert_eq!(found, vec![Document::new().with("heads", 2).with("username", "nessus")]);
}

#[test]
fn typed_documents_round_trip() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct User {
        username: String,
        age: i64,
        active: bool,
    }

    let store = DocumentStore::new(InMemoryStore::new());
    let louis = User {
        username: "louiswu".to_string(),
        age: 200,
        active: true,
    };
    store
        .insert_many("users", vec![Document::from_serializable(&louis).unwrap()])
        .unwrap();

    let found = store.query("users", "{active:true}").unwrap();
    let users: Vec<User> = found
        .iter()
        .map(Document::deserialize_into)
        .collect::<DocumentStoreResult<_>>()
        .unwrap();
    assert_eq!(users, vec![louis]);
}
