use docbase::common::Value;
use docbase::doc;
use docbase_int_test::test_util::{cleanup, create_test_context, insert_test_documents, run_test};

#[test]
fn test_add_then_get() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.docbase().database().collection("users");
            let added = users.add(doc! { name: "A", age: 5 })?;

            assert_eq!(added.id, "mock-1");
            assert_eq!(added._id, added.id);

            let found = users.doc(&added.id).get()?;
            assert_eq!(found.data, doc! { _id: "mock-1", name: "A", age: 5 });
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_generated_ids_increase() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.docbase().database();
            let ids = insert_test_documents(&db.collection("test"))?;
            assert_eq!(ids, vec!["mock-1", "mock-2", "mock-3"]);

            // the counter is shared between collections
            let other = db.collection("other").add(doc! { a: 1 })?;
            assert_eq!(other.id, "mock-4");
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_add_with_explicit_id() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.docbase().database().collection("users");
            let added = users.add(doc! { _id: "alice", name: "Alice" })?;
            assert_eq!(added.id, "alice");

            let duplicate = users.add(doc! { _id: "alice", name: "Other" });
            assert_eq!(duplicate.unwrap_err().code(), "DUPLICATE_KEY");

            let bad_id = users.add(doc! { _id: 42 });
            assert_eq!(bad_id.unwrap_err().code(), "INVALID_PARAM");

            assert_eq!(users.count()?.total, 1);
            assert_eq!(
                users.doc("alice").get()?.data.get("name"),
                Some(&Value::from("Alice"))
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_generated_id_skips_taken_ids() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.docbase().database().collection("users");
            users.add(doc! { _id: "mock-1" })?;
            let added = users.add(doc! { name: "B" })?;
            assert_eq!(added.id, "mock-2");
            assert_eq!(users.count()?.total, 2);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_get_missing_document() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.docbase().database().collection("users");
            let err = users.doc("nope").get().unwrap_err();
            assert_eq!(err.code(), "DOCUMENT_NOT_FOUND");
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_set_creates_and_replaces() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.docbase().database().collection("users");
            let doc_ref = users.doc("u1");

            let created = doc_ref.set(doc! { a: 1, b: { c: 2 } })?;
            assert_eq!(created.stats.updated, 0);
            assert_eq!(created.stats.created, Some(1));

            let replaced = doc_ref.set(doc! { z: true, _id: "ignored" })?;
            assert_eq!(replaced.stats.updated, 1);
            assert_eq!(replaced.stats.created, Some(0));

            assert_eq!(doc_ref.get()?.data, doc! { _id: "u1", z: true });
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_returned_documents_are_copies() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.docbase().database().collection("users");
            let mut data = doc! { name: "A", tags: ["x"] };
            let id = users.add(data.clone())?.id;

            data.put("name", "changed");
            let mut first = users.doc(&id).get()?.data;
            first.put("tags", Value::from_vec(vec!["y", "z"]));
            first.remove("name");

            let second = users.doc(&id).get()?.data;
            assert_eq!(second, doc! { _id: (id.as_str()), name: "A", tags: ["x"] });

            let mut listed = users.get()?.data;
            listed[0].put("name", "mutated");
            assert_eq!(users.doc(&id).get()?.data.get("name"), Some(&Value::from("A")));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_collections_are_independent() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.docbase().database();
            db.collection("a").doc("same").set(doc! { from: "a" })?;
            db.collection("b").doc("same").set(doc! { from: "b" })?;

            assert_eq!(
                db.collection("a").doc("same").get()?.data.get("from"),
                Some(&Value::from("a"))
            );
            db.collection("a").remove()?;
            assert_eq!(db.collection("b").count()?.total, 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_referencing_creates_collection() {
    run_test(
        create_test_context,
        |ctx| {
            let docbase = ctx.docbase();
            let db = docbase.database();
            assert!(docbase.collection_names().is_empty());

            let _ = db.collection("logs");
            assert!(!db.create_collection("logs"));
            assert!(db.create_collection("audit"));
            assert_eq!(docbase.collection_names(), vec!["audit", "logs"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_seed_and_peek() {
    run_test(
        create_test_context,
        |ctx| {
            let docbase = ctx.docbase();
            docbase.seed_document("orders", "o1", doc! { total: 12.5 });

            let db = docbase.database();
            let order = db.collection("orders").doc("o1").get()?.data;
            assert_eq!(order, doc! { _id: "o1", total: 12.5 });

            db.collection("orders").doc("o1").update(doc! { paid: true })?;
            let peeked = docbase.peek_document("orders", "o1");
            assert_eq!(peeked, Some(doc! { _id: "o1", total: 12.5, paid: true }));

            assert!(docbase.delete_document("orders", "o1"));
            assert!(!docbase.delete_document("orders", "o1"));
            assert!(docbase.peek_document("orders", "o1").is_none());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_reset_restarts_ids() {
    run_test(
        create_test_context,
        |ctx| {
            let docbase = ctx.docbase();
            let users = docbase.database().collection("users");
            users.add(doc! { a: 1 })?;
            users.add(doc! { a: 2 })?;

            docbase.reset();
            assert!(docbase.collection_names().is_empty());

            let added = docbase.database().collection("users").add(doc! { a: 3 })?;
            assert_eq!(added.id, "mock-1");
            Ok(())
        },
        cleanup,
    )
}
