use docbase::doc;
use docbase_int_test::test_util::{cleanup, create_test_context, insert_test_documents, run_test};

#[test]
fn test_include_projection_keeps_id() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.docbase().database().collection("test");
            let ids = insert_test_documents(&coll)?;

            let result = coll
                .where_(doc! { first_name: "fn1" })
                .field(doc! { first_name: true, "profile.city": 1 })
                .get()?;
            assert_eq!(
                result.data,
                vec![doc! {
                    _id: (ids[0].as_str()),
                    first_name: "fn1",
                    profile: { city: "Shanghai" }
                }]
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_include_projection_without_id() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.docbase().database().collection("test");
            insert_test_documents(&coll)?;

            let result = coll
                .order_by("age", "asc")
                .field(doc! { age: 1, _id: false })
                .get()?;
            assert_eq!(
                result.data,
                vec![doc! { age: 18 }, doc! { age: 31 }, doc! { age: 45 }]
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_exclude_projection() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.docbase().database().collection("test");
            let ids = insert_test_documents(&coll)?;

            let result = coll
                .where_(doc! { first_name: "fn2" })
                .field(doc! { body: false, tags: 0, "profile.city": false })
                .get()?;
            assert_eq!(
                result.data,
                vec![doc! {
                    _id: (ids[1].as_str()),
                    first_name: "fn2",
                    last_name: "ln2",
                    age: 18,
                    score: 3,
                    profile: {}
                }]
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_projection_does_not_touch_storage() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.docbase().database().collection("test");
            let ids = insert_test_documents(&coll)?;

            coll.field(doc! { first_name: 1 }).get()?;
            let stored = coll.doc(&ids[2]).get()?.data;
            assert!(stored.contains_key("body"));
            assert!(stored.contains_key("tags"));
            Ok(())
        },
        cleanup,
    )
}
