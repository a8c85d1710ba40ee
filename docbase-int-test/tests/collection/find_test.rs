use docbase::doc;
use docbase::docbase::Docbase;
use docbase::errors::DocbaseResult;
use docbase_int_test::test_util::{
    cleanup, create_test_context, insert_test_documents, integers, run_test, strings, TestContext,
};

#[test]
fn test_find_with_in() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.docbase().database();
            let scores = db.collection("scores");
            scores.add(doc! { score: 1 })?;
            scores.add(doc! { score: 3 })?;

            let cmd = db.command();
            let both = scores.where_(doc! { score: (cmd.in_([1, 3])) }).get()?;
            assert_eq!(both.data.len(), 2);

            let none = scores.where_(doc! { score: (cmd.in_([2])) }).get()?;
            assert!(none.data.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_order_by_desc_limit_one() {
    run_test(
        create_test_context,
        |ctx| {
            let posts = ctx.docbase().database().collection("posts");
            for created_at in [2, 3, 1] {
                posts.add(doc! { createdAt: created_at })?;
            }

            let latest = posts.order_by("createdAt", "desc").limit(1).get()?;
            assert_eq!(integers(&latest.data, "createdAt"), vec![3]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_find_all_keeps_insertion_order() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.docbase().database().collection("test");
            insert_test_documents(&coll)?;

            let all = coll.get()?;
            assert_eq!(strings(&all.data, "first_name"), vec!["fn1", "fn2", "fn3"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_multi_key_sort_is_stable() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.docbase().database().collection("test");
            insert_test_documents(&coll)?;

            let sorted = coll
                .order_by("last_name", "desc")
                .order_by("age", "asc")
                .get()?;
            assert_eq!(strings(&sorted.data, "first_name"), vec!["fn2", "fn3", "fn1"]);

            // equal keys keep their stored order
            let by_last = coll.order_by("last_name", "asc").get()?;
            assert_eq!(strings(&by_last.data, "first_name"), vec!["fn1", "fn2", "fn3"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_sort_treats_missing_as_zero() {
    run_test(
        create_test_context,
        |ctx| {
            let items = ctx.docbase().database().collection("items");
            items.add(doc! { name: "neg", rank: (-1) })?;
            items.add(doc! { name: "missing" })?;
            items.add(doc! { name: "pos", rank: 1 })?;
            items.add(doc! { name: "null", rank: () })?;

            let asc = items.order_by("rank", "asc").get()?;
            assert_eq!(
                strings(&asc.data, "name"),
                vec!["neg", "missing", "null", "pos"]
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_sort_by_nested_field() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.docbase().database().collection("test");
            insert_test_documents(&coll)?;

            let sorted = coll
                .where_(doc! { profile: (ctx.docbase().database().command().exists(true)) })
                .order_by("profile.city", "asc")
                .get()?;
            assert_eq!(strings(&sorted.data, "first_name"), vec!["fn2", "fn1"]);
            Ok(())
        },
        cleanup,
    )
}

fn paged(ctx: &TestContext) -> DocbaseResult<()> {
    let items = ctx.docbase().database().collection("items");
    for n in 0..10 {
        items.add(doc! { n: n })?;
    }
    let ordered = items.order_by("n", "asc");

    assert_eq!(integers(&ordered.skip(3).limit(4).get()?.data, "n"), vec![3, 4, 5, 6]);
    assert_eq!(integers(&ordered.skip(8).limit(4).get()?.data, "n"), vec![8, 9]);
    assert!(ordered.skip(10).get()?.data.is_empty());
    assert!(ordered.limit(0).get()?.data.is_empty());

    // the order of builder calls does not change the pipeline
    assert_eq!(
        integers(&items.limit(2).skip(1).order_by("n", "desc").get()?.data, "n"),
        vec![8, 7]
    );
    Ok(())
}

#[test]
fn test_skip_and_limit() {
    run_test(create_test_context, |ctx| paged(&ctx), cleanup)
}

#[test]
fn test_builders_are_immutable() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.docbase().database().collection("test");
            insert_test_documents(&coll)?;

            let base = coll.where_(doc! { last_name: "ln2" });
            let first = base.order_by("age", "desc").limit(1);
            let rest = base.order_by("age", "desc").skip(1);

            assert_eq!(base.count()?.total, 2);
            assert_eq!(strings(&first.get()?.data, "first_name"), vec!["fn3"]);
            assert_eq!(strings(&rest.get()?.data, "first_name"), vec!["fn2"]);
            assert_eq!(strings(&base.get()?.data, "first_name"), vec!["fn2", "fn3"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_where_replaces_filter() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.docbase().database().collection("test");
            insert_test_documents(&coll)?;

            let query = coll.where_(doc! { first_name: "fn1" }).where_(doc! { last_name: "ln2" });
            assert_eq!(query.count()?.total, 2);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_invalid_sort_direction() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.docbase().database().collection("test");
            insert_test_documents(&coll)?;

            let query = coll.order_by("age", "upward");
            assert_eq!(query.get().unwrap_err().code(), "INVALID_PARAM");
            assert_eq!(query.count().unwrap_err().code(), "INVALID_PARAM");
            assert_eq!(query.remove().unwrap_err().code(), "INVALID_PARAM");
            assert_eq!(coll.count()?.total, 3);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_count_ignores_pagination() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.docbase().database().collection("test");
            insert_test_documents(&coll)?;

            let query = coll.where_(doc! { last_name: "ln2" }).skip(1).limit(1);
            assert_eq!(query.count()?.total, 2);
            assert_eq!(query.get()?.data.len(), 1);
            Ok(())
        },
        cleanup,
    )
}

fn create_limited_context() -> DocbaseResult<TestContext> {
    let docbase = Docbase::builder().max_limit(3).open()?;
    Ok(TestContext::new(docbase))
}

#[test]
fn test_max_limit() {
    run_test(
        create_limited_context,
        |ctx| {
            let items = ctx.docbase().database().collection("items");
            for n in 0..5 {
                items.add(doc! { n: n })?;
            }
            assert_eq!(items.get()?.data.len(), 3);
            assert_eq!(items.limit(100).get()?.data.len(), 3);
            assert_eq!(items.limit(2).get()?.data.len(), 2);
            assert_eq!(items.count()?.total, 5);
            Ok(())
        },
        cleanup,
    )
}
