use docbase::common::Value;
use docbase::doc;
use docbase::docbase::Docbase;
use docbase::errors::DocbaseResult;
use docbase::filter::{Condition, UnknownOperatorPolicy};
use docbase_int_test::test_util::{
    cleanup, create_test_context, insert_test_documents, run_test, strings, TestContext,
};

#[test]
fn test_equality_on_top_level_and_nested_fields() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.docbase().database().collection("test");
            insert_test_documents(&coll)?;

            let ln2 = coll.where_(doc! { last_name: "ln2" }).get()?;
            assert_eq!(strings(&ln2.data, "first_name"), vec!["fn2", "fn3"]);

            let dotted = coll.where_(doc! { "profile.city": "Shanghai" }).get()?;
            assert_eq!(strings(&dotted.data, "first_name"), vec!["fn1"]);

            let scoped = coll.where_(doc! { profile: { city: "Beijing" } }).get()?;
            assert_eq!(strings(&scoped.data, "first_name"), vec!["fn2"]);

            let both = coll.where_(doc! { last_name: "ln2", age: 45 }).get()?;
            assert_eq!(strings(&both.data, "first_name"), vec!["fn3"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_array_values_match_whole_and_by_index() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.docbase().database().collection("test");
            insert_test_documents(&coll)?;

            let whole = coll.where_(doc! { tags: ["three", "four"] }).get()?;
            assert_eq!(strings(&whole.data, "first_name"), vec!["fn2"]);

            let indexed = coll.where_(doc! { "tags.0": "one" }).get()?;
            assert_eq!(strings(&indexed.data, "first_name"), vec!["fn1"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_empty_nested_mapping_matches_empty_document() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.docbase().database().collection("test");
            insert_test_documents(&coll)?;
            assert_eq!(coll.where_(doc! { profile: {} }).count()?.total, 0);

            coll.add(doc! { first_name: "fn4", profile: {} })?;
            let empty = coll.where_(doc! { profile: {} }).get()?;
            assert_eq!(strings(&empty.data, "first_name"), vec!["fn4"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_range_comparisons() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.docbase().database();
            let cmd = db.command();
            let coll = db.collection("test");
            insert_test_documents(&coll)?;

            let adults = coll.where_(doc! { age: (cmd.gt(18)) }).get()?;
            assert_eq!(strings(&adults.data, "first_name"), vec!["fn1", "fn3"]);

            let at_least = coll.where_(doc! { age: (cmd.gte(18)) }).count()?;
            assert_eq!(at_least.total, 3);

            let window = coll
                .where_(doc! { age: (cmd.and([cmd.gte(20), cmd.lte(40)])) })
                .get()?;
            assert_eq!(strings(&window.data, "first_name"), vec!["fn1"]);

            // integers and floats compare as numbers
            let scored = coll.where_(doc! { score: (cmd.lt(4.0)) }).get()?;
            assert_eq!(strings(&scored.data, "first_name"), vec!["fn2"]);

            // strings never compare with numbers
            let mixed = coll.where_(doc! { first_name: (cmd.gt(0)) }).count()?;
            assert_eq!(mixed.total, 0);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_field_level_or() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.docbase().database();
            let cmd = db.command();
            let coll = db.collection("test");
            insert_test_documents(&coll)?;

            let edges = coll
                .where_(doc! { age: (cmd.or([cmd.lt(20), cmd.gt(40)])) })
                .get()?;
            assert_eq!(strings(&edges.data, "first_name"), vec!["fn2", "fn3"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_cross_field_or() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.docbase().database();
            let cmd = db.command();
            let coll = db.collection("test");
            insert_test_documents(&coll)?;

            let either = cmd.or([
                doc! { first_name: "fn1" },
                doc! { age: (cmd.gt(40)) },
            ]);
            let found = coll.where_(either).get()?;
            assert_eq!(strings(&found.data, "first_name"), vec!["fn1", "fn3"]);

            let combined = Condition::field("last_name", Value::from("ln2")).and(doc! { age: (cmd.lt(20)) });
            assert_eq!(coll.where_(combined).count()?.total, 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_in_and_nin() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.docbase().database();
            let cmd = db.command();
            let coll = db.collection("test");
            insert_test_documents(&coll)?;

            let listed = coll.where_(doc! { age: (cmd.in_([18, 45, 99])) }).get()?;
            assert_eq!(strings(&listed.data, "first_name"), vec!["fn2", "fn3"]);

            let excluded = coll.where_(doc! { age: (cmd.nin([18, 45])) }).get()?;
            assert_eq!(strings(&excluded.data, "first_name"), vec!["fn1"]);

            // absent fields are never in a list and always outside one
            let score_in = coll.where_(doc! { score: (cmd.in_([3.0, 4.5])) }).count()?;
            assert_eq!(score_in.total, 2);
            let score_nin = coll.where_(doc! { score: (cmd.nin([3])) }).get()?;
            assert_eq!(strings(&score_nin.data, "first_name"), vec!["fn1", "fn3"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_neq_and_exists_on_absent_fields() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.docbase().database();
            let cmd = db.command();
            let coll = db.collection("test");
            insert_test_documents(&coll)?;
            coll.add(doc! { first_name: "fn4", profile: () })?;

            let not_shanghai = coll
                .where_(doc! { "profile.city": (cmd.neq("Shanghai")) })
                .get()?;
            assert_eq!(
                strings(&not_shanghai.data, "first_name"),
                vec!["fn2", "fn3", "fn4"]
            );

            let with_profile = coll.where_(doc! { profile: (cmd.exists(true)) }).get()?;
            assert_eq!(strings(&with_profile.data, "first_name"), vec!["fn1", "fn2"]);

            let without_profile = coll.where_(doc! { profile: (cmd.exists(false)) }).get()?;
            assert_eq!(strings(&without_profile.data, "first_name"), vec!["fn3", "fn4"]);

            // null is a value, absence is not
            let null_profile = coll.where_(doc! { profile: () }).get()?;
            assert_eq!(strings(&null_profile.data, "first_name"), vec!["fn4"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_regex() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.docbase().database();
            let coll = db.collection("test");
            insert_test_documents(&coll)?;

            let quick = coll.where_(doc! { body: (db.reg_exp("^quick", "")) }).get()?;
            assert_eq!(strings(&quick.data, "first_name"), vec!["fn2"]);

            let lorem = coll.where_(doc! { body: (db.reg_exp("LOREM", "i")) }).get()?;
            assert_eq!(strings(&lorem.data, "first_name"), vec!["fn3"]);

            let case_sensitive = coll.where_(doc! { body: (db.reg_exp("LOREM", "")) }).count()?;
            assert_eq!(case_sensitive.total, 0);

            // non-string values never match
            let numbers = coll.where_(doc! { age: (db.reg_exp("1", "")) }).count()?;
            assert_eq!(numbers.total, 0);

            // an invalid pattern matches nothing
            let broken = coll.where_(doc! { body: (db.reg_exp("(", "")) }).count()?;
            assert_eq!(broken.total, 0);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_unknown_operator_matches_all_by_default() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.docbase().database().collection("test");
            insert_test_documents(&coll)?;

            let unknown = coll.where_(doc! { age: { __cmd: "near", value: 1 } });
            assert_eq!(unknown.count()?.total, 3);
            Ok(())
        },
        cleanup,
    )
}

fn create_strict_context() -> DocbaseResult<TestContext> {
    let docbase = Docbase::builder()
        .unknown_operator_policy(UnknownOperatorPolicy::MatchNone)
        .open()?;
    Ok(TestContext::new(docbase))
}

#[test]
fn test_unknown_operator_can_match_none() {
    run_test(
        create_strict_context,
        |ctx| {
            let coll = ctx.docbase().database().collection("test");
            insert_test_documents(&coll)?;

            let unknown = coll.where_(doc! { age: { __cmd: "near", value: 1 } });
            assert_eq!(unknown.count()?.total, 0);
            assert_eq!(unknown.remove()?.stats.removed, 0);
            assert_eq!(coll.count()?.total, 3);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_malformed_operator_is_rejected() {
    run_test(
        create_test_context,
        |ctx| {
            let coll = ctx.docbase().database().collection("test");
            insert_test_documents(&coll)?;

            let malformed = coll.where_(doc! { age: { __cmd: "in", values: 3 } });
            assert_eq!(malformed.get().unwrap_err().code(), "INVALID_PARAM");
            assert_eq!(malformed.remove().unwrap_err().code(), "INVALID_PARAM");
            assert_eq!(coll.count()?.total, 3);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_conditions_parse_from_json() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.docbase().database();
            let coll = db.collection("test");
            insert_test_documents(&coll)?;

            let wire = db.command().gte(31).to_value().to_json();
            let json = serde_json::json!({ "age": wire, "last_name": "ln2" });
            let condition = docbase::collection::Document::try_from(json)?;
            let found = coll.where_(condition).get()?;
            assert_eq!(strings(&found.data, "first_name"), vec!["fn3"]);
            Ok(())
        },
        cleanup,
    )
}
