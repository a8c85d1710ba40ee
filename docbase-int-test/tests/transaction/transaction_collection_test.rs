use docbase::common::Value;
use docbase::doc;
use docbase::errors::{DocbaseError, ErrorKind};
use docbase_int_test::test_util::{cleanup, create_test_context, run_test};

#[test]
fn test_transaction_returns_handler_result() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.docbase().database();
            db.collection("accounts").doc("a").set(doc! { balance: 100 })?;
            db.collection("accounts").doc("b").set(doc! { balance: 0 })?;

            let cmd = db.command();
            let moved = db.run_transaction(|tx| {
                let accounts = tx.collection("accounts");
                accounts.doc("a").update(doc! { balance: (cmd.inc(-30)) })?;
                accounts.doc("b").update(doc! { balance: (cmd.inc(30)) })?;
                Ok(30)
            })?;
            assert_eq!(moved, 30);

            let accounts = db.collection("accounts");
            assert_eq!(accounts.doc("a").get()?.data.get("balance"), Some(&Value::I64(70)));
            assert_eq!(accounts.doc("b").get()?.data.get("balance"), Some(&Value::I64(30)));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_transaction_writes_are_visible_immediately() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.docbase().database();
            let outside = db.collection("orders");

            db.run_transaction(|tx| {
                let orders = tx.collection("orders");
                let id = orders.add(doc! { total: 5 })?.id;
                assert_eq!(outside.doc(&id).get()?.data.get("total"), Some(&Value::I64(5)));
                assert_eq!(orders.count()?.total, 1);
                Ok(())
            })?;
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_transaction_failure_keeps_earlier_writes() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.docbase().database();

            let result: Result<(), DocbaseError> = db.run_transaction(|tx| {
                let orders = tx.collection("orders");
                orders.doc("o1").set(doc! { state: "paid" })?;
                orders.doc("missing").update(doc! { state: "shipped" })?;
                orders.doc("o2").set(doc! { state: "never" })?;
                Ok(())
            });

            let err = result.unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::DocumentNotFound);

            let orders = db.collection("orders");
            assert_eq!(orders.doc("o1").get()?.data.get("state"), Some(&Value::from("paid")));
            assert!(orders.doc("o2").get().is_err());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_transaction_handler_error_is_returned() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.docbase().database();

            let result: Result<usize, DocbaseError> = db.run_transaction(|tx| {
                let stock = tx.collection("stock").where_(doc! { sku: "x" }).count()?;
                if stock.total == 0 {
                    return Err(DocbaseError::new("out of stock", ErrorKind::InvalidParameter));
                }
                Ok(stock.total)
            });

            let err = result.unwrap_err();
            assert_eq!(err.code(), "INVALID_PARAM");
            assert_eq!(err.message(), "out of stock");
            Ok(())
        },
        cleanup,
    )
}
