use docbase::collection::{CollectionRef, Document};
use docbase::common::Value;
use docbase::doc;
use docbase::docbase::Docbase;
use docbase::errors::{DocbaseError, DocbaseResult, ErrorKind};
use std::backtrace::Backtrace;
use std::thread::JoinHandle;
use std::time::Instant;

/// Runs a test between its `before` and `after` steps.
///
/// `after` runs even when the test fails. Failures and panics are reported
/// with the elapsed time and a backtrace, then re-raised as a panic.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> DocbaseResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> DocbaseResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> DocbaseResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    let start_time = Instant::now();

    let result = std::panic::catch_unwind(|| {
        let backtrace = Backtrace::capture();
        match before() {
            Ok(ctx) => match test(ctx.clone()) {
                Ok(_) => match after(ctx) {
                    Ok(_) => Ok(()),
                    Err(e) => Err((format!("After run failed: {:?}", e), backtrace.to_string())),
                },
                Err(e) => {
                    let _ = after(ctx);
                    Err((format!("Test failed: {:?}", e), backtrace.to_string()))
                }
            },
            Err(e) => Err((format!("Before run failed: {:?}", e), backtrace.to_string())),
        }
    });

    let elapsed = start_time.elapsed();

    let (error, backtrace) = match result {
        Ok(Ok(_)) => return,
        Ok(Err((e, bt))) => (e, bt),
        Err(panic_err) => {
            let err_msg = if let Some(s) = panic_err.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_err.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            (format!("Panic: {}", err_msg), Backtrace::capture().to_string())
        }
    };

    eprintln!("\n==================== TEST FAILED ====================");
    eprintln!("Failed after {:?}", elapsed);
    eprintln!("Error: {}", error);
    if !backtrace.is_empty() && !backtrace.contains("disabled") {
        eprintln!("\nBacktrace:\n{}", backtrace);
    }
    eprintln!("=====================================================\n");

    panic!("Test failed. Last error: {}", error);
}

#[derive(Clone)]
pub struct TestContext {
    docbase: Docbase,
}

impl TestContext {
    pub fn new(docbase: Docbase) -> Self {
        Self { docbase }
    }

    pub fn docbase(&self) -> Docbase {
        self.docbase.clone()
    }
}

/// A fresh instance with the default configuration.
pub fn create_test_context() -> DocbaseResult<TestContext> {
    let docbase = Docbase::builder().open()?;
    Ok(TestContext::new(docbase))
}

pub fn cleanup(ctx: TestContext) -> DocbaseResult<()> {
    ctx.docbase().reset();
    Ok(())
}

pub fn create_test_docs() -> Vec<Document> {
    let doc1 = doc! {
        first_name: "fn1",
        last_name: "ln1",
        age: 31,
        score: 4.5,
        tags: ["one", "two", "three"],
        profile: { city: "Shanghai", phone: "111" },
        body: "a quick brown fox jump over the lazy dog",
    };

    let doc2 = doc! {
        first_name: "fn2",
        last_name: "ln2",
        age: 18,
        score: 3,
        tags: ["three", "four"],
        profile: { city: "Beijing" },
        body: "quick hello world from docbase",
    };

    let doc3 = doc! {
        first_name: "fn3",
        last_name: "ln2",
        age: 45,
        tags: [],
        body: "Lorem ipsum dolor sit amet, consectetur \
        adipiscing elit. Sed nunc mi, mattis ullamcorper \
        dignissim vitae, condimentum non lorem.",
    };

    vec![doc1, doc2, doc3]
}

/// Adds the test documents and returns their ids in insertion order.
pub fn insert_test_documents(collection: &CollectionRef) -> DocbaseResult<Vec<String>> {
    let mut ids = Vec::new();
    for doc in create_test_docs() {
        ids.push(collection.add(doc)?.id);
    }
    Ok(ids)
}

/// The string values of `field` across `docs`, in order.
pub fn strings(docs: &[Document], field: &str) -> Vec<String> {
    docs.iter()
        .filter_map(|doc| doc.get(field).and_then(Value::as_str).map(str::to_string))
        .collect()
}

/// The integer values of `field` across `docs`, in order.
pub fn integers(docs: &[Document], field: &str) -> Vec<i64> {
    docs.iter()
        .filter_map(|doc| doc.get(field).and_then(Value::as_i64))
        .collect()
}

/// Joins every worker and collects their results. A panicked worker or a
/// worker error fails the whole run, after all workers have finished.
pub fn join_all<T>(handles: Vec<JoinHandle<DocbaseResult<T>>>) -> DocbaseResult<Vec<T>> {
    let mut results = Vec::with_capacity(handles.len());
    let mut failure = None;
    for handle in handles {
        match handle.join() {
            Ok(Ok(value)) => results.push(value),
            Ok(Err(e)) => {
                failure.get_or_insert(e);
            }
            Err(_) => {
                log::error!("Worker thread panicked");
                failure.get_or_insert(DocbaseError::new(
                    "Worker thread panicked",
                    ErrorKind::InternalError,
                ));
            }
        }
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(results),
    }
}
