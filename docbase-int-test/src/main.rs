use docbase::doc;
use docbase::docbase::Docbase;
use docbase::errors::DocbaseResult;
use docbase_int_test::test_util::join_all;
use rand::Rng;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Instant;

const THREADS: usize = 8;
const WRITES_PER_THREAD: usize = 5_000;

fn main() -> DocbaseResult<()> {
    let _ = colog::default_builder().try_init();
    println!("Starting stress test...");

    let docbase = Docbase::new();
    let db = docbase.database();
    let counters = db.collection("counters");
    counters.doc("total").set(doc! { hits: 0 })?;

    let start = Instant::now();
    let barrier = Arc::new(Barrier::new(THREADS));
    let mut handles = Vec::with_capacity(THREADS);

    for thread_id in 0..THREADS {
        let db = docbase.database();
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || -> DocbaseResult<()> {
            let mut rng = rand::rng();
            let events = db.collection("events");
            let counters = db.collection("counters");
            barrier.wait();

            for seq in 0..WRITES_PER_THREAD {
                let score: i64 = rng.random_range(0..1_000);
                events.add(doc! { thread: thread_id, seq: seq, score: score })?;
                counters
                    .doc("total")
                    .update(doc! { hits: (db.command().inc(1)) })?;
            }
            Ok(())
        }));
    }

    join_all(handles)?;

    let events = db.collection("events");
    let total = events.count()?.total;
    let hits = counters.doc("total").get()?.data;
    let top = events.order_by("score", "desc").limit(3).get()?;

    println!("Wrote {} events in {:?}", total, start.elapsed());
    println!("Counter: {}", hits);
    for doc in top.data {
        println!("Top: {}", doc);
    }

    let removed = events
        .where_(doc! { score: (db.command().lt(500)) })
        .remove()?
        .stats
        .removed;
    println!(
        "Removed {} low scores, {} left",
        removed,
        events.count()?.total
    );

    Ok(())
}
