//! Runs the tours against a real server. Start one on 127.0.0.1:6379 and use
//! `cargo test -- --ignored`; every test works in database 15 and empties it first.

use redis::aio::MultiplexedConnection;
use redis::RedisError;
use resp_tour::config::{Endpoint, Target};
use resp_tour::connection::Session;
use resp_tour::runner::{Report, RunEnd, Runner};
use resp_tour::tours::Tour;
use serial_test::serial;

const DB: i64 = 15;

async fn fresh_session() -> Result<Session<MultiplexedConnection>, RedisError> {
    let endpoint = Endpoint::new("127.0.0.1", Target::Redis, None, DB);
    let mut session = Session::open(&endpoint).await?;

    // Tests share one server, so each one starts from an empty database.
    session.flush().await?;

    Ok(session)
}

async fn run(tour: Tour) -> Report {
    let session = fresh_session().await.unwrap();

    Runner::new(session)
        .with_output(std::io::sink())
        .run(&tour.script())
        .await
}

async fn run_and_verify(tour: Tour) {
    let script = tour.script();
    let report = run(tour).await;

    assert!(
        !report.is_aborted(),
        "{} aborted: {:?}",
        tour,
        report.end()
    );
    assert_eq!(script.verify(report.transcript()), Ok(()), "{}", tour);
}

#[tokio::test]
#[serial]
#[ignore = "requires a Redis server on 127.0.0.1:6379"]
async fn hash_tour() {
    run_and_verify(Tour::Hash).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires a Redis server on 127.0.0.1:6379"]
async fn integer_tour() {
    run_and_verify(Tour::Integer).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires a Redis server on 127.0.0.1:6379"]
async fn list_tour() {
    run_and_verify(Tour::List).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires a Redis server on 127.0.0.1:6379"]
async fn set_tour() {
    run_and_verify(Tour::Set).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires a Redis server on 127.0.0.1:6379"]
async fn sorted_set_tour() {
    run_and_verify(Tour::SortedSet).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires a Redis server on 127.0.0.1:6379"]
async fn string_tour() {
    run_and_verify(Tour::String).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires a Redis server on 127.0.0.1:6379"]
async fn fresh_runs_produce_identical_entries() {
    // The string and integer tours poll for expiry, so their wait loops may run a different
    // number of times.
    for tour in [Tour::Hash, Tour::List, Tour::SortedSet] {
        let first = run(tour).await;
        let second = run(tour).await;

        assert_eq!(first.entries(), second.entries(), "{}", tour);
        assert_eq!(first.entries().len(), tour.script().steps.len(), "{}", tour);
    }
}

#[tokio::test]
#[serial]
#[ignore = "requires a Redis server on 127.0.0.1:6379"]
async fn rerun_without_flush_takes_the_failure_branches() {
    let first = run(Tour::Hash).await;
    assert!(matches!(first.end(), RunEnd::Completed));

    // Same data again: the first write finds the field already set.
    let session = Session::open(&Endpoint::new("127.0.0.1", Target::Redis, None, DB))
        .await
        .unwrap();
    let report = Runner::new(session)
        .with_output(std::io::sink())
        .run(&Tour::Hash.script())
        .await;

    assert!(matches!(report.end(), RunEnd::Completed));
    assert_eq!(report.transcript()[1], "Unable to hset: user:id=bob (0)");
}

#[tokio::test]
#[serial]
#[ignore = "requires a Redis server on 127.0.0.1:6379"]
async fn unreachable_server_fails_to_open() {
    // Nothing listens on port 1.
    let endpoint = Endpoint::new("127.0.0.1", Target::Redis, Some(1), DB);

    let err = Session::open(&endpoint).await.err().unwrap();

    assert!(resp_tour::connection::is_fatal(&err));
}
