use std::time::Duration;

use crate::command::{Command, Shape};
use crate::script::{Next, Script, Step};

const CA: &str = "state:usps=ca";
const NY: &str = "state:usps=ny";
const CO: &str = "state:usps=co";
const OH: &str = "state:usps=oh";
const IA: &str = "state:usps=ia";
const UT: &str = "state:usps=ut";
const AL: &str = "state:usps=al";
const KS: &str = "state:usps=ks";

fn set(label: &'static str, key: &'static str, value: &'static str) -> Step {
    Step::new(label, Command::new("SET", Shape::Status).arg(key).arg(value))
        .accepted("set: {0} {1}")
        .rejected("Unable to set: {0} {1}")
}

fn get(label: &'static str, key: &'static str) -> Step {
    Step::new(label, Command::new("GET", Shape::Text).arg(key))
        .accepted("get: {0} {reply}")
        .rejected("Unable to get: {0}")
}

/// US state names keyed by postal code: a typo fixed in place, a state name built up in two parts,
/// conditional writes that are turned down and keys that expire.
///
/// Ref: <https://redis.io/docs/latest/develop/data-types/strings/>
pub fn script() -> Script {
    Script::new("string")
        .step(set("set-california", CA, "California"))
        .step(set("set-new-york", NY, "New York"))
        .step(set("set-colorado-with-typo", CO, "Xolorado"))
        .step(
            Step::new(
                "fix-colorado",
                Command::new("SETRANGE", Shape::Integer)
                    .arg(CO)
                    .arg(0)
                    .arg("C"),
            )
            .accepted("updated: {0}")
            .rejected("Unable to setrange: {0}"),
        )
        .step(get("get-colorado", CO))
        .step(
            Step::new(
                "new-york-suffix",
                Command::new("GETRANGE", Shape::Text).arg(NY).arg(4).arg(-1),
            )
            .accepted("getrange: {0} {reply}")
            .rejected("Unable to getrange: {0}"),
        )
        .step(
            Step::new("new-york-length", Command::new("STRLEN", Shape::Integer).arg(NY))
                .accepted("strlen: {0} {reply}")
                .rejected("Unable to strlen: {0}"),
        )
        .step(
            Step::new(
                "set-ohio-and-iowa",
                Command::new("MSET", Shape::Status)
                    .arg(OH)
                    .arg("Ohio")
                    .arg(IA)
                    .arg("Iow"),
            )
            .accepted("mset: {reply}")
            .rejected("Unable to mset: {reply}"),
        )
        .step(
            Step::new(
                "fix-iowa",
                Command::new("APPEND", Shape::Integer).arg(IA).arg("a"),
            )
            .accepted("append: {0} {reply}")
            .rejected("Unable to append: {0}"),
        )
        .step(
            Step::new(
                "get-several",
                Command::new("MGET", Shape::List).arg(CA).arg(IA).arg(NY),
            )
            .accepted("mget: {reply}")
            .rejected("Unable to mget"),
        )
        .step(
            Step::new(
                "rename-colorado",
                Command::new("SETNX", Shape::Integer).arg(CO).arg("Wrong name"),
            )
            .accepted("setnx: {0} {reply}")
            .rejected("Unable to setnx: key {0} already exists")
            .on_success(Next::Stop)
            .on_failure(Next::Continue),
        )
        .step(
            Step::new(
                "set-iowa-and-utah",
                Command::new("MSETNX", Shape::Integer)
                    .arg(IA)
                    .arg("Iowa")
                    .arg(UT)
                    .arg("Utah"),
            )
            .accepted("msetnx: {reply}")
            .rejected("Unable to msetnx: a key already exists")
            .on_success(Next::Stop)
            .on_failure(Next::Continue),
        )
        .step(
            Step::new(
                "set-alabama-for-a-second",
                Command::new("SETEX", Shape::Status)
                    .arg(AL)
                    .arg(1)
                    .arg("Alabama"),
            )
            .accepted("set: {0} {2}")
            .rejected("Unable to setex: {0}"),
        )
        .step(get("get-alabama", AL).on_failure(Next::Goto("set-kansas-briefly")))
        .step(
            get("await-alabama-expiry", AL)
                .note("Waiting 2 seconds for key to expire...")
                .delay(Duration::from_secs(2))
                .on_success(Next::Goto("await-alabama-expiry"))
                .on_failure(Next::Continue),
        )
        .step(
            Step::new(
                "set-kansas-briefly",
                Command::new("PSETEX", Shape::Status)
                    .arg(KS)
                    .arg(100)
                    .arg("Kansas"),
            )
            .accepted("set: {0} {2}")
            .rejected("Unable to psetex: {0}"),
        )
        .step(get("get-kansas", KS).on_failure(Next::Goto("rename-california")))
        .step(
            get("await-kansas-expiry", KS)
                .note("Waiting 1 second for key to expire...")
                .delay(Duration::from_secs(1))
                .on_success(Next::Goto("await-kansas-expiry"))
                .on_failure(Next::Continue),
        )
        .step(
            Step::new(
                "rename-california",
                Command::new("GETSET", Shape::Text)
                    .arg(CA)
                    .arg("California, USA"),
            )
            .accepted("getset: {0} was {reply}\ngetset: {0} is now {1}")
            .rejected("Unable to getset: {0}"),
        )
        .expect_line("set: state:usps=ca California")
        .expect_line("set: state:usps=ny New York")
        .expect_line("set: state:usps=co Xolorado")
        .expect_line("updated: state:usps=co")
        .expect_line("get: state:usps=co Colorado")
        .expect_line("getrange: state:usps=ny York")
        .expect_line("strlen: state:usps=ny 8")
        .expect_line("mset: OK")
        .expect_line("append: state:usps=ia 4")
        .expect_line("mget: California,Iowa,New York")
        .expect_line("Unable to setnx: key state:usps=co already exists")
        .expect_line("Unable to msetnx: a key already exists")
        .expect_line("set: state:usps=al Alabama")
        .expect_line("get: state:usps=al Alabama")
        .expect_line("Waiting 2 seconds for key to expire...")
        .expect_line("Unable to get: state:usps=al")
        .expect_line("set: state:usps=ks Kansas")
        .expect_line("get: state:usps=ks Kansas")
        .expect_line("Waiting 1 second for key to expire...")
        .expect_line("Unable to get: state:usps=ks")
        .expect_line("getset: state:usps=ca was California")
        .expect_line("getset: state:usps=ca is now California, USA")
}

#[cfg(test)]
mod tests {
    use redis::Value;

    use super::*;
    use crate::connection::fake::{array, data, FakeTransport};
    use crate::connection::Session;
    use crate::runner::{RunEnd, Runner};

    fn replies() -> Vec<(&'static str, Value)> {
        vec![
            ("SET state:usps=ca California", Value::Okay),
            ("SET state:usps=ny New York", Value::Okay),
            ("SET state:usps=co Xolorado", Value::Okay),
            ("SETRANGE state:usps=co 0 C", Value::Int(8)),
            ("GET state:usps=co", data("Colorado")),
            ("GETRANGE state:usps=ny 4 -1", data("York")),
            ("STRLEN state:usps=ny", Value::Int(8)),
            ("MSET state:usps=oh Ohio state:usps=ia Iow", Value::Okay),
            ("APPEND state:usps=ia a", Value::Int(4)),
            (
                "MGET state:usps=ca state:usps=ia state:usps=ny",
                array(&["California", "Iowa", "New York"]),
            ),
            ("SETNX state:usps=co Wrong name", Value::Int(0)),
            ("MSETNX state:usps=ia Iowa state:usps=ut Utah", Value::Int(0)),
            ("SETEX state:usps=al 1 Alabama", Value::Okay),
            ("GET state:usps=al", data("Alabama")),
            ("GET state:usps=al", Value::Nil),
            ("PSETEX state:usps=ks 100 Kansas", Value::Okay),
            ("GET state:usps=ks", data("Kansas")),
            ("GET state:usps=ks", Value::Nil),
            ("GETSET state:usps=ca California, USA", data("California")),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn transcript_matches_expected() {
        let script = script();
        let mut runner = Runner::new(Session::new(FakeTransport::replay(replies())))
            .with_output(std::io::sink());

        let report = runner.run(&script).await;

        assert!(matches!(report.end(), RunEnd::Completed));
        assert_eq!(script.verify(report.transcript()), Ok(()));
        assert_eq!(report.entries().len(), 19);
    }

    #[tokio::test]
    async fn failed_set_names_key_and_value() {
        let transport = FakeTransport::new(|_, _| {
            Err(redis::RedisError::from((
                redis::ErrorKind::ResponseError,
                "An error was signalled by the server",
                "OOM command not allowed when used memory > 'maxmemory'".to_string(),
            )))
        });
        let mut runner = Runner::new(Session::new(transport)).with_output(std::io::sink());

        let report = runner.run(&script()).await;

        assert!(matches!(
            report.end(),
            RunEnd::Stopped {
                label: "set-california"
            }
        ));
        assert_eq!(
            report.transcript(),
            &["Unable to set: state:usps=ca California"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn slow_expiry_waits_again() {
        let mut replies = replies();
        replies.insert(14, ("GET state:usps=al", data("Alabama")));
        let mut runner = Runner::new(Session::new(FakeTransport::replay(replies)))
            .with_output(std::io::sink());

        let report = runner.run(&script()).await;

        assert!(matches!(report.end(), RunEnd::Completed));
        assert_eq!(report.entries().len(), 20);
        assert_eq!(
            &report.transcript()[13..18],
            &[
                "get: state:usps=al Alabama",
                "Waiting 2 seconds for key to expire...",
                "get: state:usps=al Alabama",
                "Waiting 2 seconds for key to expire...",
                "Unable to get: state:usps=al",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn already_expired_key_skips_the_wait() {
        let mut replies = replies();
        replies[16].1 = Value::Nil;
        replies.remove(17);
        let mut runner = Runner::new(Session::new(FakeTransport::replay(replies)))
            .with_output(std::io::sink());

        let report = runner.run(&script()).await;

        assert!(matches!(report.end(), RunEnd::Completed));
        assert!(!report
            .transcript()
            .iter()
            .any(|line| line == "Waiting 1 second for key to expire..."));
        assert_eq!(
            report.entries().last().map(|entry| entry.label),
            Some("rename-california")
        );
    }
}
