use crate::command::{Command, Shape};
use crate::script::{Next, Script, Step};

const BOB: &str = "user:id=bob";
const SUE: &str = "user:id=sue";

/// Two user profiles stored as hashes: Bob is built field by field, Sue in one go. Both have a
/// birthday, Bob fails to change his first name and loses his occupation.
///
/// Ref: <https://redis.io/docs/latest/develop/data-types/hashes/>
pub fn script() -> Script {
    Script::new("hash")
        .banner()
        .step(
            Step::new(
                "create-bob",
                Command::new("HSET", Shape::Integer)
                    .arg(BOB)
                    .arg("fname")
                    .arg("Bob"),
            )
            .accepted("hset: {0} ({reply})")
            .rejected("Unable to hset: {0} ({reply})")
            .on_failure(Next::Continue),
        )
        .step(
            Step::new(
                "update-bob",
                Command::new("HMSET", Shape::Status)
                    .arg(BOB)
                    .arg("lname")
                    .arg("Smith")
                    .arg("age")
                    .arg(40.5)
                    .arg("citizenship")
                    .arg("USA")
                    .arg("gender")
                    .arg("male")
                    .arg("occupation")
                    .arg("Software engineer"),
            )
            .accepted("hmset: {0} ({reply})")
            .rejected("Unable to hmset: {0} ({reply})")
            .on_failure(Next::Continue),
        )
        .step(
            Step::new(
                "create-sue",
                Command::new("HMSET", Shape::Status)
                    .arg(SUE)
                    .arg("fname")
                    .arg("Sue")
                    .arg("lname")
                    .arg("Jones")
                    .arg("age")
                    .arg(37)
                    .arg("gender")
                    .arg("female")
                    .arg("occupation")
                    .arg("CTO"),
            )
            .accepted("hmset: {0} ({reply})")
            .rejected("Unable to hmset: {0} ({reply})")
            .on_failure(Next::Continue),
        )
        .step(
            Step::new("count-bob", Command::new("HLEN", Shape::Integer).arg(BOB))
                .accepted("hlen: {0} ({reply})")
                .rejected("Unable to hlen: {0}"),
        )
        .step(
            Step::new("count-sue", Command::new("HLEN", Shape::Integer).arg(SUE))
                .accepted("hlen: {0} ({reply})")
                .rejected("Unable to hlen: {0}"),
        )
        .step(
            Step::new(
                "bob-has-citizenship",
                Command::new("HEXISTS", Shape::Integer)
                    .arg(BOB)
                    .arg("citizenship"),
            )
            .accepted("hexists: {0} has {1} ({reply})")
            .rejected("hexists: {0} does not have {1} ({reply})"),
        )
        .step(
            Step::new("sue-fields", Command::new("HKEYS", Shape::List).arg(SUE))
                .accepted("hkeys: {0} ({reply})")
                .rejected("Unable to hkeys: {0} ({reply})"),
        )
        .step(
            Step::new(
                "sue-occupation",
                Command::new("HGET", Shape::Text).arg(SUE).arg("occupation"),
            )
            .accepted("hget: {0} {1} ({reply})")
            .rejected("Unable to hget: {0} ({reply})"),
        )
        .step(
            Step::new(
                "bob-names-and-age",
                Command::new("HMGET", Shape::List)
                    .arg(BOB)
                    .arg("fname")
                    .arg("lname")
                    .arg("age"),
            )
            .accepted("hmget: {0} ({reply})")
            .rejected("Unable to hmget: {0} ({reply})"),
        )
        .step(
            Step::new(
                "bob-birthday",
                Command::new("HINCRBYFLOAT", Shape::Text)
                    .arg(BOB)
                    .arg("age")
                    .arg(0.5),
            )
            .accepted("hincrbyfloat: {0} {1} ({reply})")
            .rejected("Unable to hincrbyfloat: {0} ({reply})"),
        )
        .step(
            Step::new(
                "sue-birthday",
                Command::new("HINCRBY", Shape::Integer)
                    .arg(SUE)
                    .arg("age")
                    .arg(1),
            )
            .accepted("hincrby: {0} {1} ({reply})")
            .rejected("Unable to hincrby: {0} ({reply})"),
        )
        .step(
            Step::new("view-bob", Command::new("HGETALL", Shape::Map).arg(BOB))
                .accepted("hgetall: {0} ({reply})")
                .rejected("Unable to hgetall: {0} ({reply})"),
        )
        .step(
            Step::new("view-sue", Command::new("HGETALL", Shape::Map).arg(SUE))
                .accepted("hgetall: {0} ({reply})")
                .rejected("Unable to hgetall: {0} ({reply})"),
        )
        .step(
            Step::new(
                "bob-occupation-length",
                Command::new("HSTRLEN", Shape::Integer)
                    .arg(BOB)
                    .arg("occupation"),
            )
            .accepted("hstrlen: {0} {1} ({reply})")
            .rejected("Unable to hstrlen: {0} ({reply})"),
        )
        .step(
            Step::new("sue-values", Command::new("HVALS", Shape::List).arg(SUE))
                .accepted("hvals: {0} ({reply})")
                .rejected("Unable to hvals: {0}"),
        )
        .step(
            // Bob already has a first name, so this is expected to be turned down.
            Step::new(
                "rename-bob",
                Command::new("HSETNX", Shape::Integer)
                    .arg(BOB)
                    .arg("fname")
                    .arg("Frank"),
            )
            .accepted("hsetnx: {0} {1} ({reply})")
            .rejected("Unable to hsetnx: {0} {1} ({reply})")
            .on_success(Next::Stop)
            .on_failure(Next::Continue),
        )
        .step(
            Step::new(
                "drop-bob-occupation",
                Command::new("HDEL", Shape::Integer).arg(BOB).arg("occupation"),
            )
            .accepted("hdel: {1} from {0} ({reply})")
            .rejected("Unable to hdel: {0} ({reply})"),
        )
        .step(
            Step::new("view-sue-again", Command::new("HGETALL", Shape::Map).arg(SUE))
                .accepted("hgetall: {0} ({reply})")
                .rejected("Unable to hgetall: {0} ({reply})"),
        )
        .step(
            Step::new(
                "scan-sue-names",
                Command::new("HSCAN", Shape::List)
                    .arg(SUE)
                    .arg(0)
                    .flag("MATCH")
                    .arg("*name"),
            )
            .accepted("hscan: {0} ({reply})")
            .rejected("Unable to hscan: {0}"),
        )
        .expect_line("--- BEGIN ---")
        .expect_line("hset: user:id=bob (1)")
        .expect_line("hmset: user:id=bob (OK)")
        .expect_line("hmset: user:id=sue (OK)")
        .expect_line("hlen: user:id=bob (6)")
        .expect_line("hlen: user:id=sue (5)")
        .expect_line("hexists: user:id=bob has citizenship (1)")
        .expect_line("hkeys: user:id=sue (fname,lname,age,gender,occupation)")
        .expect_line("hget: user:id=sue occupation (CTO)")
        .expect_line("hmget: user:id=bob (Bob,Smith,40.5)")
        .expect_line("hincrbyfloat: user:id=bob age (41)")
        .expect_line("hincrby: user:id=sue age (38)")
        .expect_line(r#"hgetall: user:id=bob ({"fname":"Bob","lname":"Smith","age":"41","citizenship":"USA","gender":"male","occupation":"Software engineer"})"#)
        .expect_line(r#"hgetall: user:id=sue ({"fname":"Sue","lname":"Jones","age":"38","gender":"female","occupation":"CTO"})"#)
        .expect_line("hstrlen: user:id=bob occupation (17)")
        .expect_line("hvals: user:id=sue (Sue,Jones,38,female,CTO)")
        .expect_line("Unable to hsetnx: user:id=bob fname (0)")
        .expect_line("hdel: occupation from user:id=bob (1)")
        .expect_line(r#"hgetall: user:id=sue ({"fname":"Sue","lname":"Jones","age":"38","gender":"female","occupation":"CTO"})"#)
        .expect_line("hscan: user:id=sue (0,fname,Sue,lname,Jones)")
        .expect_line("--- END ---")
}

#[cfg(test)]
mod tests {
    use redis::Value;

    use super::*;
    use crate::connection::fake::{array, data, FakeTransport};
    use crate::connection::Session;
    use crate::runner::{RunEnd, Runner};

    fn replies() -> Vec<(&'static str, Value)> {
        let bob = array(&[
            "fname",
            "Bob",
            "lname",
            "Smith",
            "age",
            "41",
            "citizenship",
            "USA",
            "gender",
            "male",
            "occupation",
            "Software engineer",
        ]);
        let sue = array(&[
            "fname", "Sue", "lname", "Jones", "age", "38", "gender", "female", "occupation", "CTO",
        ]);

        vec![
            ("HSET user:id=bob fname Bob", Value::Int(1)),
            ("HMSET user:id=bob lname Smith age 40.5 citizenship USA gender male occupation Software engineer", Value::Okay),
            ("HMSET user:id=sue fname Sue lname Jones age 37 gender female occupation CTO", Value::Okay),
            ("HLEN user:id=bob", Value::Int(6)),
            ("HLEN user:id=sue", Value::Int(5)),
            ("HEXISTS user:id=bob citizenship", Value::Int(1)),
            ("HKEYS user:id=sue", array(&["fname", "lname", "age", "gender", "occupation"])),
            ("HGET user:id=sue occupation", data("CTO")),
            ("HMGET user:id=bob fname lname age", array(&["Bob", "Smith", "40.5"])),
            ("HINCRBYFLOAT user:id=bob age 0.5", data("41")),
            ("HINCRBY user:id=sue age 1", Value::Int(38)),
            ("HGETALL user:id=bob", bob),
            ("HGETALL user:id=sue", sue.clone()),
            ("HSTRLEN user:id=bob occupation", Value::Int(17)),
            ("HVALS user:id=sue", array(&["Sue", "Jones", "38", "female", "CTO"])),
            ("HSETNX user:id=bob fname Frank", Value::Int(0)),
            ("HDEL user:id=bob occupation", Value::Int(1)),
            ("HGETALL user:id=sue", sue),
            (
                "HSCAN user:id=sue 0 MATCH *name",
                Value::Bulk(vec![data("0"), array(&["fname", "Sue", "lname", "Jones"])]),
            ),
        ]
    }

    #[tokio::test]
    async fn transcript_matches_expected() {
        let script = script();
        let mut runner = Runner::new(Session::new(FakeTransport::replay(replies())))
            .with_output(std::io::sink());

        let report = runner.run(&script).await;

        assert!(matches!(report.end(), RunEnd::Completed));
        assert_eq!(script.verify(report.transcript()), Ok(()));
        assert_eq!(report.entries().len(), script.steps.len());
    }

    #[tokio::test]
    async fn accepted_rename_stops_the_tour() {
        let mut replies = replies();
        replies.truncate(16);
        replies[15].1 = Value::Int(1);
        let mut runner = Runner::new(Session::new(FakeTransport::replay(replies)))
            .with_output(std::io::sink());

        let report = runner.run(&script()).await;

        assert!(matches!(
            report.end(),
            RunEnd::Stopped {
                label: "rename-bob"
            }
        ));
        assert_eq!(
            report.transcript().last().map(String::as_str),
            Some("hsetnx: user:id=bob fname (1)")
        );
    }
}
