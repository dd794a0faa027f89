use std::time::Duration;

use crate::command::{Command, Shape};
use crate::script::{Next, Script, Step};

const US: &str = "country:iso=us:population";
const CN: &str = "country:iso=cn:population";
const AU: &str = "country:iso=au:population";
const BR: &str = "country:iso=br:population";
const UK: &str = "country:iso=uk:population";
const SE: &str = "country:iso=se:population";

fn set(label: &'static str, key: &'static str, population: i64) -> Step {
    Step::new(
        label,
        Command::new("SET", Shape::Status).arg(key).arg(population),
    )
    .accepted("set: {0} {1}")
    .rejected("Unable to set: {0} {1}")
}

fn get(label: &'static str, key: &'static str) -> Step {
    Step::new(label, Command::new("GET", Shape::Text).arg(key))
        .accepted("get: {0} {reply}")
        .rejected("Unable to get: {0}")
}

/// Country populations stored as strings the server treats as integers when asked to count.
pub fn script() -> Script {
    Script::new("integer")
        .step(set("set-us", US, 318_900_000))
        .step(
            Step::new("us-birth", Command::new("INCR", Shape::Integer).arg(US))
                .accepted("incr: {0} {reply}")
                .rejected("Unable to incr: {0}"),
        )
        .step(
            Step::new("us-death", Command::new("DECR", Shape::Integer).arg(US))
                .accepted("decr: {0} {reply}")
                .rejected("Unable to decr: {0}"),
        )
        .step(
            Step::new(
                "us-baby-boom",
                Command::new("INCRBY", Shape::Integer).arg(US).arg(500),
            )
            .accepted("incrby: {0} {reply}")
            .rejected("Unable to incrby: {0}"),
        )
        .step(
            Step::new(
                "us-emigration",
                Command::new("DECRBY", Shape::Integer).arg(US).arg(100),
            )
            .accepted("decrby: {0} {reply}")
            .rejected("Unable to decrby: {0}"),
        )
        .step(set("set-cn-with-typo", CN, 9_357_000_000))
        .step(
            Step::new(
                "fix-cn",
                Command::new("SETRANGE", Shape::Integer)
                    .arg(CN)
                    .arg(0)
                    .arg(1),
            )
            .accepted("updated: {0}")
            .rejected("Unable to setrange: {0}"),
        )
        .step(get("get-cn", CN))
        .step(
            Step::new(
                "us-in-millions",
                Command::new("GETRANGE", Shape::Text).arg(US).arg(0).arg(2),
            )
            .accepted("getrange: {0} {reply} million")
            .rejected("Unable to getrange: {0}"),
        )
        .step(
            Step::new("us-digits", Command::new("STRLEN", Shape::Integer).arg(US))
                .accepted("strlen: {0} {reply}")
                .rejected("Unable to strlen: {0}"),
        )
        .step(
            Step::new(
                "set-au-and-br",
                Command::new("MSET", Shape::Status)
                    .arg(AU)
                    .arg(2_313_000)
                    .arg(BR)
                    .arg(200_400_000),
            )
            .accepted("mset: {reply}")
            .rejected("Unable to mset: {reply}"),
        )
        .step(
            Step::new("fix-au", Command::new("APPEND", Shape::Integer).arg(AU).arg(0))
                .accepted("append: {0} {reply}")
                .rejected("Unable to append: {0}"),
        )
        .step(
            Step::new(
                "get-several",
                Command::new("MGET", Shape::List).arg(US).arg(AU).arg(BR),
            )
            .accepted("mget: {reply}")
            .rejected("Unable to mget"),
        )
        .step(
            Step::new(
                "reset-us",
                Command::new("SETNX", Shape::Integer).arg(US).arg(1),
            )
            .accepted("setnx: {0} {reply}")
            .rejected("Unable to setnx: key {0} already exists")
            .on_success(Next::Stop)
            .on_failure(Next::Continue),
        )
        .step(
            Step::new(
                "reset-au-and-br",
                Command::new("MSETNX", Shape::Integer)
                    .arg(AU)
                    .arg(111)
                    .arg(BR)
                    .arg(222),
            )
            .accepted("msetnx: {reply}")
            .rejected("Unable to msetnx: a key already exists")
            .on_success(Next::Stop)
            .on_failure(Next::Continue),
        )
        .step(
            Step::new(
                "set-uk-for-a-second",
                Command::new("SETEX", Shape::Status)
                    .arg(UK)
                    .arg(1)
                    .arg(64_100_000),
            )
            .accepted("set: {0} {2}")
            .rejected("Unable to setex: {0}"),
        )
        .step(get("get-uk", UK).on_failure(Next::Goto("set-se-briefly")))
        .step(
            get("await-uk-expiry", UK)
                .note("Waiting 2 seconds for key to expire...")
                .delay(Duration::from_secs(2))
                .on_success(Next::Goto("await-uk-expiry"))
                .on_failure(Next::Continue),
        )
        .step(
            Step::new(
                "set-se-briefly",
                Command::new("PSETEX", Shape::Status)
                    .arg(SE)
                    .arg(100)
                    .arg(9_593_000),
            )
            .accepted("set: {0} {2}")
            .rejected("Unable to psetex: {0}"),
        )
        .step(get("get-se", SE).on_failure(Next::Goto("restore-us")))
        .step(
            get("await-se-expiry", SE)
                .note("Waiting 1 second for key to expire...")
                .delay(Duration::from_secs(1))
                .on_success(Next::Goto("await-se-expiry"))
                .on_failure(Next::Continue),
        )
        .step(
            Step::new(
                "restore-us",
                Command::new("GETSET", Shape::Text).arg(US).arg(318_900_000),
            )
            .accepted("getset: {0} was {reply}\ngetset: {0} is now {1}")
            .rejected("Unable to getset: {0}"),
        )
        .expect_line("set: country:iso=us:population 318900000")
        .expect_line("incr: country:iso=us:population 318900001")
        .expect_line("decr: country:iso=us:population 318900000")
        .expect_line("incrby: country:iso=us:population 318900500")
        .expect_line("decrby: country:iso=us:population 318900400")
        .expect_line("set: country:iso=cn:population 9357000000")
        .expect_line("updated: country:iso=cn:population")
        .expect_line("get: country:iso=cn:population 1357000000")
        .expect_line("getrange: country:iso=us:population 318 million")
        .expect_line("strlen: country:iso=us:population 9")
        .expect_line("mset: OK")
        .expect_line("append: country:iso=au:population 8")
        .expect_line("mget: 318900400,23130000,200400000")
        .expect_line("Unable to setnx: key country:iso=us:population already exists")
        .expect_line("Unable to msetnx: a key already exists")
        .expect_line("set: country:iso=uk:population 64100000")
        .expect_line("get: country:iso=uk:population 64100000")
        .expect_line("Waiting 2 seconds for key to expire...")
        .expect_line("Unable to get: country:iso=uk:population")
        .expect_line("set: country:iso=se:population 9593000")
        .expect_line("get: country:iso=se:population 9593000")
        .expect_line("Waiting 1 second for key to expire...")
        .expect_line("Unable to get: country:iso=se:population")
        .expect_line("getset: country:iso=us:population was 318900400")
        .expect_line("getset: country:iso=us:population is now 318900000")
}
