use crate::command::{Command, Shape};
use crate::script::{Next, Script, Step};

const EMPLOYEES: &str = "employees";
const FRIENDS: &str = "friends";
const WORK_ASSOCIATES: &str = "work_associates";
const FRIENDLY_COWORKERS: &str = "friendly_coworkers";
const ALL_CONTACTS: &str = "all_contacts";

fn members(label: &'static str, key: &'static str) -> Step {
    Step::new(label, Command::new("SMEMBERS", Shape::List).arg(key))
        .accepted("smembers: {0} {reply}")
        .rejected("Unable to smembers: {0}")
}

/// Same as `members`, with the members in parentheses.
fn members_grouped(label: &'static str, key: &'static str) -> Step {
    members(label, key).accepted("smembers: {0} ({reply})")
}

/// Set algebra over a small address book: who is a coworker, who is a friend and who is both.
///
/// Sets are unordered, so most lines listing members are only checked up to the members.
pub fn script() -> Script {
    Script::new("set")
        .banner()
        .step(
            Step::new(
                "add-employees",
                Command::new("SADD", Shape::Integer)
                    .arg(EMPLOYEES)
                    .arg("Bob")
                    .arg("Sue")
                    .arg("Joe"),
            )
            .accepted("sadd: {0} {1} {2} {3} ({reply})")
            .rejected("members already exist sadd: {0} ({reply})")
            .on_failure(Next::Continue),
        )
        .step(
            Step::new(
                "add-friends",
                Command::new("SADD", Shape::Integer)
                    .arg(FRIENDS)
                    .arg("Bob")
                    .arg("Jane")
                    .arg("Joe"),
            )
            .accepted("sadd: {0} {1} {2} {3} ({reply})")
            .rejected("members already exist sadd: {0} ({reply})")
            .on_failure(Next::Continue),
        )
        .step(
            Step::new("count-friends", Command::new("SCARD", Shape::Integer).arg(FRIENDS))
                .accepted("scard: {0} {reply}")
                .rejected("Unable to scard: {0}"),
        )
        .step(
            Step::new(
                "coworkers-only",
                Command::new("SDIFF", Shape::List).arg(EMPLOYEES).arg(FRIENDS),
            )
            .accepted("sdiff: {0} {1} = {reply}")
            .rejected("Unable to sdiff: {0} {1}"),
        )
        .step(
            Step::new(
                "store-coworkers-only",
                Command::new("SDIFFSTORE", Shape::Integer)
                    .arg(WORK_ASSOCIATES)
                    .arg(EMPLOYEES)
                    .arg(FRIENDS),
            )
            .accepted("sdiffstore: {0} ({reply})")
            .rejected("Unable to sdiffstore: {0}"),
        )
        .step(
            Step::new(
                "coworkers-and-friends",
                Command::new("SINTER", Shape::List).arg(EMPLOYEES).arg(FRIENDS),
            )
            .accepted("sinter: {0} {1} = {reply}")
            .rejected("Unable to sinter: {0} {1}"),
        )
        .step(
            Step::new(
                "store-coworkers-and-friends",
                Command::new("SINTERSTORE", Shape::Integer)
                    .arg(FRIENDLY_COWORKERS)
                    .arg(EMPLOYEES)
                    .arg(FRIENDS),
            )
            .accepted("sinterstore: {0} ({reply})")
            .rejected("Unable to sinterstore: {0}"),
        )
        .step(
            Step::new(
                "everyone",
                Command::new("SUNION", Shape::List).arg(EMPLOYEES).arg(FRIENDS),
            )
            .accepted("sunion: {0} {1} = {reply}")
            .rejected("Unable to sunion: {0} {1}"),
        )
        .step(
            Step::new(
                "store-everyone",
                Command::new("SUNIONSTORE", Shape::Integer)
                    .arg(ALL_CONTACTS)
                    .arg(EMPLOYEES)
                    .arg(FRIENDS),
            )
            .accepted("sunionstore: {0} ({reply})")
            .rejected("Unable to sunionstore: {0}"),
        )
        .step(members("view-friendly-coworkers", FRIENDLY_COWORKERS))
        .step(
            Step::new(
                "is-bob-a-friend",
                Command::new("SISMEMBER", Shape::Integer).arg(FRIENDS).arg("Bob"),
            )
            .accepted("sismember: {0} {1} is friendly ({reply})")
            .rejected("sismember: {0} {1} is not friendly"),
        )
        .step(
            Step::new(
                "befriend-sue",
                Command::new("SMOVE", Shape::Integer)
                    .arg(WORK_ASSOCIATES)
                    .arg(FRIENDLY_COWORKERS)
                    .arg("Sue"),
            )
            .accepted("smove: {2} from {0} to {1} ({reply})")
            .rejected("Unable to smove: {2} from {0} to {1}"),
        )
        .step(members_grouped("view-after-smove", FRIENDLY_COWORKERS))
        .step(
            Step::new(
                "pop-friendly-coworker",
                Command::new("SPOP", Shape::Text).arg(FRIENDLY_COWORKERS),
            )
            .accepted("spop: {0} ({reply})")
            .rejected("Unable to spop: {0}"),
        )
        .step(members_grouped("view-after-spop", FRIENDLY_COWORKERS))
        .step(
            Step::new(
                "random-contact",
                Command::new("SRANDMEMBER", Shape::List)
                    .arg(ALL_CONTACTS)
                    .arg(1),
            )
            .accepted("srandmember: {0} {reply}")
            .rejected("Unable to srandmember: {0}"),
        )
        .step(members("view-all-contacts", ALL_CONTACTS))
        .step(
            Step::new(
                "drop-jane",
                Command::new("SREM", Shape::Integer).arg(ALL_CONTACTS).arg("Jane"),
            )
            .accepted("srem: {0} {1} ({reply})")
            .rejected("Unable to srem: {0} {1}"),
        )
        .step(
            Step::new(
                "scan-contacts",
                Command::new("SSCAN", Shape::List)
                    .arg(ALL_CONTACTS)
                    .arg(0)
                    .flag("MATCH")
                    .arg("*e"),
            )
            .accepted("sscan: {0}{reply}")
            .rejected("Unable to sscan: {0}"),
        )
        .expect_line("--- BEGIN ---")
        .expect_line("sadd: employees Bob Sue Joe (3)")
        .expect_line("sadd: friends Bob Jane Joe (3)")
        .expect_line("scard: friends 3")
        .expect_line("sdiff: employees friends = Sue")
        .expect_line("sdiffstore: work_associates (1)")
        .expect_prefix("sinter: employees friends = ")
        .expect_line("sinterstore: friendly_coworkers (2)")
        .expect_prefix("sunion: employees friends = ")
        .expect_line("sunionstore: all_contacts (4)")
        .expect_prefix("smembers: friendly_coworkers ")
        .expect_line("sismember: friends Bob is friendly (1)")
        .expect_line("smove: Sue from work_associates to friendly_coworkers (1)")
        .expect_prefix("smembers: friendly_coworkers (")
        .expect_prefix("spop: friendly_coworkers (")
        .expect_prefix("smembers: friendly_coworkers (")
        .expect_prefix("srandmember: all_contacts ")
        .expect_prefix("smembers: all_contacts ")
        .expect_line("srem: all_contacts Jane (1)")
        .expect_prefix("sscan: all_contacts0,")
        .expect_line("--- END ---")
}
