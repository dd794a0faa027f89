use crate::command::{Command, Shape};
use crate::script::{Next, Script, Step};

const RECENT: &str = "blog:recent_posts";
const ARCHIVE: &str = "blog:archive";

fn lrange(label: &'static str, key: &'static str, start: i64, stop: i64) -> Step {
    Step::new(
        label,
        Command::new("LRANGE", Shape::List)
            .arg(key)
            .arg(start)
            .arg(stop),
    )
    .accepted("lrange: {0} {reply}")
    .rejected("Unable to lrange: {0}")
}

/// A blog's most recent post ids kept in a list, newest first, with the oldest ones moved to an
/// archive.
///
/// Ref: <https://redis.io/docs/latest/develop/data-types/lists/>
pub fn script() -> Script {
    Script::new("list")
        .banner()
        .step(
            Step::new(
                "push-initial-posts",
                Command::new("LPUSH", Shape::Integer)
                    .arg(RECENT)
                    .arg(100)
                    .arg(7)
                    .arg(500),
            )
            .accepted("lpush: {0} {1} {2} {3}")
            .rejected("Unable to lpush: {0}"),
        )
        .step(lrange("two-most-recent", RECENT, 0, 1))
        .step(
            Step::new(
                "push-to-existing-list",
                Command::new("LPUSHX", Shape::Integer).arg(RECENT).arg(800),
            )
            .accepted("lpushx: {0} {1}")
            .rejected("Unable to lpushx: {0}"),
        )
        .step(
            Step::new(
                "push-to-missing-list",
                Command::new("LPUSHX", Shape::Integer)
                    .arg("list_does_not_exist")
                    .arg(88),
            )
            .accepted("lpushx: {0} {1}")
            .rejected("Unable to lpushx: {0} does not exist ({reply})")
            .on_success(Next::Stop)
            .on_failure(Next::Continue),
        )
        .step(
            Step::new("most-recent", Command::new("LPOP", Shape::Text).arg(RECENT))
                .accepted("lpop: {0} {reply}")
                .rejected("Unable to lpop: {0}"),
        )
        .step(
            Step::new("oldest", Command::new("RPOP", Shape::Text).arg(RECENT))
                .accepted("rpop: {0} {reply}")
                .rejected("Unable to rpop: {0}"),
        )
        .step(
            Step::new(
                "change-most-recent",
                Command::new("LSET", Shape::Status)
                    .arg(RECENT)
                    .arg(0)
                    .arg(1001),
            )
            .accepted("lset: {0}[{1}] {2} ({reply})")
            .rejected("Unable to lset: {0}"),
        )
        .step(lrange("view-after-lset", RECENT, 0, -1))
        .step(
            Step::new(
                "push-to-end",
                Command::new("RPUSH", Shape::Integer)
                    .arg(RECENT)
                    .arg(20000)
                    .arg(30000),
            )
            .accepted("rpush: {0} ({reply})")
            .rejected("Unable to rpush: {0}"),
        )
        .step(lrange("three-oldest", RECENT, -3, -1))
        .step(
            Step::new(
                "push-to-end-of-missing-list",
                Command::new("RPUSHX", Shape::Integer).arg("fake_list").arg(87),
            )
            .accepted("rpushx: {0} ({reply})")
            .rejected("Unable to rpushx: {0} does not exist ({reply})")
            .on_success(Next::Stop)
            .on_failure(Next::Continue),
        )
        .step(
            Step::new("length", Command::new("LLEN", Shape::Integer).arg(RECENT))
                .accepted("llen: {0} {reply}")
                .rejected("Unable to llen: {0}"),
        )
        .step(
            Step::new(
                "insert-second-most-recent",
                Command::new("LINSERT", Shape::Integer)
                    .arg(RECENT)
                    .flag("AFTER")
                    .arg(1001)
                    .arg(1002),
            )
            .accepted("linsert: {0} ({reply})")
            .rejected("Unable to linsert: {0}"),
        )
        .step(
            Step::new(
                "second-item",
                Command::new("LINDEX", Shape::Text).arg(RECENT).arg(1),
            )
            .accepted("lindex: {0}[{1}] {reply}")
            .rejected("Unable to lindex: {0}"),
        )
        .step(lrange("view-after-lindex", RECENT, 0, -1))
        .step(
            Step::new(
                "remove-item",
                Command::new("LREM", Shape::Integer)
                    .arg(RECENT)
                    .arg(1)
                    .arg(1001),
            )
            .accepted("lrem: {0} ({reply})")
            .rejected("Unable to lrem: {0}"),
        )
        .step(
            Step::new(
                "keep-top-three",
                Command::new("LTRIM", Shape::Status)
                    .arg(RECENT)
                    .arg(0)
                    .arg(2),
            )
            .accepted("ltrim: {0} ({reply})")
            .rejected("Unable to ltrim: {0}"),
        )
        .step(lrange("view-after-trim", RECENT, 0, -1))
        .step(
            Step::new(
                "create-archive",
                Command::new("LPUSH", Shape::Integer).arg(ARCHIVE).arg(1),
            )
            .accepted("lpush: {0} {1} ({reply})")
            .rejected("Unable to lpush: {0}"),
        )
        .step(
            Step::new(
                "archive-oldest",
                Command::new("RPOPLPUSH", Shape::Text).arg(RECENT).arg(ARCHIVE),
            )
            .accepted("rpoplpush: {0} to {1} ({reply})")
            .rejected("Unable to rpoplpush: {0}"),
        )
        .step(lrange("view-recent", RECENT, 0, -1))
        .step(lrange("view-archive", ARCHIVE, 0, -1))
        .expect_line("--- BEGIN ---")
        .expect_line("lpush: blog:recent_posts 100 7 500")
        .expect_line("lrange: blog:recent_posts 500,7")
        .expect_line("lpushx: blog:recent_posts 800")
        .expect_line("Unable to lpushx: list_does_not_exist does not exist (0)")
        .expect_line("lpop: blog:recent_posts 800")
        .expect_line("rpop: blog:recent_posts 100")
        .expect_line("lset: blog:recent_posts[0] 1001 (OK)")
        .expect_line("lrange: blog:recent_posts 1001,7")
        .expect_line("rpush: blog:recent_posts (4)")
        .expect_line("lrange: blog:recent_posts 7,20000,30000")
        .expect_line("Unable to rpushx: fake_list does not exist (0)")
        .expect_line("llen: blog:recent_posts 4")
        .expect_line("linsert: blog:recent_posts (5)")
        .expect_line("lindex: blog:recent_posts[1] 1002")
        .expect_line("lrange: blog:recent_posts 1001,1002,7,20000,30000")
        .expect_line("lrem: blog:recent_posts (1)")
        .expect_line("ltrim: blog:recent_posts (OK)")
        .expect_line("lrange: blog:recent_posts 1002,7,20000")
        .expect_line("lpush: blog:archive 1 (1)")
        .expect_line("rpoplpush: blog:recent_posts to blog:archive (20000)")
        .expect_line("lrange: blog:recent_posts 1002,7")
        .expect_line("lrange: blog:archive 20000,1")
        .expect_line("--- END ---")
}
