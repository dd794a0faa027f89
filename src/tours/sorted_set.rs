use crate::command::{Command, Shape};
use crate::script::{Next, Script, Step};

const STARTUPS: &str = "tags:category=startups";
const MARKETING: &str = "tags:category=marketing";
const COMMON: &str = "tags:category=common";
const UNION: &str = "tags:category=union";
const TAGS: &str = "tags";

fn add_scored(label: &'static str, key: &'static str, members: &[(i64, &'static str)]) -> Step {
    let mut command = Command::new("ZADD", Shape::Integer).arg(key);
    for &(score, member) in members {
        command = command.arg(score).arg(member);
    }

    Step::new(label, command)
        .accepted("zadd: {0} ({reply})")
        .rejected("members already exist zadd: {0} ({reply})")
        .on_failure(Next::Continue)
}

/// Every member gets the same score, so ordering falls back to the member names.
fn add_tags(label: &'static str, members: [&'static str; 3]) -> Step {
    let mut command = Command::new("ZADD", Shape::Integer).arg(TAGS);
    for member in members {
        command = command.arg(1).arg(member);
    }

    Step::new(label, command)
        .accepted("zadd: {0} {reply}")
        .rejected("Unable to zadd: {0}")
        .on_failure(Next::Continue)
}

fn range(label: &'static str, key: &'static str, with_scores: bool) -> Step {
    let command = Command::new("ZRANGE", Shape::List).arg(key).arg(0).arg(-1);
    let command = if with_scores {
        command.flag("WITHSCORES")
    } else {
        command
    };

    Step::new(label, command)
        .accepted("zrange: {0} {reply}")
        .rejected("Unable to zrange: {0}")
}

/// Tags weighted by popularity, combined across categories and then trimmed by rank, score and
/// name.
///
/// Ref: <https://redis.io/docs/latest/develop/data-types/sorted-sets/>
pub fn script() -> Script {
    Script::new("sorted_set")
        .banner()
        .step(add_scored(
            "add-startup-tags",
            STARTUPS,
            &[(31, "Funding"), (25, "Growth"), (67, "Customers")],
        ))
        .step(add_scored(
            "add-more-startup-tags",
            STARTUPS,
            &[
                (321, "Product/Market Fit"),
                (1, "Traction"),
                (56, "Market Knowledge"),
            ],
        ))
        .step(add_scored(
            "add-marketing-tags",
            MARKETING,
            &[(409, "Growth"), (675, "Customers"), (233, "Awareness")],
        ))
        .step(
            Step::new(
                "count-startup-tags",
                Command::new("ZCARD", Shape::Integer).arg(STARTUPS),
            )
            .accepted("zcard: {0} {reply}")
            .rejected("Unable to zcard: {0}"),
        )
        .step(
            Step::new(
                "count-startup-tags-by-score",
                Command::new("ZCOUNT", Shape::Integer)
                    .arg(STARTUPS)
                    .arg(1)
                    .arg(100),
            )
            .accepted("zcount: {0} {reply}")
            .rejected("Unable to zcount: {0}"),
        )
        .step(
            Step::new(
                "bump-marketing-growth",
                Command::new("ZINCRBY", Shape::Text)
                    .arg(MARKETING)
                    .arg(5)
                    .arg("Growth"),
            )
            .accepted("zincrby: {0} {2} ({reply})")
            .rejected("Unable to zincrby: {0} {2}"),
        )
        .step(
            Step::new(
                "store-common-tags",
                Command::new("ZINTERSTORE", Shape::Integer)
                    .arg(COMMON)
                    .arg(2)
                    .arg(STARTUPS)
                    .arg(MARKETING),
            )
            .accepted("zinterstore: {2} {3} = {reply}")
            .rejected("Unable to zinterstore: {0}"),
        )
        .step(range("view-common-tags", COMMON, false))
        .step(
            Step::new(
                "view-common-tags-reversed",
                Command::new("ZREVRANGE", Shape::List)
                    .arg(COMMON)
                    .arg(0)
                    .arg(-1),
            )
            .accepted("zrevrange: {0} {reply}")
            .rejected("Unable to zrevrange: {0}"),
        )
        .step(add_tags("add-tags", ["Funding", "Growth", "Customers"]))
        .step(add_tags(
            "add-strategy-tags",
            ["Go To Market", "Strategy", "Customer Knowledge"],
        ))
        .step(add_tags(
            "add-market-tags",
            ["Product/Market Fix", "Traction", "Market Knowledge"],
        ))
        .step(add_tags("add-team-tags", ["Awareness", "Founders", "Hiring"]).on_failure(Next::Stop))
        .step(
            Step::new(
                "view-tags",
                Command::new("ZRANGE", Shape::List).arg(TAGS).arg(0).arg(-1),
            )
            .accepted("zrange: {0} ({reply})")
            .rejected("Unable to zrange: {0}"),
        )
        .step(
            Step::new(
                "count-tags-a-to-i",
                Command::new("ZLEXCOUNT", Shape::Integer)
                    .arg(TAGS)
                    .arg("[A")
                    .arg("[I"),
            )
            .accepted("zlexcount: {0} {1} to {2} {reply}")
            .rejected("Unable to zlexcount: {0}"),
        )
        .step(
            Step::new(
                "tags-a-to-i",
                Command::new("ZRANGEBYLEX", Shape::List)
                    .arg(TAGS)
                    .arg("[A")
                    .arg("[I"),
            )
            .accepted("zrangebylex: {0} from {1} to {2} {reply}")
            .rejected("Unable to zrangebylex: {0}"),
        )
        .step(
            Step::new(
                "tags-i-to-a",
                Command::new("ZREVRANGEBYLEX", Shape::List)
                    .arg(TAGS)
                    .arg("[I")
                    .arg("[A"),
            )
            .accepted("zrevrangebylex: {0} from {1} to {2} {reply}")
            .rejected("Unable to zrevrangebylex: {0}"),
        )
        .step(
            Step::new(
                "rare-startup-tags",
                Command::new("ZRANGEBYSCORE", Shape::List)
                    .arg(STARTUPS)
                    .arg(1)
                    .arg(50)
                    .flag("WITHSCORES"),
            )
            .accepted("zrangebyscore: {0} from {1} to {2} {reply}")
            .rejected("Unable to zrangebyscore: {0}"),
        )
        .step(
            Step::new(
                "popular-startup-tags",
                Command::new("ZREVRANGEBYSCORE", Shape::List)
                    .arg(STARTUPS)
                    .arg(500)
                    .arg(50)
                    .flag("WITHSCORES"),
            )
            .accepted("zrevrangebyscore: {0} from {1} to {2} {reply}")
            .rejected("Unable to zrevrangebyscore: {0}"),
        )
        .step(
            Step::new(
                "customers-rank",
                Command::new("ZRANK", Shape::Integer)
                    .arg(STARTUPS)
                    .arg("Customers"),
            )
            .accepted("zrank: {0} {1} {reply}")
            .rejected("Unable to zrank: {0} {1}"),
        )
        .step(
            Step::new(
                "customers-reverse-rank",
                Command::new("ZREVRANK", Shape::Integer)
                    .arg(STARTUPS)
                    .arg("Customers"),
            )
            .accepted("zrevrank: {0} {1} {reply}")
            .rejected("Unable to zrevrank: {0} {1}"),
        )
        .step(
            Step::new(
                "customers-score",
                Command::new("ZSCORE", Shape::Text)
                    .arg(STARTUPS)
                    .arg("Customers"),
            )
            .accepted("zscore: {0} {1} {reply}")
            .rejected("Unable to zscore: {0} {1}"),
        )
        .step(
            Step::new(
                "store-all-category-tags",
                Command::new("ZUNIONSTORE", Shape::Integer)
                    .arg(UNION)
                    .arg(2)
                    .arg(STARTUPS)
                    .arg(MARKETING),
            )
            .accepted("zunionstore: {0}")
            .rejected("Unable to zunionstore: {0}"),
        )
        .step(
            Step::new(
                "view-all-category-tags",
                Command::new("ZRANGE", Shape::List).arg(UNION).arg(0).arg(-1),
            )
            .accepted("zrange: {0} {reply}")
            .rejected("Unable to zrange: {0}"),
        )
        .step(
            Step::new(
                "scan-category-tags",
                Command::new("ZSCAN", Shape::List)
                    .arg(UNION)
                    .arg(0)
                    .flag("MATCH")
                    .arg("*o*"),
            )
            .accepted("zscan: {0} {3} {reply}")
            .rejected("Unable to zscan: {0}"),
        )
        .step(
            Step::new(
                "drop-product-market-fit",
                Command::new("ZREM", Shape::Integer)
                    .arg(UNION)
                    .arg("Product/Market Fit"),
            )
            .accepted("zrem: {0} {1} ({reply})")
            .rejected("Unable to zrem: {0} {1}"),
        )
        .step(range("view-after-zrem", UNION, true))
        .step(
            Step::new(
                "drop-tags-a-to-h",
                Command::new("ZREMRANGEBYLEX", Shape::Integer)
                    .arg(TAGS)
                    .arg("[A")
                    .arg("[H"),
            )
            .accepted("zremrangebylex: {0} {1} to {2} ({reply})")
            .rejected("Unable to zremrangebylex: {0}"),
        )
        .step(range("view-after-zremrangebylex", TAGS, true))
        .step(
            Step::new(
                "drop-lowest-ranked",
                Command::new("ZREMRANGEBYRANK", Shape::Integer)
                    .arg(UNION)
                    .arg(0)
                    .arg(0),
            )
            .accepted("zremrangebyrank: {0} {1} to {2} ({reply})")
            .rejected("Unable to zremrangebyrank: {0}"),
        )
        .step(range("view-after-zremrangebyrank", UNION, true))
        .step(
            Step::new(
                "drop-highest-scored",
                Command::new("ZREMRANGEBYSCORE", Shape::Integer)
                    .arg(UNION)
                    .arg(400)
                    .arg(900),
            )
            .accepted("zremrangebyscore: {0} {1} to {2} ({reply})")
            .rejected("Unable to zremrangebyscore: {0}"),
        )
        .step(range("view-after-zremrangebyscore", UNION, true))
        .expect_line("--- BEGIN ---")
        .expect_line("zadd: tags:category=startups (3)")
        .expect_line("zadd: tags:category=startups (3)")
        .expect_line("zadd: tags:category=marketing (3)")
        .expect_line("zcard: tags:category=startups 6")
        .expect_line("zcount: tags:category=startups 5")
        .expect_line("zincrby: tags:category=marketing Growth (414)")
        .expect_line("zinterstore: tags:category=startups tags:category=marketing = 2")
        .expect_line("zrange: tags:category=common Growth,Customers")
        .expect_line("zrevrange: tags:category=common Customers,Growth")
        .expect_line("zadd: tags 3")
        .expect_line("zadd: tags 3")
        .expect_line("zadd: tags 3")
        .expect_line("zadd: tags 3")
        .expect_line("zrange: tags (Awareness,Customer Knowledge,Customers,Founders,Funding,Go To Market,Growth,Hiring,Market Knowledge,Product/Market Fix,Strategy,Traction)")
        .expect_line("zlexcount: tags [A to [I 8")
        .expect_line("zrangebylex: tags from [A to [I Awareness,Customer Knowledge,Customers,Founders,Funding,Go To Market,Growth,Hiring")
        .expect_line("zrevrangebylex: tags from [I to [A Hiring,Growth,Go To Market,Funding,Founders,Customers,Customer Knowledge,Awareness")
        .expect_line("zrangebyscore: tags:category=startups from 1 to 50 Traction,1,Growth,25,Funding,31")
        .expect_line("zrevrangebyscore: tags:category=startups from 500 to 50 Product/Market Fit,321,Customers,67,Market Knowledge,56")
        .expect_line("zrank: tags:category=startups Customers 4")
        .expect_line("zrevrank: tags:category=startups Customers 1")
        .expect_line("zscore: tags:category=startups Customers 67")
        .expect_line("zunionstore: tags:category=union")
        .expect_line("zrange: tags:category=union Traction,Funding,Market Knowledge,Awareness,Product/Market Fit,Growth,Customers")
        .expect_line("zscan: tags:category=union *o* 0,Traction,1,Market Knowledge,56,Product/Market Fit,321,Growth,439,Customers,742")
        .expect_line("zrem: tags:category=union Product/Market Fit (1)")
        .expect_line("zrange: tags:category=union Traction,1,Funding,31,Market Knowledge,56,Awareness,233,Growth,439,Customers,742")
        .expect_line("zremrangebylex: tags [A to [H (7)")
        .expect_line("zrange: tags Hiring,1,Market Knowledge,1,Product/Market Fix,1,Strategy,1,Traction,1")
        .expect_line("zremrangebyrank: tags:category=union 0 to 0 (1)")
        .expect_line("zrange: tags:category=union Funding,31,Market Knowledge,56,Awareness,233,Growth,439,Customers,742")
        .expect_line("zremrangebyscore: tags:category=union 400 to 900 (2)")
        .expect_line("zrange: tags:category=union Funding,31,Market Knowledge,56,Awareness,233")
        .expect_line("--- END ---")
}
