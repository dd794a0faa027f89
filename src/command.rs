use std::fmt;

use itertools::Itertools;

/// Commands that touch more than one key. A Dynomite cluster spreads keys across nodes, so these
/// only behave when every key lives on a single server.
const MULTI_KEY_COMMANDS: &[&str] = &[
    "MGET",
    "MSET",
    "MSETNX",
    "RPOPLPUSH",
    "SDIFF",
    "SDIFFSTORE",
    "SINTER",
    "SINTERSTORE",
    "SUNION",
    "SUNIONSTORE",
    "SMOVE",
    "ZINTERSTORE",
    "ZUNIONSTORE",
];

/// The reply a command is expected to produce. A reply of any other shape is treated as a defect in
/// the script rather than a negative answer from the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    /// Simple string, such as `OK`.
    Status,
    /// Counts and boolean-like `0`/`1` answers, or nil where a rank has no member.
    Integer,
    /// Bulk string, or nil when there is nothing to return.
    Text,
    /// Array, possibly nested (`SCAN` family), elements possibly nil (`MGET`).
    List,
    /// Array of alternating field/value pairs (`HGETALL`).
    Map,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::Status => "status",
            Shape::Integer => "integer",
            Shape::Text => "text",
            Shape::List => "list",
            Shape::Map => "map",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    Text(String),
    Int(i64),
    Float(f64),
    /// Enumerated tokens such as `AFTER`, `MATCH` or `WITHSCORES`.
    Flag(&'static str),
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Text(s) => f.write_str(s),
            Arg::Int(i) => write!(f, "{}", i),
            Arg::Float(n) => write!(f, "{}", n),
            Arg::Flag(flag) => f.write_str(flag),
        }
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Text(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Text(s)
    }
}

impl From<i32> for Arg {
    fn from(i: i32) -> Self {
        Arg::Int(i64::from(i))
    }
}

impl From<i64> for Arg {
    fn from(i: i64) -> Self {
        Arg::Int(i)
    }
}

impl From<f64> for Arg {
    fn from(n: f64) -> Self {
        Arg::Float(n)
    }
}

/// A single request to the store: a command name, its arguments in order and the shape of the reply
/// it should produce.
#[derive(Clone, Debug, PartialEq)]
pub struct Command {
    name: &'static str,
    args: Vec<Arg>,
    shape: Shape,
}

impl Command {
    pub fn new(name: &'static str, shape: Shape) -> Command {
        Command {
            name,
            args: Vec::new(),
            shape,
        }
    }

    pub fn arg(mut self, arg: impl Into<Arg>) -> Command {
        self.args.push(arg.into());
        self
    }

    pub fn flag(mut self, flag: &'static str) -> Command {
        self.args.push(Arg::Flag(flag));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Arguments as they appear on the trace.
    pub fn formatted_args(&self) -> Vec<String> {
        self.args.iter().map(ToString::to_string).collect()
    }

    pub fn is_multi_key(&self) -> bool {
        MULTI_KEY_COMMANDS.contains(&self.name)
    }

    /// Builds the request for the client library. Every argument is sent in the textual form used
    /// on the trace, so what is printed is exactly what the server received.
    pub fn to_cmd(&self) -> redis::Cmd {
        let mut cmd = redis::cmd(self.name);
        for arg in &self.args {
            cmd.arg(arg.to_string());
        }
        cmd
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            return f.write_str(self.name);
        }
        write!(f, "{} {}", self.name, self.args.iter().join(" "))
    }
}
