use std::fmt;

use clap::ValueEnum;
use strum_macros::{Display, EnumString};

pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default number of steps a single run may execute before it is aborted.
pub const DEFAULT_MAX_STEPS: usize = 1000;

/// The kind of server the tours talk to. Each one listens on its own well-known port.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Target {
    /// A single Redis server.
    #[default]
    Redis,
    /// A Dynomite cluster, spreading keys across nodes.
    Dynomite,
    /// A local dynomitedb-redis instance.
    DynomiteRedis,
}

impl Target {
    pub fn default_port(self) -> u16 {
        match self {
            Target::Redis => 6379,
            Target::Dynomite => 8102,
            Target::DynomiteRedis => 22122,
        }
    }

    /// Whether keys may live on different nodes, which breaks commands spanning several keys.
    pub fn is_cluster(self) -> bool {
        matches!(self, Target::Dynomite)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub db: i64,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, target: Target, port: Option<u16>, db: i64) -> Endpoint {
        Endpoint {
            host: host.into(),
            port: port.unwrap_or_else(|| target.default_port()),
            db,
        }
    }

    pub fn url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Endpoint::new(DEFAULT_HOST, Target::default(), None, 0)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.host, self.port, self.db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_defaults_to_target() {
        let endpoint = Endpoint::new("localhost", Target::DynomiteRedis, None, 0);

        assert_eq!(endpoint.port, 22122);
        assert_eq!(endpoint.url(), "redis://localhost:22122/0");
    }

    #[test]
    fn explicit_port_wins() {
        let endpoint = Endpoint::new("localhost", Target::Dynomite, Some(7000), 3);

        assert_eq!(endpoint.url(), "redis://localhost:7000/3");
        assert_eq!(endpoint.to_string(), "localhost:7000/3");
    }

    #[test]
    fn default_endpoint() {
        assert_eq!(Endpoint::default().url(), "redis://127.0.0.1:6379/0");
    }

    #[test]
    fn target_names() {
        assert_eq!(Target::DynomiteRedis.to_string(), "dynomite-redis");
        assert_eq!("dynomite".parse::<Target>().unwrap(), Target::Dynomite);
        assert!(Target::Dynomite.is_cluster());
        assert!(!Target::Redis.is_cluster());
    }
}
