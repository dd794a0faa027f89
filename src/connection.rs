use futures::future::BoxFuture;
use redis::aio::{ConnectionLike, MultiplexedConnection};
use redis::{Cmd, RedisError, RedisResult, Value};
use tracing::{debug, info};
use uuid::Uuid;

use crate::command::{Command, Shape};
use crate::config::Endpoint;

/// Sends one request and waits for its reply. Implemented by the client library's connection and by
/// test doubles.
pub trait Transport: Send {
    fn send<'a>(&'a mut self, cmd: &'a Cmd) -> BoxFuture<'a, RedisResult<Value>>;
}

impl Transport for MultiplexedConnection {
    fn send<'a>(&'a mut self, cmd: &'a Cmd) -> BoxFuture<'a, RedisResult<Value>> {
        self.req_packed_command(cmd)
    }
}

/// A single logical connection to the store. Only one command is ever in flight: `execute` takes
/// `&mut self` and resolves with the reply before the next call can be made.
pub struct Session<T> {
    pub id: Uuid,
    transport: T,
}

impl Session<MultiplexedConnection> {
    pub async fn open(endpoint: &Endpoint) -> Result<Self, RedisError> {
        let client = redis::Client::open(endpoint.url())?;
        let transport = client.get_multiplexed_async_connection().await?;
        let session = Session::new(transport);

        info!(session_id = %session.id, endpoint = %endpoint, "session opened");

        Ok(session)
    }
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T) -> Session<T> {
        Session {
            id: Uuid::new_v4(),
            transport,
        }
    }

    pub async fn execute(&mut self, command: &Command) -> RedisResult<Value> {
        debug!(session_id = %self.id, %command, "sending command");
        let cmd = command.to_cmd();
        let value = self.transport.send(&cmd).await?;
        debug!(session_id = %self.id, reply = ?value, "received reply");
        Ok(value)
    }

    /// Removes every key in the selected database, so that a tour starts from a known state.
    pub async fn flush(&mut self) -> RedisResult<()> {
        self.execute(&Command::new("FLUSHDB", Shape::Status)).await?;
        Ok(())
    }

    /// Says goodbye to the server and drops the connection. A failed `QUIT` only means the server
    /// went away first.
    pub async fn close(mut self) {
        if let Err(e) = self.execute(&Command::new("QUIT", Shape::Status)).await {
            debug!(session_id = %self.id, "quit failed: {}", e);
        }
        info!(session_id = %self.id, "session closed");
    }
}

/// Connection-level failures end a run. Everything else the server answers with is an ordinary
/// (negative) reply to the command.
pub fn is_fatal(err: &RedisError) -> bool {
    err.is_io_error()
        || err.is_connection_dropped()
        || err.is_connection_refusal()
        || err.is_timeout()
}
