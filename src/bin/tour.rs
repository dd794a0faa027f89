use clap::Parser;
use resp_tour::config::{Endpoint, Target, DEFAULT_HOST, DEFAULT_MAX_STEPS};
use resp_tour::connection::Session;
use resp_tour::runner::Runner;
use resp_tour::tours::{self, Tour};
use resp_tour::Error;
use tracing::{debug, error, info, warn, Level};

#[derive(Parser, Debug)]
#[command(about, version)]
struct Args {
    /// Glob patterns selecting the tours to run, e.g. `s*` or `hash`
    #[arg(default_value = "*")]
    patterns: Vec<String>,

    /// The host the server listens on
    #[arg(long, env = "TOUR_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// The port the server listens on, defaults to the target's well-known port
    #[arg(short, long, env = "TOUR_PORT")]
    port: Option<u16>,

    /// The kind of server the tours run against
    #[arg(short, long, env = "TOUR_TARGET", value_enum, default_value_t = Target::Redis)]
    target: Target,

    /// The database to select
    #[arg(long, env = "TOUR_DB", default_value_t = 0)]
    db: i64,

    /// Empty the database before each tour
    #[arg(long)]
    flush: bool,

    /// Compare each transcript with the expected one
    #[arg(long)]
    verify: bool,

    /// Abort a tour after this many commands
    #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: usize,

    /// Log verbosity, logs go to stderr
    #[arg(long, env = "TOUR_LOG", default_value = "warn")]
    log_level: Level,

    /// Print the available tours and exit
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();

    let _ = tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| debug!("Failed to initialize global tracing: {}", e));

    if args.list {
        for tour in Tour::all() {
            println!("{}", tour);
        }
        return Ok(());
    }

    let selected = tours::select(&args.patterns);
    if selected.is_empty() {
        return Err(format!("no tour matches {:?}", args.patterns).into());
    }

    let endpoint = Endpoint::new(args.host.clone(), args.target, args.port, args.db);
    let mut mismatches = 0;

    for tour in selected {
        let script = tour.script();
        if args.target.is_cluster() && script.uses_multi_key_commands() {
            warn!(
                %tour,
                server = %args.target,
                "tour uses commands spanning several keys, which need every key on one node"
            );
        }

        let mut session = Session::open(&endpoint).await?;
        if args.flush {
            session.flush().await?;
        }

        info!(%tour, %endpoint, "running tour");
        let report = Runner::new(session)
            .with_step_limit(args.max_steps)
            .run(&script)
            .await;

        let mismatch = if args.verify {
            script.verify(report.transcript()).err()
        } else {
            None
        };
        report.into_result()?;

        if let Some(mismatch) = mismatch {
            error!(%tour, "transcript differs from the expected one; {}", mismatch);
            mismatches += 1;
        }
    }

    if mismatches > 0 {
        return Err(format!("{} tour(s) did not print the expected transcript", mismatches).into());
    }

    Ok(())
}
