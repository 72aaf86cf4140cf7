#![forbid(unsafe_code)]

use std::{
    io::{BufRead, Read, Write},
    path::PathBuf,
};

use anyhow::{anyhow, Context};
use warden_core::{InMemoryRepository, PermissionRepository, PermissionService, RepositoryError};
use warden_protocol::{
    parse_query, parse_snapshot, Query, QueryResult, Snapshot, MAX_QUERY_BYTES,
    MAX_SNAPSHOT_BYTES,
};

pub const DEFAULT_SNAPSHOT_PATH: &str = "./data/snapshot.json";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub snapshot_path: PathBuf,
    pub max_snapshot_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            max_snapshot_bytes: MAX_SNAPSHOT_BYTES,
        }
    }
}

impl AppConfig {
    /// Reads `WARDEN_SNAPSHOT_PATH` and `WARDEN_MAX_SNAPSHOT_BYTES`.
    ///
    /// # Errors
    /// Returns an error naming the variable if a numeric value does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// # Errors
    /// Returns an error naming the variable if a numeric value does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let snapshot_path = lookup("WARDEN_SNAPSHOT_PATH")
            .map_or(defaults.snapshot_path, PathBuf::from);
        let max_snapshot_bytes = lookup("WARDEN_MAX_SNAPSHOT_BYTES").map_or_else(
            || Ok(defaults.max_snapshot_bytes),
            |value| {
                value.parse::<usize>().map_err(|e| {
                    anyhow!("invalid WARDEN_MAX_SNAPSHOT_BYTES value {value:?}: {e}")
                })
            },
        )?;
        Ok(Self {
            snapshot_path,
            max_snapshot_bytes,
        })
    }
}

/// Loads and validates the snapshot named by `config`.
///
/// # Errors
/// Returns an error if the file cannot be read or fails validation.
pub fn load_snapshot(config: &AppConfig) -> anyhow::Result<Snapshot> {
    let bytes = std::fs::read(&config.snapshot_path)
        .with_context(|| format!("reading snapshot {}", config.snapshot_path.display()))?;
    let snapshot = parse_snapshot(&bytes, config.max_snapshot_bytes)
        .with_context(|| format!("parsing snapshot {}", config.snapshot_path.display()))?;
    tracing::info!(
        path = %config.snapshot_path.display(),
        guilds = snapshot.guilds.len(),
        roles = snapshot.roles.len(),
        channels = snapshot.channels.len(),
        subscriptions = snapshot.subscriptions.len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}

#[must_use]
pub fn build_repository(snapshot: Snapshot) -> InMemoryRepository {
    let mut repository = InMemoryRepository::new();
    for guild in snapshot.guilds {
        repository.insert_guild(guild);
    }
    for role in snapshot.roles {
        repository.insert_role(role);
    }
    for channel in snapshot.channels {
        repository.insert_channel(channel);
    }
    for subscription in snapshot.subscriptions {
        repository.insert_subscription(subscription);
    }
    repository
}

#[must_use]
pub fn answer<R: PermissionRepository>(
    service: &PermissionService<R>,
    query: &Query,
) -> QueryResult {
    let outcome = match query {
        Query::Channel {
            user_id,
            channel_id,
            flags,
        } => service.channel_permission(*user_id, *channel_id, &flag_refs(flags)),
        Query::Server {
            user_id,
            guild_id,
            flags,
        } => service.server_permission(*user_id, *guild_id, &flag_refs(flags)),
        Query::Perk { user_id, perk } => service.perk(*user_id, perk),
    };

    match outcome {
        Ok(granted) => QueryResult::Verdict { granted },
        Err(RepositoryError::NotFound { kind, id }) => {
            tracing::info!(query = query.kind(), %kind, %id, "query references missing entity");
            QueryResult::error("not_found")
        }
    }
}

fn flag_refs(flags: &[String]) -> Vec<&str> {
    flags.iter().map(String::as_str).collect()
}

/// Answers every JSON line of `input`, writing one result line per query.
/// Blank lines are skipped. Lines longer than [`MAX_QUERY_BYTES`] are never
/// buffered past the limit.
///
/// # Errors
/// Returns an error only on I/O failure; malformed lines produce error results.
pub fn run<R, I, W>(
    service: &PermissionService<R>,
    mut input: I,
    mut output: W,
) -> anyhow::Result<usize>
where
    R: PermissionRepository,
    I: BufRead,
    W: Write,
{
    let mut answered = 0;
    let mut line = Vec::new();
    while read_capped_line(&mut input, &mut line).context("reading query line")? {
        while matches!(line.last(), Some(b'\n' | b'\r')) {
            line.pop();
        }
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let result = match parse_query(&line) {
            Ok(query) => answer(service, &query),
            Err(error) => {
                tracing::warn!(%error, "rejected query line");
                QueryResult::error(error.code())
            }
        };
        serde_json::to_writer(&mut output, &result)?;
        output.write_all(b"\n")?;
        answered += 1;
    }
    output.flush()?;
    Ok(answered)
}

/// Reads one line into `buf`, keeping at most `MAX_QUERY_BYTES + 1` bytes and
/// discarding the rest of a longer line. Returns `false` at end of input.
fn read_capped_line<I: BufRead>(input: &mut I, buf: &mut Vec<u8>) -> std::io::Result<bool> {
    buf.clear();
    let limit = u64::try_from(MAX_QUERY_BYTES + 1).unwrap_or(u64::MAX);
    let read = (&mut *input).take(limit).read_until(b'\n', buf)?;
    if read == 0 {
        return Ok(false);
    }
    if buf.last() != Some(&b'\n') && buf.len() > MAX_QUERY_BYTES {
        discard_rest_of_line(input)?;
    }
    Ok(true)
}

fn discard_rest_of_line<I: BufRead>(input: &mut I) -> std::io::Result<()> {
    loop {
        let available = input.fill_buf()?;
        if available.is_empty() {
            return Ok(());
        }
        if let Some(end) = available.iter().position(|&b| b == b'\n') {
            input.consume(end + 1);
            return Ok(());
        }
        let len = available.len();
        input.consume(len);
    }
}

pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(std::io::stderr)
        .init();
}
