// MathQuery CLI Entry Point
// Resolves the joined arguments as one query, or each non-blank stdin line.

use anyhow::Context;
use mathquery_core::driver::resolve_with_timeout;
use mathquery_core::telemetry::init_tracing;
use mathquery_core::{MathQueryResolver, MathReply, PolyEngine, ResolverConfig};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ResolverConfig::from_env().context("invalid configuration")?;
    init_tracing(config.log_format)?;
    info!(
        max_query_chars = config.max_query_chars,
        query_timeout_ms = config.query_timeout_ms,
        "mathquery starting"
    );

    let resolver = Arc::new(MathQueryResolver::from_config(PolyEngine, &config));
    let budget = config.query_timeout();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        let reply = resolve_with_timeout(resolver, args.join(" "), budget).await?;
        return print_reply(&reply);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        answer(resolver.clone(), line, budget).await?;
    }
    Ok(())
}

async fn answer(
    resolver: Arc<MathQueryResolver>,
    query: String,
    budget: Duration,
) -> anyhow::Result<()> {
    let reply = resolve_with_timeout(resolver, query, budget).await?;
    print_reply(&reply)
}

fn print_reply(reply: &MathReply) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer(&mut stdout, reply)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}
