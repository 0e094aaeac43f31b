use std::io::Write;

use anyhow::Context;

fn main() -> anyhow::Result<()> {
    stockbook_observability::init();

    let config = stockbook_cli::Config::from_env();
    tracing::debug!(path = %config.inventory_path.display(), "starting demo");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    stockbook_cli::demo::run(&config, &mut out).context("failed to write report to stdout")?;
    out.flush().context("failed to flush stdout")?;

    Ok(())
}
