pub(crate) mod actions;
pub(crate) mod branches;
pub(crate) mod config;
pub(crate) mod organization;
pub(crate) mod pull_requests;
pub(crate) mod releases;
pub(crate) mod repository;

use std::io::Write;
use std::path::Path;

use futures_util::StreamExt;
use ghkit_github::Transfer;
use tokio::io::AsyncWriteExt;

/// Render transfer progress for the terminal.
pub(crate) fn percent(progress: Option<f64>, transferred: u64) -> String {
    match progress {
        Some(fraction) => format!("{:>3.0}%", fraction * 100.0),
        None => format!("{} bytes", transferred),
    }
}

/// Write a transfer into `path`, reporting progress on `progress` after
/// every chunk. Returns the number of bytes written.
pub(crate) async fn save_transfer(
    mut transfer: Transfer,
    path: &Path,
    label: &str,
    progress: &mut impl Write,
) -> anyhow::Result<u64> {
    let mut file = tokio::fs::File::create(path).await?;

    while let Some(item) = transfer.next().await {
        let (chunk, fraction) = item?;
        file.write_all(&chunk).await?;
        write!(
            progress,
            "\r{} {}",
            label,
            percent(fraction, transfer.transferred())
        )?;
    }
    writeln!(progress)?;

    file.flush().await?;
    Ok(transfer.transferred())
}

/// Display for optional model fields.
pub(crate) fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}
