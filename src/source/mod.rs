//! Reading activity records from a contributions document. The document is whatever an external
//! refresher last saved, either:
//!   - a bare list of records, or
//!   - the `{ "total": {..}, "contributions": [..] }` envelope of the public GitHub contributions
//!     API.

use std::{collections::BTreeMap, io::ErrorKind, path::Path};

use anyhow::{Context, Result};
use fs4::tokio::AsyncFileExt;
use serde::Deserialize;
use tokio::{
    fs::File,
    io::{AsyncRead, AsyncReadExt},
};
use tracing::{debug, instrument, warn};

use crate::grid::entities::ActivityRecord;

/// Path meaning "read the document from stdin".
pub const STDIN_PATH: &str = "-";

#[derive(PartialEq, Eq, Debug, Default, Clone)]
pub struct ContributionsDocument {
    pub contributions: Vec<ActivityRecord>,
    /// Totals reported by the source, keyed by year (or by a period name like `lastYear`).
    pub yearly_totals: BTreeMap<String, u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDocument {
    Envelope {
        #[serde(default)]
        total: BTreeMap<String, u64>,
        contributions: Vec<ActivityRecord>,
    },
    Records(Vec<ActivityRecord>),
}

impl From<RawDocument> for ContributionsDocument {
    fn from(value: RawDocument) -> Self {
        match value {
            RawDocument::Envelope {
                total,
                contributions,
            } => ContributionsDocument {
                contributions,
                yearly_totals: total,
            },
            RawDocument::Records(contributions) => ContributionsDocument {
                contributions,
                yearly_totals: BTreeMap::new(),
            },
        }
    }
}

pub fn parse_contributions(text: &str) -> Result<ContributionsDocument> {
    let raw = serde_json::from_str::<RawDocument>(text)
        .context("Expected a list of {date, count, level} records or a contributions envelope")?;
    Ok(raw.into())
}

/// Loads a contributions document from `path`, or from stdin for [STDIN_PATH].
///
/// The file is read under a shared lock, so a refresher rewriting it under an exclusive lock is
/// never seen half way. A missing file yields an empty document.
#[instrument]
pub async fn load_contributions(path: &Path) -> Result<ContributionsDocument> {
    let text = if path == Path::new(STDIN_PATH) {
        read_stream(tokio::io::stdin())
            .await
            .context("Failed to read contributions from stdin")?
    } else {
        match read_locked(path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("No contributions at {path:?}, continuing without activity");
                return Ok(ContributionsDocument::default());
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to read {path:?}")),
        }
    };

    let document = parse_contributions(&text)
        .with_context(|| format!("Failed to parse contributions from {path:?}"))?;
    debug!("Loaded {} records", document.contributions.len());
    Ok(document)
}

async fn read_stream(mut reader: impl AsyncRead + Unpin) -> std::io::Result<String> {
    let mut text = String::new();
    reader.read_to_string(&mut text).await?;
    Ok(text)
}

async fn read_locked(path: &Path) -> std::result::Result<String, std::io::Error> {
    let mut file = File::open(path).await?;
    file.lock_shared()?;
    let mut text = String::new();
    let read = file.read_to_string(&mut text).await;
    file.unlock_async().await?;
    read?;
    Ok(text)
}
