use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;
use tracing::debug;

use crate::{errors::CatalogError, types::SchemaUpdate};

static UPDATE_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)-(.*)\.sql$").expect("update filename pattern is valid"));

/// Parses `<digits>-<name>.sql` into an update.
pub fn parse_update(filename: &str) -> Result<SchemaUpdate, CatalogError> {
    let malformed = || CatalogError::MalformedFilename {
        filename: filename.to_string(),
    };

    let captures = UPDATE_FILENAME.captures(filename).ok_or_else(malformed)?;
    let index = captures[1].parse::<i64>().map_err(|_| malformed())?;

    Ok(SchemaUpdate::new(&captures[2], index, filename))
}

/// Parses every entry and orders the result by index, then filename.
pub fn load_catalog<I, S>(entries: I) -> Result<Vec<SchemaUpdate>, CatalogError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let catalog = entries
        .into_iter()
        .map(|entry| parse_update(entry.as_ref()))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .sorted_by(|a, b| a.index.cmp(&b.index).then_with(|| a.filename.cmp(&b.filename)))
        .collect::<Vec<_>>();

    debug!("Loaded catalog with {} update(s)", catalog.len());
    Ok(catalog)
}

/// Requires each index to be exactly one more than the previous one.
///
/// Reports the first offending pair, scanning from the lowest index.
pub fn validate_sequence(catalog: &[SchemaUpdate]) -> Result<(), CatalogError> {
    match catalog
        .iter()
        .tuple_windows()
        .find(|(prev, next)| prev.index.checked_add(1) != Some(next.index))
    {
        Some((prev, next)) => Err(CatalogError::SequenceGap {
            at: prev.filename.clone(),
            next: next.filename.clone(),
        }),
        None => Ok(()),
    }
}

/// Keeps updates whose index lies within the inclusive bounds.
pub fn restrict_range(
    catalog: Vec<SchemaUpdate>,
    start: Option<i64>,
    end: Option<i64>,
) -> Result<Vec<SchemaUpdate>, CatalogError> {
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(CatalogError::InvalidRange { start, end });
        }
    }

    Ok(catalog
        .into_iter()
        .filter(|u| start.is_none_or(|s| u.index >= s))
        .filter(|u| end.is_none_or(|e| u.index <= e))
        .collect())
}
