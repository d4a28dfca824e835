//! # Epoch index
//!
//! Ordered, read-only collection of [`StateVector`]s supporting the three lookups the tracker
//! needs: positional slicing, exact epoch match and nearest epoch to an instant.
//!
//! ## Range policy
//!
//! [`EpochIndex::range`] **clamps** its bounds instead of failing: `limit` is clamped to the
//! number of records and `offset` to `limit`, so an out-of-range request yields a shorter (possibly
//! empty) slice. Text bounds coming from a caller are validated beforehand by
//! [`parse_range_bound`], which is where [`TrackerError::InvalidRange`] is raised.
use hifitime::Epoch;
use itertools::Itertools;

use crate::{oem::StateVector, time::parse_oem_epoch, tracker_errors::TrackerError};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpochIndex {
    records: Vec<StateVector>,
}

impl EpochIndex {
    /// Wrap an already ordered sequence of state vectors.
    ///
    /// Arguments
    /// ---------
    /// * `records`: state vectors in strictly ascending epoch order
    ///
    /// Return
    /// ------
    /// * the index, or [`TrackerError::MalformedFeed`] naming the first record whose epoch is not
    ///   strictly after its predecessor (duplicates included)
    pub fn new(records: Vec<StateVector>) -> Result<Self, TrackerError> {
        if let Some((position, (_, next))) = records
            .iter()
            .tuple_windows()
            .find_position(|(prev, next)| next.epoch <= prev.epoch)
        {
            return Err(TrackerError::MalformedFeed {
                record: position + 1,
                epoch: next.epoch_text(),
                field: "EPOCH",
                reason: "epoch is not after the previous state vector".into(),
            });
        }

        Ok(EpochIndex { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[StateVector] {
        &self.records
    }

    /// Records in positions `[offset, limit)`, bounds clamped as described in the module docs.
    ///
    /// Arguments
    /// ---------
    /// * `offset`: first position, `0` when `None`
    /// * `limit`: position after the last one, the number of records when `None`
    pub fn range(&self, offset: Option<usize>, limit: Option<usize>) -> &[StateVector] {
        let end = limit.unwrap_or(self.len()).min(self.len());
        let start = offset.unwrap_or(0).min(end);
        &self.records[start..end]
    }

    /// Record whose epoch is exactly `epoch`.
    pub fn get(&self, epoch: &Epoch) -> Option<&StateVector> {
        let idx = self.records.partition_point(|sv| sv.epoch < *epoch);
        self.records.get(idx).filter(|sv| sv.epoch == *epoch)
    }

    /// Record whose epoch matches the text `epoch_text` (feed format).
    ///
    /// Return
    /// ------
    /// * [`TrackerError::InvalidEpoch`] if the text is not a feed epoch
    /// * [`TrackerError::EpochNotFound`] if no record carries that epoch
    pub fn by_epoch(&self, epoch_text: &str) -> Result<&StateVector, TrackerError> {
        let epoch = parse_oem_epoch(epoch_text)?;
        self.get(&epoch)
            .ok_or_else(|| TrackerError::EpochNotFound(epoch_text.to_string()))
    }

    /// Record with the smallest absolute time difference to `now`.
    ///
    /// When `now` falls exactly halfway between two records, the earlier one is returned.
    ///
    /// Arguments
    /// ---------
    /// * `now`: the reference instant, supplied by the caller (usually the wall clock)
    ///
    /// Return
    /// ------
    /// * the nearest record, or [`TrackerError::EmptyDataset`]
    pub fn nearest_to(&self, now: &Epoch) -> Result<&StateVector, TrackerError> {
        let after = self.records.partition_point(|sv| sv.epoch < *now);

        let before = after.checked_sub(1).and_then(|idx| self.records.get(idx));
        let after = self.records.get(after);

        match (before, after) {
            (Some(before), Some(after)) => {
                if (*now - before.epoch).abs() <= (after.epoch - *now).abs() {
                    Ok(before)
                } else {
                    Ok(after)
                }
            }
            (Some(only), None) | (None, Some(only)) => Ok(only),
            (None, None) => Err(TrackerError::EmptyDataset),
        }
    }

    /// First and last records, i.e. the time span covered by the dataset.
    pub fn span(&self) -> Result<(&StateVector, &StateVector), TrackerError> {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => Ok((first, last)),
            _ => Err(TrackerError::EmptyDataset),
        }
    }
}

/// Validate a textual `offset`/`limit` bound.
///
/// Arguments
/// ---------
/// * `name`: the bound name, used in the error message
/// * `text`: the raw value, `None` when the caller did not provide it
///
/// Return
/// ------
/// * `Ok(None)` when absent, `Ok(Some(n))` for a non-negative integer,
///   [`TrackerError::InvalidRange`] otherwise
pub fn parse_range_bound(name: &str, text: Option<&str>) -> Result<Option<usize>, TrackerError> {
    text.map(|raw| {
        raw.trim().parse::<usize>().map_err(|_| {
            TrackerError::InvalidRange(format!(
                "{name} must be a non-negative integer, got '{raw}'"
            ))
        })
    })
    .transpose()
}
