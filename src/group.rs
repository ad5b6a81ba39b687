use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::errors::RegroupError;
use crate::types::{GroupValue, MissingKeyPolicy, Record};

/// Records partitioned by their value under a grouping key.
///
/// Groups keep the order in which their key value was first seen in the input,
/// and each group keeps its records in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedResult {
    groups: Vec<(GroupValue, Vec<Record>)>,
    index: HashMap<GroupValue, usize>,
}

impl GroupedResult {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, value: GroupValue, residual: Record) {
        match self.index.get(&value).copied() {
            Some(slot) => self.groups[slot].1.push(residual),
            None => {
                self.index.insert(value.clone(), self.groups.len());
                self.groups.push((value, vec![residual]));
            }
        }
    }

    /// Number of distinct groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, value: &GroupValue) -> Option<&[Record]> {
        self.index
            .get(value)
            .map(|&slot| self.groups[slot].1.as_slice())
    }

    /// Shorthand for looking up a group whose key value is a string.
    pub fn get_str(&self, value: &str) -> Option<&[Record]> {
        self.get(&GroupValue::from(value))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupValue, &[Record])> {
        self.groups.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &GroupValue> {
        self.groups.iter().map(|(k, _)| k)
    }

    /// Residual records across all groups.
    pub fn total_records(&self) -> usize {
        self.groups.iter().map(|(_, v)| v.len()).sum()
    }

    /// Rebuild full records, group by group, with `group_key` put back in
    /// front of each residual. Records from the missing-key group come back
    /// without the field.
    pub fn flatten(&self, group_key: &str) -> Vec<Record> {
        let mut out = Vec::with_capacity(self.total_records());
        for (value, residuals) in &self.groups {
            for residual in residuals {
                let mut record = Record::new();
                if let GroupValue::Present(v) = value {
                    record.insert(group_key.to_string(), v.clone());
                }
                for (field, v) in residual {
                    record.insert(field.clone(), v.clone());
                }
                out.push(record);
            }
        }
        out
    }
}

/// Serializes as a JSON object keyed by [`GroupValue::label`]. Groups whose
/// labels collide (`7` and `"7"`, or the missing-key group and `"undefined"`)
/// are written as one entry, records in group order, so no key repeats.
impl Serialize for GroupedResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut merged: Vec<(String, Vec<&Record>)> = Vec::with_capacity(self.groups.len());
        let mut slots: HashMap<String, usize> = HashMap::with_capacity(self.groups.len());
        for (value, residuals) in &self.groups {
            let label = value.label();
            match slots.get(&label).copied() {
                Some(slot) => merged[slot].1.extend(residuals),
                None => {
                    slots.insert(label.clone(), merged.len());
                    merged.push((label, residuals.iter().collect()));
                }
            }
        }

        let mut map = serializer.serialize_map(Some(merged.len()))?;
        for (label, residuals) in &merged {
            map.serialize_entry(label, residuals)?;
        }
        map.end()
    }
}

/// Copy of `record` without `group_key`, fields in original order.
fn residual(record: &Record, group_key: &str) -> Record {
    record
        .iter()
        .filter(|(field, _)| field.as_str() != group_key)
        .map(|(field, v)| (field.clone(), v.clone()))
        .collect()
}

/// Group `items` by their value under `group_key`.
///
/// Records without the field land in the [`GroupValue::Missing`] group.
/// The input is left untouched; every residual record is a fresh copy.
pub fn group_by(group_key: &str, items: &[Record]) -> GroupedResult {
    let mut result = GroupedResult::new();
    for item in items {
        result.push(GroupValue::of(item, group_key), residual(item, group_key));
    }
    tracing::debug!(
        key = group_key,
        records = items.len(),
        groups = result.len(),
        "grouped records"
    );
    result
}

/// Like [`group_by`], but lets the caller reject records without the key.
///
/// With [`MissingKeyPolicy::Reject`] the first such record aborts the call and
/// no partial result is returned.
pub fn try_group_by(
    group_key: &str,
    items: &[Record],
    policy: MissingKeyPolicy,
) -> Result<GroupedResult, RegroupError> {
    if policy == MissingKeyPolicy::Sentinel {
        return Ok(group_by(group_key, items));
    }

    let mut result = GroupedResult::new();
    for (index, item) in items.iter().enumerate() {
        let Some(value) = item.get(group_key) else {
            return Err(RegroupError::InvalidRecord {
                index,
                key: group_key.to_string(),
            });
        };
        result.push(GroupValue::Present(value.clone()), residual(item, group_key));
    }
    Ok(result)
}
