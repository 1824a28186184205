//! Column detection for rosters whose headers cannot be trusted.
//!
//! Every column is scored against the three field predicates from
//! [`crate::patterns`] using a bounded sample of its non-missing cells. Fields
//! are then resolved greedily in a fixed priority: ID first, then phone, then
//! name. A column claimed by a higher-priority field is never offered to a
//! lower one, so an ID column full of digits can never be stolen by the phone
//! predicate.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{config::ManualNames, error::RosterError, patterns, sheet::RawTable};

/// Maximum number of non-missing cells sampled per column.
pub const SAMPLE_LIMIT: usize = 100;
/// A field is accepted only when its best column scores strictly above this.
pub const DETECTION_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Phone,
    Id,
}

impl Field {
    /// Resolution order used by [`resolve`].
    pub const PRIORITY: [Field; 3] = [Field::Id, Field::Phone, Field::Name];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Phone => "phone",
            Field::Id => "id",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fraction of sampled cells matching each field predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ColumnScore {
    pub name: f64,
    pub phone: f64,
    pub id: f64,
}

impl ColumnScore {
    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::Name => self.name,
            Field::Phone => self.phone,
            Field::Id => self.id,
        }
    }
}

/// Column positions chosen for each field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldAssignment {
    pub name: usize,
    pub phone: usize,
    pub id: usize,
}

impl FieldAssignment {
    pub fn column(&self, field: Field) -> usize {
        match field {
            Field::Name => self.name,
            Field::Phone => self.phone,
            Field::Id => self.id,
        }
    }

    pub fn describe(&self, table: &RawTable) -> String {
        format!(
            "name = '{}', phone = '{}', id = '{}'",
            table.column_name(self.name),
            table.column_name(self.phone),
            table.column_name(self.id)
        )
    }
}

pub fn score_column(cells: &[Option<String>]) -> ColumnScore {
    let mut sampled = 0usize;
    let (mut name, mut phone, mut id) = (0usize, 0usize, 0usize);
    for value in cells.iter().flatten().take(SAMPLE_LIMIT) {
        sampled += 1;
        if patterns::matches_phone(value) {
            phone += 1;
        }
        if patterns::matches_id(value) {
            id += 1;
        }
        if patterns::matches_name(value) {
            name += 1;
        }
    }
    if sampled == 0 {
        return ColumnScore::default();
    }
    let total = sampled as f64;
    ColumnScore {
        name: name as f64 / total,
        phone: phone as f64 / total,
        id: id as f64 / total,
    }
}

pub fn score_columns(table: &RawTable) -> Vec<ColumnScore> {
    table
        .columns
        .iter()
        .map(|column| {
            let score = score_column(&column.cells);
            debug!(
                "Column '{}' scores: name={:.2} phone={:.2} id={:.2}",
                column.name, score.name, score.phone, score.id
            );
            score
        })
        .collect()
}

/// Scores `table` and resolves one column per field.
pub fn detect(table: &RawTable) -> Result<FieldAssignment, RosterError> {
    resolve(&score_columns(table))
}

/// Greedy resolution in [`Field::PRIORITY`] order over precomputed scores.
pub fn resolve(scores: &[ColumnScore]) -> Result<FieldAssignment, RosterError> {
    let mut claimed = Vec::with_capacity(3);
    let mut missing = Vec::new();
    let mut chosen = [None; 3];
    for (slot, field) in Field::PRIORITY.into_iter().enumerate() {
        match best_column(scores, field, &claimed) {
            Some(column) => {
                claimed.push(column);
                chosen[slot] = Some(column);
            }
            None => missing.push(field),
        }
    }
    match chosen {
        [Some(id), Some(phone), Some(name)] => Ok(FieldAssignment { name, phone, id }),
        _ => {
            missing.sort();
            Err(RosterError::AmbiguousColumns { missing })
        }
    }
}

// First column wins ties, matching left-to-right reading order.
fn best_column(scores: &[ColumnScore], field: Field, claimed: &[usize]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, score) in scores.iter().enumerate() {
        if claimed.contains(&idx) {
            continue;
        }
        let value = score.get(field);
        if best.is_none_or(|(_, top)| value > top) {
            best = Some((idx, value));
        }
    }
    best.filter(|(_, top)| *top > DETECTION_THRESHOLD)
        .map(|(idx, _)| idx)
}

/// Looks up explicitly configured column names instead of detecting them.
pub fn resolve_manual(
    table: &RawTable,
    names: &ManualNames,
) -> Result<FieldAssignment, RosterError> {
    let lookup = [&names.name, &names.phone, &names.id].map(|name| table.column_index(name));
    let missing = [&names.name, &names.phone, &names.id]
        .iter()
        .zip(lookup.iter())
        .filter(|(_, found)| found.is_none())
        .map(|(name, _)| name.to_string())
        .collect::<Vec<_>>();
    match lookup {
        [Some(name), Some(phone), Some(id)] => Ok(FieldAssignment { name, phone, id }),
        _ => Err(RosterError::ManualColumnNotFound { missing }),
    }
}
