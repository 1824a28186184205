//! Assembly of the grouped report rows.
//!
//! Bands appear in [`AgeBand::REPORT_ORDER`]. Within a band, records outside
//! the transition window come first and records inside it follow, both in
//! their original relative order. Each band ends with a count row and bands
//! are separated by a single blank row.

use itertools::Itertools;

use crate::{
    band::AgeBand,
    extract::Record,
    highlight::{HighlightClass, highlight},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputRow {
    Data(Record),
    Count { band: AgeBand, count: usize },
    Blank,
}

impl OutputRow {
    /// Highlight for this row; only data rows with a name are coloured.
    pub fn highlight(&self) -> HighlightClass {
        match self {
            OutputRow::Data(record) if !record.name.is_empty() => {
                highlight(record.band, record.age)
            }
            _ => HighlightClass::None,
        }
    }
}

pub fn assemble(records: &[Record]) -> Vec<OutputRow> {
    let sections = AgeBand::REPORT_ORDER
        .into_iter()
        .map(|band| {
            let members = records
                .iter()
                .filter(|record| record.band == band)
                .collect::<Vec<_>>();
            (band, members)
        })
        .filter(|(_, members)| !members.is_empty())
        .collect::<Vec<_>>();

    let mut rows = Vec::with_capacity(records.len() + sections.len() * 2);
    for (position, (band, members)) in sections.iter().enumerate() {
        let (sub, main): (Vec<&Record>, Vec<&Record>) = members
            .iter()
            .copied()
            .partition(|record| band.in_transition(record.age));
        rows.extend(
            main.into_iter()
                .chain(sub)
                .map(|record| OutputRow::Data(record.clone())),
        );
        rows.push(OutputRow::Count {
            band: *band,
            count: members.len(),
        });
        if position + 1 < sections.len() {
            rows.push(OutputRow::Blank);
        }
    }
    rows
}

/// Record count per band in report order, skipping empty bands.
pub fn band_counts(rows: &[OutputRow]) -> Vec<(AgeBand, usize)> {
    rows.iter()
        .filter_map(|row| match row {
            OutputRow::Count { band, count } => Some((*band, *count)),
            _ => None,
        })
        .collect_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, age: Option<i32>) -> Record {
        Record {
            name: name.to_string(),
            phone: String::new(),
            id_number: String::new(),
            age,
            band: AgeBand::classify(age),
        }
    }

    #[test]
    fn single_band_has_no_separator() {
        let rows = assemble(&[record("甲", None)]);
        assert_eq!(
            rows,
            vec![
                OutputRow::Data(record("甲", None)),
                OutputRow::Count {
                    band: AgeBand::Unknown,
                    count: 1
                }
            ]
        );
    }

    #[test]
    fn empty_input_yields_no_rows() {
        assert!(assemble(&[]).is_empty());
    }

    #[test]
    fn youth_transition_moves_after_main() {
        let rows = assemble(&[record("甲", Some(21)), record("乙", Some(10)), record("丙", Some(22))]);
        let names = rows
            .iter()
            .filter_map(|row| match row {
                OutputRow::Data(r) => Some(r.name.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["乙", "甲", "丙"]);
    }

    #[test]
    fn unnamed_rows_are_not_highlighted() {
        assert_eq!(OutputRow::Data(record("", Some(3))).highlight(), HighlightClass::None);
        assert_eq!(
            OutputRow::Data(record("甲", Some(3))).highlight(),
            HighlightClass::CareFlag
        );
        assert_eq!(OutputRow::Blank.highlight(), HighlightClass::None);
    }
}
