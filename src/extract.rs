//! Per-row normalization of the detected name, phone and ID columns.
//!
//! Extraction never fails: a value that does not match its pattern becomes an
//! empty string, and an ID whose embedded birth date is not a real calendar
//! date yields no age and the [`AgeBand::Unknown`] band.

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;

use crate::{
    band::AgeBand,
    detect::FieldAssignment,
    patterns::{self, BIRTH_DATE_RANGE},
    sheet::RawTable,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub name: String,
    pub phone: String,
    pub id_number: String,
    pub age: Option<i32>,
    pub band: AgeBand,
}

impl Record {
    /// Builds a record from raw cell text, deriving the age as of `today`.
    pub fn from_raw(name: &str, phone: &str, id: &str, today: NaiveDate) -> Self {
        let id_number = patterns::extract_id(id);
        let age = age_on(&id_number, today);
        Self {
            name: name.trim().to_string(),
            phone: patterns::extract_phone(phone),
            id_number,
            age,
            band: AgeBand::classify(age),
        }
    }
}

/// Birth date embedded in a canonical ID number.
pub fn birth_date(id_number: &str) -> Option<NaiveDate> {
    let digits = id_number.get(BIRTH_DATE_RANGE)?;
    NaiveDate::parse_from_str(digits, "%Y%m%d").ok()
}

/// Completed years between the ID's birth date and `today`.
pub fn age_on(id_number: &str, today: NaiveDate) -> Option<i32> {
    if id_number.is_empty() {
        return None;
    }
    let born = birth_date(id_number)?;
    let mut age = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        age -= 1;
    }
    Some(age)
}

/// One [`Record`] per table row, in row order, aged as of the local date.
pub fn extract(table: &RawTable, assignment: &FieldAssignment) -> Vec<Record> {
    extract_as_of(table, assignment, Local::now().date_naive())
}

pub fn extract_as_of(
    table: &RawTable,
    assignment: &FieldAssignment,
    today: NaiveDate,
) -> Vec<Record> {
    (0..table.row_count())
        .map(|row| {
            Record::from_raw(
                table.cell(assignment.name, row).unwrap_or(""),
                table.cell(assignment.phone, row).unwrap_or(""),
                table.cell(assignment.id, row).unwrap_or(""),
                today,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn age_drops_a_year_before_the_birthday() {
        let id = "110101199006151234";
        assert_eq!(age_on(id, day(2024, 6, 14)), Some(33));
        assert_eq!(age_on(id, day(2024, 6, 15)), Some(34));
        assert_eq!(age_on(id, day(2024, 12, 31)), Some(34));
    }

    #[test]
    fn leap_day_birthdays_age_on_march_first() {
        let id = "110101200002291234";
        assert_eq!(age_on(id, day(2023, 2, 28)), Some(22));
        assert_eq!(age_on(id, day(2023, 3, 1)), Some(23));
    }

    #[test]
    fn calendar_invalid_birth_date_has_no_age() {
        let record = Record::from_raw("王五", "", "110101199002301234", day(2024, 1, 1));
        assert_eq!(record.id_number, "110101199002301234");
        assert_eq!(record.age, None);
        assert_eq!(record.band, AgeBand::Unknown);
    }

    #[test]
    fn raw_fields_are_cleaned() {
        let record = Record::from_raw(
            "  张三 ",
            "手机:13912345678",
            "身份证 11010120200101123x",
            day(2024, 6, 1),
        );
        assert_eq!(record.name, "张三");
        assert_eq!(record.phone, "13912345678");
        assert_eq!(record.id_number, "11010120200101123X");
        assert_eq!(record.age, Some(4));
        assert_eq!(record.band, AgeBand::Child);
    }
}
