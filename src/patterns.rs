//! Matching rules for the three roster fields.
//!
//! Phone and ID predicates are substring searches, so a remark such as
//! `"call 13912345678 after 6pm"` still counts as a phone hit. The name
//! predicate must match the whole trimmed value.
//!
//! The ID pattern only checks the shape of the embedded birth date
//! (day 01-31 for every month). Calendar validity is decided later when the
//! age is derived, see [`crate::extract::age_on`].

use std::sync::OnceLock;

use regex::Regex;

const PHONE_PATTERN: &str = r"1[3-9][0-9]{9}";
const ID_PATTERN: &str =
    r"[1-9][0-9]{5}(?:19|20)[0-9]{2}(?:0[1-9]|1[0-2])(?:0[1-9]|[12][0-9]|3[01])[0-9]{3}[0-9Xx]";
const NAME_PATTERN: &str = r"^[\x{4E00}-\x{9FA5}]{2,4}$";

/// Byte range of the `YYYYMMDD` birth date inside a canonical ID number.
pub const BIRTH_DATE_RANGE: std::ops::Range<usize> = 6..14;

fn phone_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(PHONE_PATTERN).expect("phone pattern compiles"))
}

fn id_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(ID_PATTERN).expect("id pattern compiles"))
}

fn name_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(NAME_PATTERN).expect("name pattern compiles"))
}

pub fn matches_phone(value: &str) -> bool {
    phone_regex().is_match(value)
}

pub fn matches_id(value: &str) -> bool {
    id_regex().is_match(value)
}

/// True when the trimmed value is 2 to 4 CJK ideographs and nothing else.
pub fn matches_name(value: &str) -> bool {
    name_regex().is_match(value.trim())
}

/// First 11-digit mobile number inside `raw`, or an empty string.
pub fn extract_phone(raw: &str) -> String {
    phone_regex()
        .find(raw)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// First 18-character ID number inside `raw` (uppercased), or an empty string.
pub fn extract_id(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    id_regex()
        .find(&upper)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
