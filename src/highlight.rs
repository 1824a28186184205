use serde::Serialize;

use crate::band::AgeBand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HighlightClass {
    None,
    /// Children and seniors.
    CareFlag,
    /// Adults in the 23-25 window.
    TransitionA,
    /// Youths in the 21-23 window.
    TransitionB,
}

impl HighlightClass {
    /// Solid fill colour for rows of this class, as an RGB hex string.
    pub fn fill_color(&self) -> Option<&'static str> {
        match self {
            HighlightClass::None => None,
            HighlightClass::CareFlag => Some("#FFFF00"),
            HighlightClass::TransitionA => Some("#92D050"),
            HighlightClass::TransitionB => Some("#00B0F0"),
        }
    }
}

pub fn highlight(band: AgeBand, age: Option<i32>) -> HighlightClass {
    match band {
        AgeBand::Child | AgeBand::Senior => HighlightClass::CareFlag,
        AgeBand::Adult if band.in_transition(age) => HighlightClass::TransitionA,
        AgeBand::Youth if band.in_transition(age) => HighlightClass::TransitionB,
        _ => HighlightClass::None,
    }
}
