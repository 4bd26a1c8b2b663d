//! Closed enums for the plottable columns of the compound table.
//!
//! The UI offers column names as strings; everything past that boundary works
//! on these enums, so a misspelled axis can only fail here, as
//! `FieldNotFound`, and never inside a chart build.

use crate::error::ExplorerError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericField {
    Molregno,
    AlogP,
    Psa,
    MwFreebase,
    MaxPhase,
    Le,
    Lle,
}

impl NumericField {
    pub const ALL: [NumericField; 7] = [
        NumericField::Molregno,
        NumericField::AlogP,
        NumericField::Psa,
        NumericField::MwFreebase,
        NumericField::MaxPhase,
        NumericField::Le,
        NumericField::Lle,
    ];

    /// Column name in the dataset CSV, also used as the axis title.
    pub fn column(&self) -> &'static str {
        match self {
            NumericField::Molregno => "molregno",
            NumericField::AlogP => "alogp",
            NumericField::Psa => "psa",
            NumericField::MwFreebase => "mw_freebase",
            NumericField::MaxPhase => "max_phase",
            NumericField::Le => "le",
            NumericField::Lle => "lle",
        }
    }

    pub fn parse(name: &str) -> Result<Self, ExplorerError> {
        Self::ALL
            .iter()
            .find(|field| field.column() == name)
            .copied()
            .ok_or_else(|| ExplorerError::FieldNotFound(name.to_owned()))
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// What the z axis (and with it the colour channel) is read from: a dataset
/// column, or the rank pseudo-column derived from the current x and y fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisChoice {
    Field(NumericField),
    Rank,
}

impl AxisChoice {
    /// Dropdown label for the rank pseudo-column.
    pub const RANK_LABEL: &'static str = "rank X * Y";

    pub fn title(&self) -> &'static str {
        match self {
            AxisChoice::Field(field) => field.column(),
            AxisChoice::Rank => "rank",
        }
    }

    pub fn parse(name: &str) -> Result<Self, ExplorerError> {
        if name == "rank" {
            Ok(AxisChoice::Rank)
        } else {
            NumericField::parse(name).map(AxisChoice::Field)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_column() {
        for field in NumericField::ALL {
            assert_eq!(NumericField::parse(field.column()).unwrap(), field);
        }
    }

    #[test]
    fn test_parse_unknown_column() {
        let err = NumericField::parse("full_molformula").unwrap_err();
        assert!(matches!(err, ExplorerError::FieldNotFound(name) if name == "full_molformula"));
    }

    #[test]
    fn test_molregno_is_a_plottable_column() {
        assert_eq!(
            NumericField::parse("molregno").unwrap(),
            NumericField::Molregno
        );
    }

    #[test]
    fn test_parse_axis_choice() {
        assert_eq!(AxisChoice::parse("rank").unwrap(), AxisChoice::Rank);
        assert_eq!(
            AxisChoice::parse("lle").unwrap(),
            AxisChoice::Field(NumericField::Lle)
        );
        assert!(AxisChoice::parse("combined").is_err());
    }

    #[test]
    fn test_axis_titles() {
        assert_eq!(AxisChoice::Rank.title(), "rank");
        assert_eq!(AxisChoice::Field(NumericField::MaxPhase).title(), "max_phase");
    }
}
