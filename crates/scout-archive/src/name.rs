//! # Carrier File Names
//!
//! Stored carriers are named `team-match-timestamp.svg`. The name is the only
//! metadata a listing can show without decoding the payload.
//!
//! Parsing splits on `-` with no escaping, so a team or match identifier
//! that itself contains a hyphen shifts the remaining parts. Existing files
//! on devices already use this scheme, and parsing is display-only, so the
//! split stays as is.

use std::fmt;

use serde::{Deserialize, Serialize};

use scout_core::{MatchRecord, Schema, Timestamp};

/// Suffix of every carrier file.
pub const CARRIER_EXTENSION: &str = ".svg";

/// Placeholder for identifiers missing from a record.
pub const UNKNOWN: &str = "unknown";

/// Field names the file name is built from.
pub const TEAM_FIELD: &str = "Team Number";
pub const MATCH_FIELD: &str = "Match Number";

/// Display identifiers of a stored carrier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CarrierName {
    pub team: String,
    pub match_number: String,
    pub timestamp: String,
}

impl CarrierName {
    /// Build a name from the identifying fields of a record.
    ///
    /// Missing or empty values become `"unknown"`.
    pub fn for_record(schema: &Schema, record: &MatchRecord, timestamp: &Timestamp) -> Self {
        let ident = |name| {
            record
                .value_by_name(schema, name)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| UNKNOWN.to_string())
        };
        Self {
            team: ident(TEAM_FIELD),
            match_number: ident(MATCH_FIELD),
            timestamp: timestamp.unix_seconds().to_string(),
        }
    }

    /// Parse a file name, best effort.
    ///
    /// Missing parts are empty; parts beyond the third are ignored.
    pub fn parse(file_name: &str) -> Self {
        let stem = file_name
            .strip_suffix(CARRIER_EXTENSION)
            .unwrap_or(file_name);
        let mut parts = stem.split('-');
        let mut next = || parts.next().unwrap_or_default().to_string();
        let name = Self {
            team: next(),
            match_number: next(),
            timestamp: next(),
        };
        if stem.split('-').count() > 3 {
            tracing::debug!(file_name, "carrier name has extra hyphenated parts");
        }
        name
    }

    /// The file name for this carrier.
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}-{}{CARRIER_EXTENSION}",
            self.team, self.match_number, self.timestamp
        )
    }

    /// The file name with a trailing sequence number, for a second carrier
    /// with the same identifiers. Parsing ignores the extra part.
    pub fn numbered_file_name(&self, n: u32) -> String {
        format!(
            "{}-{}-{}-{n}{CARRIER_EXTENSION}",
            self.team, self.match_number, self.timestamp
        )
    }
}

impl fmt::Display for CarrierName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Team {}, Match {}", self.team, self.match_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_core::{Field, FieldId, FieldKind, Section, TextProps};

    #[test]
    fn parse_three_parts() {
        let name = CarrierName::parse("254-12-1700000000.svg");
        assert_eq!(name.team, "254");
        assert_eq!(name.match_number, "12");
        assert_eq!(name.timestamp, "1700000000");
        assert_eq!(name.file_name(), "254-12-1700000000.svg");
    }

    #[test]
    fn parse_missing_parts_are_empty() {
        let name = CarrierName::parse("254.svg");
        assert_eq!(name.team, "254");
        assert_eq!(name.match_number, "");
        assert_eq!(name.timestamp, "");
    }

    #[test]
    fn hyphenated_team_shifts_parts() {
        let name = CarrierName::parse("frc-254-12-1700000000.svg");
        assert_eq!(name.team, "frc");
        assert_eq!(name.match_number, "254");
        assert_eq!(name.timestamp, "12");
    }

    #[test]
    fn numbered_name_parses_to_same_identifiers() {
        let name = CarrierName::parse("254-12-1700000000.svg");
        let numbered = name.numbered_file_name(2);
        assert_eq!(numbered, "254-12-1700000000-2.svg");
        assert_eq!(CarrierName::parse(&numbered), name);
    }

    #[test]
    fn for_record_uses_identifying_fields() {
        let schema = Schema::new(
            "s",
            vec![Section {
                title: "Info".into(),
                fields: vec![
                    Field::new(1, "Team Number", true, FieldKind::Text(TextProps::default())),
                    Field::new(2, "match number ", true, FieldKind::Text(TextProps::default())),
                ],
            }],
        );
        let mut record = MatchRecord::new();
        record.set(FieldId(1), "254");
        let ts = Timestamp::from_unix_seconds(1_700_000_000).unwrap();

        let name = CarrierName::for_record(&schema, &record, &ts);
        assert_eq!(name.file_name(), "254-unknown-1700000000.svg");

        record.set(FieldId(2), "12");
        let name = CarrierName::for_record(&schema, &record, &ts);
        assert_eq!(name.file_name(), "254-12-1700000000.svg");
    }
}
