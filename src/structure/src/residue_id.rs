use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseResidueIdError {
    #[error("residue id '{0}' is missing a chain/number delimiter (':' or '/')")]
    MissingDelimiter(String),

    #[error("residue id '{0}' has an empty chain label")]
    EmptyChain(String),

    #[error("residue id '{0}' has no residue number")]
    MissingNumber(String),

    #[error("residue id '{0}' has an invalid residue number")]
    InvalidNumber(String),

    #[error("residue id '{0}' has trailing characters after the insert code")]
    TrailingCharacters(String),
}

/// Identifies a single residue within a chain: chain label, residue number,
/// and an optional insertion code disambiguating residues that share a
/// number (e.g. PDB residue `100A`).
///
/// Total order is `(chain, number, insert_code)` where `None < Some(_)` for
/// the insert code, matching the PDB convention that un-suffixed residues
/// sort before their lettered insertions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResidueId {
    chain_label: String,
    residue_number: i32,
    insert_code: Option<char>,
}

impl ResidueId {
    pub fn new(chain_label: impl Into<String>, residue_number: i32, insert_code: Option<char>) -> Self {
        Self { chain_label: chain_label.into(), residue_number, insert_code }
    }

    pub fn chain_label(&self) -> &str { &self.chain_label }
    pub fn residue_number(&self) -> i32 { self.residue_number }
    pub fn insert_code(&self) -> Option<char> { self.insert_code }

    fn sort_key(&self) -> (&str, i32, Option<char>) {
        (&self.chain_label, self.residue_number, self.insert_code)
    }
}

impl PartialOrd for ResidueId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ResidueId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl Display for ResidueId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.insert_code {
            Some(ic) => write!(f, "{}:{}{}", self.chain_label, self.residue_number, ic),
            None => write!(f, "{}:{}", self.chain_label, self.residue_number),
        }
    }
}

/// Parses `A:123`, `A:123B`, and `A/123-B` forms.
impl FromStr for ResidueId {
    type Err = ParseResidueIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let delim_pos = s
            .find([':', '/'])
            .ok_or_else(|| ParseResidueIdError::MissingDelimiter(s.to_string()))?;

        let chain = &s[..delim_pos];
        if chain.is_empty() {
            return Err(ParseResidueIdError::EmptyChain(s.to_string()));
        }
        let rest = &s[delim_pos + 1..];

        let digits_end = rest
            .char_indices()
            .find(|(i, c)| !(c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+'))))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());

        let (number_str, remainder) = rest.split_at(digits_end);
        if number_str.is_empty() || number_str == "-" || number_str == "+" {
            return Err(ParseResidueIdError::MissingNumber(s.to_string()));
        }
        let residue_number: i32 = number_str
            .parse()
            .map_err(|_| ParseResidueIdError::InvalidNumber(s.to_string()))?;

        let insert_code = match remainder.chars().next() {
            None => None,
            Some('-') => {
                let mut chars = remainder.chars();
                chars.next();
                match (chars.next(), chars.next()) {
                    (Some(ic), None) => Some(ic),
                    (None, None) => return Err(ParseResidueIdError::TrailingCharacters(s.to_string())),
                    _ => return Err(ParseResidueIdError::TrailingCharacters(s.to_string())),
                }
            }
            Some(ic) => {
                let mut chars = remainder.chars();
                chars.next();
                if chars.next().is_some() {
                    return Err(ParseResidueIdError::TrailingCharacters(s.to_string()));
                }
                Some(ic)
            }
        };

        Ok(ResidueId::new(chain, residue_number, insert_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_form() {
        let id: ResidueId = "A:123".parse().unwrap();
        assert_eq!(id, ResidueId::new("A", 123, None));
    }

    #[test]
    fn parses_attached_insert_code() {
        let id: ResidueId = "A:123B".parse().unwrap();
        assert_eq!(id, ResidueId::new("A", 123, Some('B')));
    }

    #[test]
    fn parses_slash_dash_form() {
        let id: ResidueId = "A/123-B".parse().unwrap();
        assert_eq!(id, ResidueId::new("A", 123, Some('B')));
    }

    #[test]
    fn parses_negative_residue_number() {
        let id: ResidueId = "A:-5".parse().unwrap();
        assert_eq!(id, ResidueId::new("A", -5, None));
    }

    #[test]
    fn rejects_missing_delimiter() {
        assert!("A123".parse::<ResidueId>().is_err());
    }

    #[test]
    fn rejects_missing_number() {
        assert!("A:".parse::<ResidueId>().is_err());
        assert!("A:B".parse::<ResidueId>().is_err());
    }

    #[test]
    fn ordering_places_none_insert_before_some() {
        let no_insert = ResidueId::new("A", 100, None);
        let with_insert = ResidueId::new("A", 100, Some('A'));
        assert!(no_insert < with_insert);
    }

    #[test]
    fn ordering_is_chain_then_number_then_insert() {
        let a1 = ResidueId::new("A", 1, None);
        let a2 = ResidueId::new("A", 2, None);
        let b1 = ResidueId::new("B", 1, None);
        assert!(a1 < a2);
        assert!(a2 < b1);
    }

    #[test]
    fn display_round_trips_through_parse() {
        for id in [
            ResidueId::new("A", 123, None),
            ResidueId::new("A", 123, Some('B')),
            ResidueId::new("H", -7, Some('Z')),
        ] {
            let text = id.to_string();
            let reparsed: ResidueId = text.parse().unwrap();
            assert_eq!(id, reparsed);
        }
    }
}
