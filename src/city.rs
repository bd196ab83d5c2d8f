//! The ordered list of city names records are drawn from.

use std::fs;
use std::path::Path;

use failure::{Error, ResultExt};

use crate::error::GenError;

const DEFAULT_CITIES: &str = include_str!("../data/cities.txt");

/// Field delimiter of a record, can't appear inside a city name.
pub const DELIMITER: u8 = b';';

#[derive(Debug, Clone, PartialEq)]
pub struct CityList {
    names: Vec<String>,
}

impl CityList {
    /// The list shipped with the binary.
    pub fn embedded() -> Result<CityList, GenError> {
        CityList::parse(DEFAULT_CITIES)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<CityList, Error> {
        let path = path.as_ref();

        log::debug!("Load city list from {}", path.display());

        let text = fs::read_to_string(path)
            .with_context(|_| format!("Can't read city list {}", path.display()))?;

        Ok(CityList::parse(&text)?)
    }

    /// Parse one name per line, surrounding blank lines are ignored.
    ///
    /// A blank line in the middle of the list or a name holding the record
    /// delimiter is rejected.
    pub fn parse(text: &str) -> Result<CityList, GenError> {
        let text = text.trim();

        if text.is_empty() {
            return Err(GenError::EmptyCityList);
        }

        let names = text
            .lines()
            .enumerate()
            .map(|(index, line)| check_name(index, line.trim_end_matches('\r').to_string()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CityList { names })
    }

    /// Take names as they are, each one must be a valid single-line name.
    pub fn from_names<I, S>(names: I) -> Result<CityList, GenError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| check_name(index, name.into()))
            .collect::<Result<Vec<_>, _>>()?;

        if names.is_empty() {
            return Err(GenError::EmptyCityList);
        }

        Ok(CityList { names })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[inline]
    pub fn name(&self, index: usize) -> &str {
        &self.names[index]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Reject blank names and names holding the delimiter or a line break.
fn check_name(index: usize, name: String) -> Result<String, GenError> {
    let malformed = name.trim().is_empty()
        || name
            .bytes()
            .any(|b| b == DELIMITER || b == b'\n' || b == b'\r');

    if malformed {
        Err(GenError::MalformedCity {
            line: index + 1,
            name,
        })
    } else {
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_outer_whitespace() {
        let list = CityList::parse("\nOslo\r\nLima\nSan José\n\n").unwrap();

        assert_eq!(list.names(), &["Oslo", "Lima", "San José"]);
    }

    #[test]
    fn test_parse_empty() {
        match CityList::parse("  \n\n") {
            Err(GenError::EmptyCityList) => (),
            other => panic!("Unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_delimiter() {
        match CityList::parse("Oslo\nLi;ma") {
            Err(GenError::MalformedCity { line, name }) => {
                assert_eq!(line, 2);
                assert_eq!(name, "Li;ma");
            }
            other => panic!("Unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_inner_blank_line() {
        match CityList::parse("Oslo\n\nLima") {
            Err(GenError::MalformedCity { line, .. }) => assert_eq!(line, 2),
            other => panic!("Unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_from_names_keeps_names_verbatim() {
        let list = CityList::from_names(vec![" Oslo", "San José ", "Lima"]).unwrap();

        assert_eq!(list.names(), &[" Oslo", "San José ", "Lima"]);
    }

    #[test]
    fn test_from_names_rejects_line_break() {
        match CityList::from_names(vec!["Oslo", "Li\nma"]) {
            Err(GenError::MalformedCity { line, name }) => {
                assert_eq!(line, 2);
                assert_eq!(name, "Li\nma");
            }
            other => panic!("Unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_from_names_rejects_blank_and_delimiter() {
        assert!(CityList::from_names(vec!["Oslo", "  "]).is_err());
        assert!(CityList::from_names(vec!["Os;lo"]).is_err());

        match CityList::from_names(Vec::<String>::new()) {
            Err(GenError::EmptyCityList) => (),
            other => panic!("Unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_embedded_list() {
        let list = CityList::embedded().unwrap();

        assert!(list.len() > 100);
        assert_eq!(list.name(0), "Abidjan");
    }
}
