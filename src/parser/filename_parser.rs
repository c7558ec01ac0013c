//! Parser for coincidence table file names

use crate::error::{LxePetError, Result};
use winnow::{
    Parser,
    combinator::eof,
    error::ContextError,
    stream::AsChar,
    token::take_while,
};

/// Parses `coincidence_<material>_src<dist>cm.csv` into `(material, dist)`.
///
/// The material is ASCII alphanumeric; the distance is the raw run of digits
/// and dots, left unparsed.
pub fn parse_coincidence_name<'a>(input: &mut &'a str) -> std::result::Result<(&'a str, &'a str), ContextError> {
    (
        "coincidence_",
        take_while(1.., AsChar::is_alphanum),
        "_src",
        take_while(1.., ('0'..='9', '.')),
        "cm.csv",
        eof,
    )
        .map(|(_, material, _, distance, _, _)| (material, distance))
        .parse_next(input)
}

/// Extract material and source distance (cm) from a coincidence table name
pub fn parse_coincidence_filename(file_name: &str) -> Result<(String, f64)> {
    let mut input = file_name;
    let (material, distance) = parse_coincidence_name(&mut input)
        .map_err(|_| LxePetError::InvalidFilename(file_name.to_string()))?;
    let distance: f64 = distance
        .parse()
        .map_err(|_| LxePetError::InvalidFilename(file_name.to_string()))?;
    Ok((material.to_string(), distance))
}
