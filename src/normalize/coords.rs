use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static DECIMAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(\d+(?:\.\d+)?)°([NSEW])$"#).unwrap());
static DMS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(\d+)°(\d+)'([\d.]+)"([NSEW])$"#).unwrap());

#[derive(Debug, Error)]
pub enum CoordError {
    #[error("invalid coordinate token: {0:?}")]
    InvalidToken(String),

    #[error("expected two coordinate tokens, got {0}")]
    TokenCount(usize),
}

/// Parse a coordinate pair string into signed decimal degrees.
///
/// The input must contain exactly two whitespace-separated tokens, latitude
/// then longitude. Each token is parsed independently; if either fails the
/// whole pair fails and the caller is expected to drop the record rather
/// than carry partial data.
pub fn parse_coordinate_pair(input: &str) -> Result<(f64, f64), CoordError> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    if tokens.len() != 2 {
        return Err(CoordError::TokenCount(tokens.len()));
    }
    Ok((parse_token(tokens[0])?, parse_token(tokens[1])?))
}

/// Parse a single coordinate token.
///
/// The decimal-degree grammar is tried before DMS, so a bare integer with a
/// compass letter (`34°N`) parses as 34.0 rather than as truncated DMS.
fn parse_token(token: &str) -> Result<f64, CoordError> {
    if let Some(caps) = DECIMAL_RE.captures(token) {
        let degrees: f64 = caps[1]
            .parse()
            .map_err(|_| CoordError::InvalidToken(token.to_string()))?;
        return Ok(apply_direction(degrees, &caps[2]));
    }

    if let Some(caps) = DMS_RE.captures(token) {
        let degrees: f64 = caps[1]
            .parse()
            .map_err(|_| CoordError::InvalidToken(token.to_string()))?;
        let minutes: f64 = caps[2]
            .parse()
            .map_err(|_| CoordError::InvalidToken(token.to_string()))?;
        // `[\d.]+` admits strings like "1.2.3" that are not valid numbers,
        // so this parse can genuinely fail.
        let seconds: f64 = caps[3]
            .parse()
            .map_err(|_| CoordError::InvalidToken(token.to_string()))?;
        let value = degrees + minutes / 60.0 + seconds / 3600.0;
        return Ok(apply_direction(value, &caps[4]));
    }

    Err(CoordError::InvalidToken(token.to_string()))
}

/// South and west are negative; north and east positive.
fn apply_direction(value: f64, direction: &str) -> f64 {
    match direction {
        "S" | "W" => -value,
        _ => value,
    }
}
