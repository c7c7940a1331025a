use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Marker written to disk (and returned by OMDb) when no rating is known.
pub const UNAVAILABLE: &str = "N/A";

/// The full catalog for one session, keyed by title.
pub type Catalog = BTreeMap<String, Movie>;

/// One catalog entry. The title is the catalog key and is not repeated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub rating: Rating,
    #[serde(deserialize_with = "deserialize_release")]
    pub release: i32,
    #[serde(default)]
    pub poster: Option<String>,
}

impl Movie {
    pub fn new(rating: Rating, release: i32, poster: Option<String>) -> Self {
        Self {
            rating,
            release,
            poster,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rating {
    Score(f64),
    Unavailable,
}

impl Rating {
    pub fn score(&self) -> Option<f64> {
        match self {
            Rating::Score(s) => Some(*s),
            Rating::Unavailable => None,
        }
    }

    /// Key used by the sorted view: unavailable ratings rank below every score.
    pub fn sort_key(&self) -> f64 {
        self.score().unwrap_or(f64::NEG_INFINITY)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rating::Score(s) => write!(f, "{}", s),
            Rating::Unavailable => f.write_str(UNAVAILABLE),
        }
    }
}

impl FromStr for Rating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(UNAVAILABLE) {
            return Ok(Rating::Unavailable);
        }
        match s.parse::<f64>() {
            Ok(score) if score.is_finite() => Ok(Rating::Score(score)),
            _ => Err(format!("'{}' is not a rating", s)),
        }
    }
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Rating::Score(s) => serializer.serialize_f64(*s),
            Rating::Unavailable => serializer.serialize_str(UNAVAILABLE),
        }
    }
}

struct RatingVisitor;

impl<'de> de::Visitor<'de> for RatingVisitor {
    type Value = Rating;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a numeric rating or \"N/A\"")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Rating, E> {
        if !v.is_finite() {
            return Err(E::custom(format!("'{}' is not a rating", v)));
        }
        Ok(Rating::Score(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Rating, E> {
        Ok(Rating::Score(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Rating, E> {
        Ok(Rating::Score(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Rating, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Rating, E> {
        Ok(Rating::Unavailable)
    }

    fn visit_none<E: de::Error>(self) -> Result<Rating, E> {
        Ok(Rating::Unavailable)
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RatingVisitor)
    }
}

/// Reads the leading year out of strings like `"1994"` or `"2008–2013"`.
pub fn parse_year(s: &str) -> Option<i32> {
    let digits: String = s
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

struct ReleaseVisitor;

impl<'de> de::Visitor<'de> for ReleaseVisitor {
    type Value = i32;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a release year")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i32, E> {
        i32::try_from(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i32, E> {
        i32::try_from(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<i32, E> {
        parse_year(v).ok_or_else(|| E::custom(format!("'{}' is not a release year", v)))
    }
}

pub(crate) fn deserialize_release<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<i32, D::Error> {
    deserializer.deserialize_any(ReleaseVisitor)
}
