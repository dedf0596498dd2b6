//! Deserializers for form-originated JSON, where numbers often arrive as strings.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// `Option<f64>` from a number, a numeric string, or null. Blank strings become `None`.
pub fn opt_f64<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberOrText>::deserialize(de)?;
    match raw {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(s)) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Some(n)),
            _ => Err(serde::de::Error::custom(format!("expected a finite number, got {s:?}"))),
        },
    }
}

/// Like [`opt_f64`] but requires an integral value.
pub fn opt_i64<'de, D>(de: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match opt_f64(de)? {
        None => Ok(None),
        Some(n) if n.fract() == 0.0 && n.is_finite() => Ok(Some(n as i64)),
        Some(n) => Err(serde::de::Error::custom(format!("expected an integer, got {n}"))),
    }
}

/// Rounds any numeric value to `i32`; values that do not parse become `None`.
pub fn opt_i32_rounded<'de, D>(de: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_f64(de)
        .ok()
        .flatten()
        .filter(|n| n.is_finite())
        .map(|n| n.round() as i32))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BoolOrText {
    Bool(bool),
    Text(String),
}

/// Booleans that may arrive as `"yes"` / `"no"` / `"true"` / `"false"`.
pub fn opt_bool<'de, D>(de: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BoolOrText>::deserialize(de).ok().flatten();
    Ok(match raw {
        Some(BoolOrText::Bool(b)) => Some(b),
        Some(BoolOrText::Text(s)) => {
            let s = s.trim().to_lowercase();
            if s.starts_with("yes") || s == "true" || s.starts_with("buy") {
                Some(true)
            } else if s.starts_with("no") || s == "false" || s.starts_with("skip") {
                Some(false)
            } else {
                None
            }
        }
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "opt_f64")]
        grams: Option<f64>,
        #[serde(default, deserialize_with = "opt_i64")]
        rating: Option<i64>,
    }

    fn parse(json: &str) -> Form {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        let f = parse(r#"{"grams": 12.5, "rating": "4"}"#);
        assert_eq!(f.grams, Some(12.5));
        assert_eq!(f.rating, Some(4));

        let f = parse(r#"{"grams": " 30 ", "rating": 5}"#);
        assert_eq!(f.grams, Some(30.0));
        assert_eq!(f.rating, Some(5));
    }

    #[test]
    fn blank_null_and_missing_are_none() {
        let f = parse(r#"{"grams": "", "rating": null}"#);
        assert_eq!(f.grams, None);
        assert_eq!(f.rating, None);
        let f = parse("{}");
        assert_eq!(f.grams, None);
    }

    #[derive(Deserialize)]
    struct Reply {
        #[serde(default, deserialize_with = "opt_i32_rounded")]
        calories: Option<i32>,
        #[serde(default, deserialize_with = "opt_bool")]
        should_buy: Option<bool>,
    }

    #[test]
    fn model_replies_are_read_leniently() {
        let r: Reply = serde_json::from_str(r#"{"calories":"104.6","should_buy":"Yes, ripe"}"#).unwrap();
        assert_eq!(r.calories, Some(105));
        assert_eq!(r.should_buy, Some(true));

        let r: Reply = serde_json::from_str(r#"{"calories":"about 100","should_buy":false}"#).unwrap();
        assert_eq!(r.calories, None);
        assert_eq!(r.should_buy, Some(false));
    }

    #[test]
    fn rejects_garbage() {
        assert!(serde_json::from_str::<Form>(r#"{"grams": "lots"}"#).is_err());
        assert!(serde_json::from_str::<Form>(r#"{"rating": 4.5}"#).is_err());
    }

    #[test]
    fn non_finite_strings_are_rejected() {
        for text in ["NaN", "nan", "inf", "-inf", "infinity", "1e999"] {
            let json = format!(r#"{{"grams": "{text}"}}"#);
            assert!(serde_json::from_str::<Form>(&json).is_err(), "{text} accepted");
        }
        let r: Reply = serde_json::from_str(r#"{"calories":"NaN"}"#).unwrap();
        assert_eq!(r.calories, None);
    }
}
