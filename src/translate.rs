//! Key-case translation between the wire convention (camelCase, with a
//! handful of acronym exceptions) and the internal convention (snake_case)
//! handlers use.
//!
//! Ported algorithm-for-algorithm from the reference Python client's
//! `snake_to_camel_case` / `camel_to_snake_case`, which is why the acronym
//! substitutions happen on
//! the whole string before it is split on `_` rather than token-by-token —
//! that ordering is what makes `state_of_charge_soc` come out as
//! `stateOfChargeSoC` instead of `stateOfChargeSoc`.

use serde_json::{Map, Value};

/// Acronym substitutions applied to the pre-split snake_case string before
/// camelCasing. Add future acronyms here, not scattered through the code.
const ACRONYM_SUBSTITUTIONS: &[(&str, &str)] = &[("soc", "SoC"), ("_v2x", "V2X")];

/// Converts one snake_case key to camelCase, applying the acronym table
/// first.
pub fn key_snake_to_camel(key: &str) -> String {
    let mut substituted = key.to_string();
    for (from, to) in ACRONYM_SUBSTITUTIONS {
        substituted = substituted.replace(from, to);
    }

    let mut parts = substituted.split('_');
    let mut result = parts.next().unwrap_or("").to_string();
    for part in parts {
        let mut chars = part.chars();
        match chars.next() {
            Some(first) => {
                result.push(first.to_ascii_uppercase());
                result.push_str(chars.as_str());
            }
            None => {}
        }
    }
    result
}

/// Converts one camelCase key to snake_case by scanning left-to-right for
/// case boundaries: a new token begins before an uppercase letter that is
/// followed by a lowercase letter; a run of uppercase letters constitutes
/// one acronym token unless a lowercase letter ends it — so `SoC` stays
/// one token, but `maxCurrentSoC` still splits into `max`/`current`/`SoC`
/// because `current` is itself already a complete word when the `S` of
/// `SoC` starts.
pub fn key_camel_to_snake(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut tokens: Vec<String> = Vec::new();
    let mut current = String::new();

    for (index, &ch) in chars.iter().enumerate() {
        if ch.is_ascii_uppercase() {
            if let Some(&next) = chars.get(index + 1) {
                if !next.is_ascii_uppercase() {
                    if index != 0 {
                        tokens.push(std::mem::take(&mut current));
                    }
                } else if ends_in_complete_word(&current) {
                    tokens.push(std::mem::take(&mut current));
                }
            }
        }
        current.push(ch);
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
        .into_iter()
        .map(|t| t.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// True if `s` is an optional uppercase run followed by at least one
/// lowercase or digit character — i.e. it already reads as one finished
/// word, so the next uppercase letter starts a new token.
fn ends_in_complete_word(s: &str) -> bool {
    let tail = s.trim_start_matches(|c: char| c.is_ascii_uppercase());
    tail.chars()
        .next()
        .map(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .unwrap_or(false)
}

/// Recursively translates every key of every mapping inside `value` from
/// snake_case to camelCase, leaving non-key data (array items, scalar
/// values) untouched.
pub fn snake_to_camel_case(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, v) in map {
                out.insert(key_snake_to_camel(key), snake_to_camel_case(v));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(snake_to_camel_case).collect()),
        other => other.clone(),
    }
}

/// Recursively translates every key of every mapping inside `value` from
/// camelCase to snake_case.
pub fn camel_to_snake_case(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, v) in map {
                out.insert(key_camel_to_snake(key), camel_to_snake_case(v));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(camel_to_snake_case).collect()),
        other => other.clone(),
    }
}

/// Removes every entry whose value is `null`, recursively. Applying this
/// twice is idempotent.
pub fn strip_nulls(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, v) in map {
                if v.is_null() {
                    continue;
                }
                out.insert(key.clone(), strip_nulls(v));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(strip_nulls).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snake_to_camel_basic() {
        assert_eq!(key_snake_to_camel("charge_point_vendor"), "chargePointVendor");
        assert_eq!(key_snake_to_camel("status"), "status");
        assert_eq!(key_snake_to_camel("id_tag"), "idTag");
    }

    #[test]
    fn snake_to_camel_acronyms() {
        assert_eq!(
            key_snake_to_camel("state_of_charge_soc"),
            "stateOfChargeSoC"
        );
        assert_eq!(key_snake_to_camel("max_current_v2x"), "maxCurrentV2X");
    }

    #[test]
    fn camel_to_snake_basic() {
        assert_eq!(key_camel_to_snake("chargePointVendor"), "charge_point_vendor");
        assert_eq!(key_camel_to_snake("status"), "status");
        assert_eq!(key_camel_to_snake("idTag"), "id_tag");
    }

    #[test]
    fn camel_to_snake_acronym_run() {
        assert_eq!(key_camel_to_snake("stateOfChargeSoC"), "state_of_charge_soc");
    }

    #[test]
    fn camel_to_snake_acronym_mid_word() {
        assert_eq!(key_camel_to_snake("maxCurrentSoC"), "max_current_soc");
    }

    #[test]
    fn round_trip_schema_like_keys() {
        for key in [
            "charge_point_vendor",
            "charge_point_model",
            "connector_id",
            "id_tag",
            "meter_start",
            "reservation_id",
            "transaction_id",
            "vendor_error_code",
        ] {
            let camel = key_snake_to_camel(key);
            assert_eq!(key_camel_to_snake(&camel), key);
        }
    }

    #[test]
    fn strip_nulls_removes_null_entries_recursively() {
        let value = json!({
            "status": "Accepted",
            "interval": null,
            "nested": {"a": 1, "b": null},
            "list": [{"x": null, "y": 1}],
        });
        let stripped = strip_nulls(&value);
        assert_eq!(
            stripped,
            json!({
                "status": "Accepted",
                "nested": {"a": 1},
                "list": [{"y": 1}],
            })
        );
    }

    #[test]
    fn strip_nulls_is_idempotent() {
        let value = json!({"a": null, "b": {"c": null, "d": 1}});
        let once = strip_nulls(&value);
        let twice = strip_nulls(&once);
        assert_eq!(once, twice);
    }

    #[test_strategy::proptest]
    fn camel_snake_round_trip_over_known_schema_keys(
        #[strategy(proptest::sample::select(crate::schema_registry::all_known_keys()))] key: &'static str,
    ) {
        let camel = key_snake_to_camel(key);
        assert_eq!(key_camel_to_snake(&camel), key);
    }

    #[test]
    fn translate_recurses_into_nested_maps_and_lists() {
        let value = json!({
            "meter_value": [{"sampled_value": [{"value": "1"}]}],
        });
        let camel = snake_to_camel_case(&value);
        assert_eq!(
            camel,
            json!({"meterValue": [{"sampledValue": [{"value": "1"}]}]})
        );
        let back = camel_to_snake_case(&camel);
        assert_eq!(back, value);
    }
}
