//! Content fingerprints for model variations.
//!
//! A model variation is identified by its parameters plus the seed used for
//! cross-validation. The seed is merged into the parameter map under the
//! `"seed"` key, the map is serialized as compact JSON with object keys sorted
//! at every nesting level, and the bytes are hashed with SHA-256.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use super::parameter_space::ParameterSet;

/// Key under which the seed is folded into the hashed parameter map.
pub const SEED_KEY: &str = "seed";

/// Computes the hex-encoded SHA-256 fingerprint of `(parameters, seed)`.
///
/// The result does not depend on the insertion order of the parameters.
/// A parameter literally named `seed` is overridden by the seed argument.
pub fn fingerprint(parameters: &ParameterSet, seed: Option<u64>) -> String {
    let mut merged = parameters.as_map().clone();
    merged.insert(SEED_KEY.to_string(), seed.map_or(Value::Null, Value::from));

    let canonical = canonical_json(&Value::Object(merged));
    let digest = Sha256::digest(canonical.as_bytes());
    hex::encode(digest)
}

/// Serializes a JSON value with recursively sorted object keys.
pub fn canonical_json(value: &Value) -> String {
    // Serializing a `Value` cannot fail: keys are always strings.
    serde_json::to_string(&canonicalize(value)).unwrap_or_default()
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            let mut sorted = Map::with_capacity(map.len());
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
