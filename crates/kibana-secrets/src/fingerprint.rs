//! Content fingerprints for secrets
//!
//! A fingerprint is the lowercase hex SHA-256 of a secret's values,
//! concatenated in ascending key order. Sorting keys explicitly keeps the
//! result independent of how the data map was built or iterated.
//!
//! Keys themselves are not hashed and values are not length-prefixed, so
//! moving bytes between fields or renaming a key can leave the fingerprint
//! unchanged (`{a: "AAA", b: "BBB"}` and `{c: "AAABBB"}` collide). That is
//! acceptable for rotation detection, where the catalog fixes the key set.

use std::fmt::Write;

use aws_lc_rs::digest;
use k8s_openapi::api::core::v1::Secret;

/// Fingerprint of a secret; `None` (no credential yet) maps to `""`
pub fn fingerprint(secret: Option<&Secret>) -> String {
    let Some(secret) = secret else {
        return String::new();
    };

    let data = secret
        .data
        .iter()
        .flatten()
        .map(|(key, value)| (key.as_str(), value.0.as_slice()));
    fingerprint_data(data)
}

/// Fingerprint of raw `(key, value)` pairs in any order
pub fn fingerprint_data<'a, I>(data: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    let mut fields: Vec<(&str, &[u8])> = data.into_iter().collect();
    fields.sort_unstable_by(|a, b| a.0.cmp(b.0));

    let mut ctx = digest::Context::new(&digest::SHA256);
    for (_, value) in &fields {
        ctx.update(value);
    }

    ctx.finish()
        .as_ref()
        .iter()
        .fold(String::with_capacity(64), |mut s, b| {
            let _ = write!(s, "{:02x}", b);
            s
        })
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use k8s_openapi::ByteString;

    use super::*;

    fn secret(data: &[(&str, &[u8])]) -> Secret {
        Secret {
            data: Some(
                data.iter()
                    .map(|(k, v)| (k.to_string(), ByteString(v.to_vec())))
                    .collect::<BTreeMap<_, _>>(),
            ),
            ..Default::default()
        }
    }

    #[test]
    fn absent_secret_has_empty_fingerprint() {
        assert_eq!(fingerprint(None), "");
    }

    #[test]
    fn independent_of_key_order() {
        let (ca, cert, key): (&[u8], &[u8], &[u8]) = (b"AAA", b"BBB", b"CCC");
        let forward = fingerprint_data([("ca", ca), ("cert", cert), ("key", key)]);
        let reverse = fingerprint_data([("key", key), ("cert", cert), ("ca", ca)]);
        assert_eq!(forward, reverse);

        let hashed: HashMap<&str, &[u8]> = [("key", key), ("ca", ca), ("cert", cert)].into();
        assert_eq!(fingerprint_data(hashed), forward);
    }

    #[test]
    fn matches_secret_fingerprint() {
        let s = secret(&[("ca", &b"AAA"[..]), ("key", &b"CCC"[..])]);
        assert_eq!(
            fingerprint(Some(&s)),
            fingerprint_data([("key", &b"CCC"[..]), ("ca", &b"AAA"[..])])
        );
    }

    #[test]
    fn any_byte_change_changes_fingerprint() {
        let original = secret(&[("ca", &b"AAA"[..]), ("key", &b"CCC"[..])]);
        let rotated = secret(&[("ca", &b"AAB"[..]), ("key", &b"CCC"[..])]);
        assert_ne!(fingerprint(Some(&original)), fingerprint(Some(&rotated)));
    }

    #[test]
    fn is_lowercase_sha256_hex() {
        let fp = fingerprint_data([("b", &b"BBB"[..]), ("a", &b"AAA"[..])]);
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn value_order_follows_sorted_keys() {
        let (first, second): (&[u8], &[u8]) = (b"AAA", b"BBB");
        let sorted = fingerprint_data([("a", first), ("b", second)]);
        let swapped = fingerprint_data([("a", second), ("b", first)]);
        assert_ne!(sorted, swapped);
    }

    #[test]
    fn secret_without_data_hashes_empty_input() {
        let empty = Secret::default();
        // sha256 of the empty string
        assert_eq!(
            fingerprint(Some(&empty)),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
