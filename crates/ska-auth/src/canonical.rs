//! Canonical serialization of the signed `extra` payload.
//!
//! The base string of a signature embeds the `extra` mapping as:
//!
//! ```text
//! quote(key1=dump(value1)&key2=dump(value2)&...)
//! ```
//!
//! Keys are sorted, values are rendered by a [`ValueDumper`], and the
//! *whole* joined string is percent-encoded by a [`Quoter`]. Every step is
//! byte-exact so that signers in other languages produce identical output.
//!
//! # Ambiguity
//!
//! Separators inside values are not escaped before the pairs are joined, so
//! `{a: "1&b=2"}` and `{a: "1", b: "2"}` share a base string. A signature
//! over the former validates a request rewritten to list both keys. Do not
//! sign attacker-influenced values that contain `&` or `=`.

use std::collections::BTreeMap;
use std::io;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::Formatter;

/// Extra signed payload: key to scalar (or nested JSON) value.
pub type ExtraData = BTreeMap<String, Value>;

/// Flat request data as received from a query string or form body.
pub type RequestData = BTreeMap<String, String>;

/// Characters left unescaped by [`Quoter::Plain`]: RFC 3986 unreserved
/// characters plus `/`.
const PLAIN_QUOTE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Characters left unescaped by [`Quoter::Javascript`]: the
/// `encodeURIComponent` table, i.e. unreserved characters plus `()*!'`.
const JAVASCRIPT_QUOTE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'!')
    .remove(b'\'');

/// Policy rendering an extra value into its wire form.
#[derive(Debug, Clone, Copy, Default)]
pub enum ValueDumper {
    /// Strings and numbers verbatim, booleans as `True`/`False`, null as
    /// `None`, containers as compact UTF-8 JSON.
    #[default]
    Plain,
    /// Strings and numbers verbatim, booleans as `true`/`false`, null as
    /// `null`, containers as compact JSON with non-ASCII characters escaped
    /// as `\uXXXX`.
    Javascript,
    /// Caller-supplied renderer.
    Custom(fn(&Value) -> String),
}

impl ValueDumper {
    /// Render a single value.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use ska_auth::canonical::ValueDumper;
    ///
    /// assert_eq!(ValueDumper::Plain.dump(&json!("â")), "â");
    /// assert_eq!(ValueDumper::Plain.dump(&json!(true)), "True");
    /// assert_eq!(
    ///     ValueDumper::Javascript.dump(&json!({"value": "â"})),
    ///     r#"{"value":"\u00e2"}"#
    /// );
    /// ```
    #[must_use]
    pub fn dump(&self, value: &Value) -> String {
        match (self, value) {
            (Self::Custom(dumper), _) => dumper(value),
            (_, Value::String(s)) => s.clone(),
            (_, Value::Number(n)) => n.to_string(),
            (Self::Plain, Value::Bool(b)) => String::from(if *b { "True" } else { "False" }),
            (Self::Plain, Value::Null) => "None".to_owned(),
            (Self::Plain, container) => compact_json(&normalize(container), false),
            (Self::Javascript, Value::Bool(b)) => b.to_string(),
            (Self::Javascript, Value::Null) => "null".to_owned(),
            (Self::Javascript, container) => compact_json(&normalize(container), true),
        }
    }
}

/// Policy percent-encoding a string for a URL query component.
#[derive(Debug, Clone, Copy, Default)]
pub enum Quoter {
    /// Escape everything except unreserved characters and `/`.
    #[default]
    Plain,
    /// Escape everything except unreserved characters and `()*!'`.
    Javascript,
    /// Caller-supplied encoder.
    Custom(fn(&str) -> String),
}

impl Quoter {
    /// Percent-encode `input` (UTF-8 bytes, uppercase hex).
    ///
    /// # Examples
    ///
    /// ```
    /// use ska_auth::canonical::Quoter;
    ///
    /// assert_eq!(Quoter::Plain.quote("a=1&b=/x"), "a%3D1%26b%3D/x");
    /// assert_eq!(Quoter::Javascript.quote("(a)/b!"), "(a)%2Fb!");
    /// ```
    #[must_use]
    pub fn quote(&self, input: &str) -> String {
        match self {
            Self::Plain => utf8_percent_encode(input, PLAIN_QUOTE_SET).to_string(),
            Self::Javascript => utf8_percent_encode(input, JAVASCRIPT_QUOTE_SET).to_string(),
            Self::Custom(quoter) => quoter(input),
        }
    }
}

/// A value dumper and quoter pair.
///
/// Signer and validator must use the same pair, otherwise the base strings
/// differ and validation fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct Encoding {
    /// Renders extra values.
    pub value_dumper: ValueDumper,
    /// Percent-encodes the joined extra string.
    pub quoter: Quoter,
}

impl Encoding {
    /// The pairing compatible with the JavaScript and PHP signers.
    #[must_use]
    pub const fn javascript() -> Self {
        Self {
            value_dumper: ValueDumper::Javascript,
            quoter: Quoter::Javascript,
        }
    }
}

/// Return the entries sorted by key, with nested objects key-sorted too.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use serde_json::json;
/// use ska_auth::canonical::dict_to_ordered;
///
/// let data: HashMap<String, serde_json::Value> =
///     [("b".to_owned(), json!(2)), ("a".to_owned(), json!(1))].into();
/// let ordered = dict_to_ordered(&data);
/// assert_eq!(ordered, vec![("a", json!(1)), ("b", json!(2))]);
/// ```
#[must_use]
pub fn dict_to_ordered<'a>(
    data: impl IntoIterator<Item = (&'a String, &'a Value)>,
) -> Vec<(&'a str, Value)> {
    let mut entries: Vec<(&str, Value)> = data
        .into_iter()
        .map(|(k, v)| (k.as_str(), normalize(v)))
        .collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
    entries
}

/// Sorted keys of the given mapping.
#[must_use]
pub fn dict_keys<'a, V: 'a>(data: impl IntoIterator<Item = (&'a String, &'a V)>) -> Vec<&'a str> {
    let mut keys: Vec<&str> = data.into_iter().map(|(k, _)| k.as_str()).collect();
    keys.sort_unstable();
    keys
}

/// Sorted keys joined by commas, as carried by the `extra` wire field.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use ska_auth::canonical::{ExtraData, dict_keys_string};
///
/// let extra: ExtraData = [("two".to_owned(), json!("2")), ("one".to_owned(), json!("1"))].into();
/// assert_eq!(dict_keys_string(&extra), "one,two");
/// ```
#[must_use]
pub fn dict_keys_string<'a, V: 'a>(data: impl IntoIterator<Item = (&'a String, &'a V)>) -> String {
    dict_keys(data).join(",")
}

/// Split an `extra` wire field into the declared key names.
#[must_use]
pub fn parse_extra_keys(listing: &str) -> Vec<&str> {
    listing.split(',').filter(|k| !k.is_empty()).collect()
}

/// Build `key=value` pairs in key order joined by `&`.
///
/// When `quoted` is set the quoter is applied to the entire joined string,
/// not to each pair, which is what the other implementations do.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use ska_auth::canonical::{Encoding, ExtraData, sorted_urlencode};
///
/// let extra: ExtraData = [("two".to_owned(), json!("2")), ("one".to_owned(), json!("1"))].into();
/// assert_eq!(sorted_urlencode(&extra, true, Encoding::default()), "one%3D1%26two%3D2");
/// assert_eq!(sorted_urlencode(&extra, false, Encoding::default()), "one=1&two=2");
/// ```
#[must_use]
pub fn sorted_urlencode<'a>(
    data: impl IntoIterator<Item = (&'a String, &'a Value)>,
    quoted: bool,
    encoding: Encoding,
) -> String {
    let joined = dict_to_ordered(data)
        .iter()
        .map(|(k, v)| format!("{k}={}", encoding.value_dumper.dump(v)))
        .collect::<Vec<_>>()
        .join("&");

    if quoted {
        encoding.quoter.quote(&joined)
    } else {
        joined
    }
}

/// Keep only the entries of `data` whose key is in `allowed_keys`.
///
/// Everything not declared as signed is dropped, which is what protects the
/// validator from injected fields.
#[must_use]
pub fn extract_signed_data(data: &RequestData, allowed_keys: &[&str]) -> RequestData {
    data.iter()
        .filter(|(k, _)| allowed_keys.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Rebuild a value so every nested object has its keys in sorted order.
fn normalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), normalize(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(normalize).collect()),
        other => other.clone(),
    }
}

/// Serialize without whitespace, optionally escaping non-ASCII characters.
fn compact_json(value: &Value, ascii_only: bool) -> String {
    if !ascii_only {
        return value.to_string();
    }

    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, AsciiFormatter);
    // Writing into a Vec cannot fail and `Value` always serializes.
    if value.serialize(&mut ser).is_err() {
        return value.to_string();
    }
    String::from_utf8(out).unwrap_or_else(|_| value.to_string())
}

/// Compact JSON formatter that escapes DEL and every non-ASCII character as
/// `\uXXXX` (UTF-16 code units, lowercase hex).
struct AsciiFormatter;

impl Formatter for AsciiFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut units = [0u16; 2];
        let mut utf8 = [0u8; 4];
        for ch in fragment.chars() {
            if ch.is_ascii() && ch != '\u{7f}' {
                writer.write_all(ch.encode_utf8(&mut utf8).as_bytes())?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }
}
