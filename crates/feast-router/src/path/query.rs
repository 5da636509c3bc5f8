//! Query string flattening
//!
//! Only flat `key=value` pairs are understood. A `key[]` name collects its
//! values into a list.

use crate::args::{ArgValue, Arguments};
use std::borrow::Cow;

/// Parses `a=1&b=2&tags[]=x&tags[]=y` into arguments
///
/// ```
/// use feast_router::path::parse_query;
///
/// let args = parse_query("q=hello+world&tags[]=a&tags[]=b&flag");
/// assert_eq!(args.get_str("q"), Some("hello world"));
/// assert_eq!(args.get("tags").unwrap().values(), vec!["a", "b"]);
/// assert_eq!(args.get_str("flag"), Some(""));
/// ```
pub fn parse_query(query: &str) -> Arguments {
    let mut args = Arguments::new();

    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_component(key);
        let value = decode_component(value);

        match key.strip_suffix("[]") {
            Some(list_key) => {
                let mut values: Vec<String> = args
                    .get(list_key)
                    .map(|existing| existing.values().into_iter().map(str::to_string).collect())
                    .unwrap_or_default();
                values.push(value);
                args.insert(list_key, ArgValue::Many(values));
            }
            None => args.insert(key, value),
        }
    }

    args
}

/// Builds a query string (without the leading `?`); `Null` values are skipped
pub fn build_query<'a>(args: impl IntoIterator<Item = (&'a str, &'a ArgValue)>) -> String {
    let mut pairs: Vec<String> = Vec::new();

    for (key, value) in args {
        match value {
            ArgValue::Null => {}
            ArgValue::Single(value) => {
                pairs.push(format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
            }
            ArgValue::Many(values) => {
                let key = format!("{}[]", key);
                pairs.extend(values.iter().map(|value| {
                    format!("{}={}", urlencoding::encode(&key), urlencoding::encode(value))
                }));
            }
        }
    }

    pairs.join("&")
}

fn decode_component(component: &str) -> String {
    let spaced: Cow<'_, str> = if component.contains('+') {
        Cow::Owned(component.replace('+', " "))
    } else {
        Cow::Borrowed(component)
    };

    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| spaced.into_owned())
}
