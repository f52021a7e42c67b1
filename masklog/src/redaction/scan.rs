//! Partial redaction of untagged, query-shaped text.
//!
//! Strings such as `card_no=6225...&mobile=132...` often reach the log without
//! any structural tag. They are split on `&` into `key=value` pairs and the
//! values of recognized key names are masked in place. Unrecognized keys, the
//! delimiters and any text that does not look like a pair are left untouched.
//!
//! Request URIs are handled too: a path ending in `?` before the first key and
//! a `#fragment` after the last value are kept verbatim and never classified.

use std::borrow::Cow;

use super::Tag;

/// Separator between pairs.
const PAIR_DELIMITER: char = '&';
/// Separator between a key and its value.
const KEY_DELIMITER: char = '=';
/// Separator between a URI path and its query.
const QUERY_DELIMITER: char = '?';
/// Start of a URI fragment.
const FRAGMENT_DELIMITER: char = '#';

const CARD_NUMBER_KEYS: &[&str] = &[
    "card_no",
    "cardno",
    "card_number",
    "bank_card",
    "bank_card_no",
    "bank_code",
    "acct_no",
];
const IDENTITY_CARD_KEYS: &[&str] = &["id_card", "idcard", "id_no", "cert_no", "identity"];
const PHONE_NUMBER_KEYS: &[&str] = &["mobile", "mobile_no", "phone", "phone_no", "tel"];
const ALIPAY_ACCOUNT_KEYS: &[&str] = &["alipay_id", "alipay_account", "alipay"];

/// Maps a key name to the classification its values carry.
///
/// Matching is exact and ASCII case-insensitive; a key that merely contains a
/// known name (`cards_ss`) is not recognized.
pub fn classify_key(key: &str) -> Option<Tag> {
    let table: [(&[&str], Tag); 4] = [
        (CARD_NUMBER_KEYS, Tag::CardNumber),
        (IDENTITY_CARD_KEYS, Tag::IdentityCard),
        (PHONE_NUMBER_KEYS, Tag::PhoneNumber),
        (ALIPAY_ACCOUNT_KEYS, Tag::AlipayAccount),
    ];
    table.into_iter().find_map(|(names, tag)| {
        names
            .iter()
            .any(|name| name.eq_ignore_ascii_case(key))
            .then_some(tag)
    })
}

/// Masks the values of recognized keys in a `k=v&k=v` shaped string.
///
/// Returns the input borrowed when nothing was recognized.
pub fn scan_pairs(text: &str) -> Cow<'_, str> {
    if !text.contains(KEY_DELIMITER) {
        return Cow::Borrowed(text);
    }

    let (body, fragment) = text
        .find(FRAGMENT_DELIMITER)
        .map_or((text, ""), |at| text.split_at(at));
    let query_start = body
        .split(PAIR_DELIMITER)
        .next()
        .and_then(|first| first.split_once(KEY_DELIMITER))
        .and_then(|(key, _)| key.rfind(QUERY_DELIMITER))
        .map_or(0, |at| at + QUERY_DELIMITER.len_utf8());
    let (path, query) = body.split_at(query_start);

    let mut changed = false;
    let mut out = String::with_capacity(text.len());
    out.push_str(path);
    for (index, pair) in query.split(PAIR_DELIMITER).enumerate() {
        if index > 0 {
            out.push(PAIR_DELIMITER);
        }
        let Some((key, value)) = pair.split_once(KEY_DELIMITER) else {
            out.push_str(pair);
            continue;
        };
        match classify_key(key.trim()) {
            Some(tag) if !value.is_empty() => {
                changed = true;
                out.push_str(key);
                out.push(KEY_DELIMITER);
                out.push_str(&tag.mask(value));
            }
            _ => out.push_str(pair),
        }
    }

    if changed {
        out.push_str(fragment);
        Cow::Owned(out)
    } else {
        Cow::Borrowed(text)
    }
}
