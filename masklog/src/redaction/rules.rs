//! Masking rules for classified strings.
//!
//! Rules are pure string transformations. They do not traverse structures,
//! pick classifications, or make runtime decisions about sensitivity, and they
//! never fail: inputs they cannot make sense of come back unchanged (or empty,
//! for the e-mail rule).

/// Marker inserted by the e-mail rule after the visible part of the local name.
pub const EMAIL_MASK: &str = "***";

/// Configuration that keeps selected segments visible while masking the remainder.
///
/// The policy operates on Unicode scalar values and replaces each hidden
/// character with one mask character, so masked values keep their length.
#[derive(Clone, Copy, Debug)]
pub struct KeepConfig {
    /// Number of leading characters to keep visible.
    visible_prefix: usize,
    /// Number of trailing characters to keep visible.
    visible_suffix: usize,
    /// Symbol used to mask the middle.
    mask_char: char,
}

impl KeepConfig {
    /// Keeps only the first `visible_prefix` scalar values.
    #[must_use]
    pub const fn first(visible_prefix: usize) -> Self {
        Self::both(visible_prefix, 0)
    }

    /// Keeps only the last `visible_suffix` scalar values.
    #[must_use]
    pub const fn last(visible_suffix: usize) -> Self {
        Self::both(0, visible_suffix)
    }

    /// Keeps both leading and trailing characters visible.
    #[must_use]
    pub const fn both(visible_prefix: usize, visible_suffix: usize) -> Self {
        Self {
            visible_prefix,
            visible_suffix,
            mask_char: '*',
        }
    }

    /// Uses a specific masking character.
    #[must_use]
    pub const fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask_char = mask_char;
        self
    }

    /// Applies the policy to a string value.
    ///
    /// Empty strings are returned as-is. When the visible segments would cover
    /// the whole value they are shrunk to at most half of it, prefix first, so
    /// at least one character is always hidden.
    pub fn apply_to(&self, value: &str) -> String {
        let mut chars: Vec<char> = value.chars().collect();
        let total = chars.len();
        if total == 0 {
            return String::new();
        }

        let (mut prefix, mut suffix) = (self.visible_prefix, self.visible_suffix);
        if prefix.saturating_add(suffix) >= total {
            let budget = total / 2;
            prefix = prefix.min(budget);
            suffix = suffix.min(budget - prefix);
        }

        for ch in &mut chars[prefix..(total - suffix)] {
            *ch = self.mask_char;
        }
        chars.into_iter().collect()
    }
}

const CARD_NUMBER: KeepConfig = KeepConfig::both(6, 4);
const IDENTITY_CARD: KeepConfig = KeepConfig::both(4, 4);
const PHONE_NUMBER: KeepConfig = KeepConfig::both(3, 4);
const REAL_NAME: KeepConfig = KeepConfig::both(1, 1);

/// Keeps the issuer prefix and the last four digits.
pub fn card_number(raw: &str) -> String {
    CARD_NUMBER.apply_to(raw)
}

/// Keeps the first and last four characters.
pub fn identity_card(raw: &str) -> String {
    IDENTITY_CARD.apply_to(raw)
}

/// Keeps the first three and last four digits.
pub fn phone_number(raw: &str) -> String {
    PHONE_NUMBER.apply_to(raw)
}

/// Keeps the first three characters of the local part and the whole domain.
///
/// Returns an empty string when `raw` does not contain exactly one `@`, which
/// callers read as "not an e-mail address". Local parts of three characters or
/// fewer are returned unchanged.
pub fn email(raw: &str) -> String {
    let mut parts = raw.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return String::new();
    };
    if local.chars().count() <= 3 {
        return raw.to_string();
    }
    let visible: String = local.chars().take(3).collect();
    format!("{visible}{EMAIL_MASK}@{domain}")
}

/// E-mail shaped accounts use the e-mail rule; anything else is treated as a
/// phone number.
pub fn alipay_account(raw: &str) -> String {
    if raw.contains('@') {
        let masked = email(raw);
        if !masked.is_empty() {
            return masked;
        }
    }
    phone_number(raw)
}

/// Keeps the first and last character.
pub fn real_name(raw: &str) -> String {
    REAL_NAME.apply_to(raw)
}
