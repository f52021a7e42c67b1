//! Classifications for "what kind of sensitive data is this?"
//!
//! A tag is attached to a field with `#[sensitive(Tag)]` and selects the
//! masking rule applied to every string reachable under that field.

use std::fmt;

use super::rules;

/// Classification of a sensitive string.
///
/// The absence of a tag is spelled `Option::<Tag>::None` throughout the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Bank card numbers or PANs.
    CardNumber,
    /// Government-issued identity card numbers.
    IdentityCard,
    /// Phone numbers.
    PhoneNumber,
    /// E-mail addresses.
    Email,
    /// Alipay accounts: either an e-mail address or a phone number.
    AlipayAccount,
    /// Personal or company names.
    RealName,
}

impl Tag {
    /// The masking rule bound to this classification.
    pub fn rule(self) -> fn(&str) -> String {
        match self {
            Tag::CardNumber => rules::card_number,
            Tag::IdentityCard => rules::identity_card,
            Tag::PhoneNumber => rules::phone_number,
            Tag::Email => rules::email,
            Tag::AlipayAccount => rules::alipay_account,
            Tag::RealName => rules::real_name,
        }
    }

    /// Masks `raw` under this classification.
    ///
    /// An e-mail rule that does not recognize its input yields an empty string;
    /// in that case the raw value is passed through rather than dropped.
    pub fn mask(self, raw: &str) -> String {
        let masked = (self.rule())(raw);
        if masked.is_empty() {
            raw.to_string()
        } else {
            masked
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tag::CardNumber => "CardNumber",
            Tag::IdentityCard => "IdentityCard",
            Tag::PhoneNumber => "PhoneNumber",
            Tag::Email => "Email",
            Tag::AlipayAccount => "AlipayAccount",
            Tag::RealName => "RealName",
        };
        f.write_str(name)
    }
}
