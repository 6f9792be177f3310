//! WhatsApp number handling.
//!
//! Numbers are stored exactly as customers typed them. Two policies are
//! applied on top of that free-form text:
//!
//! - [`normalize_whatsapp_number`] produces the canonical `62XXXXXXXXXX` form
//!   the messaging gateway expects.
//! - [`PhoneQuery`] implements the lenient order-lookup match, which trades
//!   precision for recall. Two customers sharing the same last nine digits
//!   will see each other's orders.

/// Number of trailing characters compared by the suffix rule.
const SUFFIX_LEN: usize = 9;

/// Indonesian country calling code.
const COUNTRY_CODE: &str = "62";

/// Normalize a number to the gateway's canonical international form.
///
/// Non-digits are stripped, a leading `0` becomes `62`, and `62` is prefixed
/// when still missing. Applying it twice gives the same result.
///
/// ```
/// use sentra_core::normalize_whatsapp_number;
///
/// assert_eq!(normalize_whatsapp_number("0812-3456-7890"), "6281234567890");
/// assert_eq!(normalize_whatsapp_number("+62 812 3456 7890"), "6281234567890");
/// assert_eq!(normalize_whatsapp_number("81234567890"), "6281234567890");
/// ```
#[must_use]
pub fn normalize_whatsapp_number(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let local = digits.strip_prefix('0').unwrap_or(&digits);
    if digits.starts_with('0') || !local.starts_with(COUNTRY_CODE) {
        format!("{COUNTRY_CODE}{local}")
    } else {
        digits
    }
}

/// Strip the separators customers commonly type: whitespace, `-`, `(` and `)`.
fn strip_separators(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect()
}

/// Last [`SUFFIX_LEN`] characters, or the whole string when shorter.
fn tail(s: &str) -> &str {
    let count = s.chars().count();
    if count <= SUFFIX_LEN {
        return s;
    }
    s.char_indices()
        .nth(count - SUFFIX_LEN)
        .map_or(s, |(idx, _)| s.get(idx..).unwrap_or(s))
}

/// A phone-number lookup query with its precomputed variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneQuery {
    variants: Vec<String>,
}

impl PhoneQuery {
    /// Build the variant set for a raw query.
    ///
    /// Variants are the stripped query plus its `0` <-> `62` and
    /// `+62` -> `0` / `0` -> `+62` rewrites.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let q = strip_separators(raw);
        if q.is_empty() {
            return Self {
                variants: Vec::new(),
            };
        }

        let mut variants = vec![q.clone()];
        let mut push = |v: String| {
            if !variants.contains(&v) {
                variants.push(v);
            }
        };
        if let Some(rest) = q.strip_prefix('0') {
            push(format!("62{rest}"));
            push(format!("+62{rest}"));
        }
        if let Some(rest) = q.strip_prefix("62") {
            push(format!("0{rest}"));
        }
        if let Some(rest) = q.strip_prefix("+62") {
            push(format!("0{rest}"));
        }

        Self { variants }
    }

    /// The variants this query matches against.
    #[must_use]
    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    /// Whether a stored number matches this query.
    ///
    /// A stored number matches when, after stripping separators, it equals a
    /// variant or ends with a variant's last nine characters. An empty query
    /// matches nothing.
    #[must_use]
    pub fn matches(&self, stored: &str) -> bool {
        let stored = strip_separators(stored);
        self.variants
            .iter()
            .any(|v| stored == *v || stored.ends_with(tail(v)))
    }
}
