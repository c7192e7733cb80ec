use regex::Regex;
use std::sync::OnceLock;

// Quantity + unit phrases ("2 cups", "1/2 tsp", "100 g"). The alternation
// order and unit vocabulary are load-bearing: the persisted ingredient index
// was built with this exact pattern, and any change requires a rebuild.
fn unit_qty_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(^|\s)\d+/?\d*\s*(cups?|cup|tbsp|tbs|tbsp\.|tsp|grams?|g|kg|oz|ounces?)")
            .unwrap()
    })
}

fn non_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s]").unwrap())
}

/// Canonicalize a raw ingredient phrase into its lexical key.
///
/// Lower-cases, strips quantity/unit phrases, strips punctuation, trims, then
/// applies naive suffix singularization (trailing "es" when longer than 4
/// chars, else trailing "s" when longer than 3). Pure and idempotent; returns
/// an empty string for degenerate input, which callers must filter out.
///
/// The singularizer has known false positives on non-plural words ending in
/// "s" ("hummus" becomes "hummu"). That behavior is shared with the ingestion
/// pipeline and kept as-is: ingestion and query time must normalize
/// identically or exact-match recall silently degrades.
pub fn normalize_token(token: &str) -> String {
    let lowered = token.to_lowercase();
    let stripped = unit_qty_re().replace_all(lowered.trim(), " ");
    let cleaned = non_word_re().replace_all(&stripped, "");
    let mut s = cleaned.trim().to_string();

    let char_len = s.chars().count();
    if s.ends_with("es") && char_len > 4 {
        s.truncate(s.len() - 2);
    } else if s.ends_with('s') && char_len > 3 {
        s.truncate(s.len() - 1);
    }
    s
}

/// Normalize a batch of raw ingredient names, dropping empty results.
pub fn normalize_ingredients<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| normalize_token(item.as_ref()))
        .filter(|key| !key.is_empty())
        .collect()
}
