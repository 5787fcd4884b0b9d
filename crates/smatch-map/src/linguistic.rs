//! Name-based linguistic similarity.
//!
//! Names are split into element tokens, each token is canonicalised through a
//! small thesaurus of synonym groups, and two token lists are compared with a
//! symmetric best-match average:
//!
//! ```text
//! sim(S, T) = (Σ_s max_t tok(s, t) + Σ_t max_s tok(s, t)) / (|S| + |T|)
//! ```
//!
//! where `tok` is 1.0 for equal canonical tokens and Jaro-Winkler otherwise.

use std::collections::HashMap;
use std::sync::LazyLock;

use rapidfuzz::distance::jaro_winkler;

/// Synonym groups. The first entry of each group is its canonical form.
static SYNONYM_GROUPS: &[&[&str]] = &[
    &["id", "identifier", "ident", "uid", "guid", "uuid", "pk"],
    &["email", "mail", "emailaddress"],
    &["name", "nm", "nam"],
    &["user", "usr", "person", "member", "account"],
    &["customer", "cust", "client"],
    &["phone", "telephone", "tel", "mobile", "cell"],
    &["address", "addr", "location"],
    &["zip", "postal", "postcode", "zipcode"],
    &["country", "ctry", "nation"],
    &["city", "town"],
    &["date", "dt", "dat", "day"],
    &["time", "tm", "timestamp", "ts"],
    &["created", "creation", "create"],
    &["updated", "modified", "modify", "update"],
    &["birth", "dob", "born"],
    &["gender", "sex"],
    &["description", "desc", "descr", "summary"],
    &["number", "num", "nbr", "count", "cnt", "qty", "quantity"],
    &["amount", "amt", "value", "val", "total", "sum"],
    &["price", "cost", "fee", "rate", "charge"],
    &["code", "cd"],
    &["type", "kind", "category", "cat", "class"],
    &["status", "state", "stat"],
    &["first", "fname", "given"],
    &["last", "lname", "surname", "family"],
    &["company", "organization", "organisation", "org", "firm"],
    &["product", "prod", "item", "article"],
    &["order", "ord", "purchase"],
    &["message", "msg", "text", "body", "content"],
    &["comment", "note", "remark"],
    &["url", "link", "uri", "href"],
    &["department", "dept", "dep"],
    &["employee", "emp", "staff", "worker"],
    &["salary", "wage", "pay"],
    &["percent", "pct", "percentage", "ratio"],
];

static SYNONYM_MAP: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for group in SYNONYM_GROUPS {
        let canonical = group[0];
        for term in *group {
            map.entry(*term).or_insert(canonical);
        }
    }
    map
});

fn is_stopword(token: &str) -> bool {
    matches!(
        token,
        "of" | "and"
            | "the"
            | "to"
            | "for"
            | "in"
            | "on"
            | "at"
            | "with"
            | "by"
            | "from"
            | "or"
            | "a"
            | "an"
    )
}

/// Drops a plural `s` from tokens like `orders`, leaving `address`,
/// `status` and short tokens alone.
fn singular(token: &str) -> &str {
    if token.len() > 3
        && token.ends_with('s')
        && !token.ends_with("ss")
        && !token.ends_with("us")
        && !token.ends_with("is")
    {
        &token[..token.len() - 1]
    } else {
        token
    }
}

fn canonical(token: &str) -> String {
    if let Some(canonical) = SYNONYM_MAP.get(token) {
        return (*canonical).to_string();
    }
    let stem = singular(token);
    SYNONYM_MAP
        .get(stem)
        .copied()
        .unwrap_or(stem)
        .to_string()
}

/// Splits a schema element name into canonical tokens.
///
/// Separators, camelCase humps and letter/digit boundaries all start a new
/// token. Purely numeric tokens and stopwords are dropped.
pub fn tokenize(name: &str) -> Vec<String> {
    let mut spaced = String::with_capacity(name.len() + 8);
    let mut prev: Option<char> = None;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if let Some(p) = prev {
                let hump = p.is_lowercase() && ch.is_uppercase();
                let digit_edge = p.is_ascii_digit() != ch.is_ascii_digit();
                if hump || digit_edge {
                    spaced.push(' ');
                }
            }
            spaced.push(ch);
            prev = Some(ch);
        } else {
            spaced.push(' ');
            prev = None;
        }
    }

    spaced
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|token| !token.chars().all(|ch| ch.is_ascii_digit()))
        .filter(|token| !is_stopword(token))
        .map(|token| canonical(&token))
        .collect()
}

fn token_similarity(left: &str, right: &str) -> f64 {
    if left == right {
        return 1.0;
    }
    jaro_winkler::similarity(left.chars(), right.chars())
}

/// Similarity of two already tokenized names, in `[0, 1]`.
pub fn token_list_similarity(left: &[String], right: &[String]) -> f64 {
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    let best = |token: &String, others: &[String]| {
        others
            .iter()
            .map(|other| token_similarity(token, other))
            .fold(0.0_f64, f64::max)
    };
    let forward: f64 = left.iter().map(|token| best(token, right)).sum();
    let backward: f64 = right.iter().map(|token| best(token, left)).sum();
    let score = (forward + backward) / (left.len() + right.len()) as f64;
    score.clamp(0.0, 1.0)
}

/// Linguistic similarity of two element names, in `[0, 1]`.
pub fn name_similarity(left: &str, right: &str) -> f64 {
    token_list_similarity(&tokenize(left), &tokenize(right))
}
