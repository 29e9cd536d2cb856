// mvnidx-common/src/version/maven.rs
// Maven version literals and their component-wise ordering.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{IdxError, Result};

/// Qualifiers with a fixed position in the ordering. Everything not listed
/// here sorts after `sp`, lexically among itself.
const QUALIFIERS: [&str; 7] = ["alpha", "beta", "milestone", "rc", "snapshot", "", "sp"];
const RELEASE_RANK: usize = 5;

#[derive(Debug, Clone)]
enum Item {
    /// Digits without leading zeros, "0" for zero.
    Int(String),
    /// Normalized qualifier.
    Str(String),
    List(Vec<Item>),
}

fn qualifier_rank(qualifier: &str) -> (usize, &str) {
    match QUALIFIERS.iter().position(|q| *q == qualifier) {
        Some(idx) => (idx, ""),
        None => (QUALIFIERS.len(), qualifier),
    }
}

fn compare_ints(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

impl Item {
    fn int(digits: &str) -> Item {
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            Item::Int("0".to_string())
        } else {
            Item::Int(trimmed.to_string())
        }
    }

    fn string(value: &str, followed_by_digit: bool) -> Item {
        let value = if followed_by_digit && value.len() == 1 {
            match value {
                "a" => "alpha",
                "b" => "beta",
                "m" => "milestone",
                other => other,
            }
        } else {
            value
        };
        let value = match value {
            "ga" | "final" | "release" => "",
            "cr" => "rc",
            other => other,
        };
        Item::Str(value.to_string())
    }

    fn is_null(&self) -> bool {
        match self {
            Item::Int(v) => v == "0",
            Item::Str(v) => qualifier_rank(v).0 == RELEASE_RANK,
            Item::List(items) => items.is_empty(),
        }
    }

    /// Compares against an absent item, which behaves like padding.
    fn cmp_missing(&self) -> Ordering {
        match self {
            Item::Int(v) => {
                if v == "0" {
                    Ordering::Equal
                } else {
                    Ordering::Greater
                }
            }
            Item::Str(v) => qualifier_rank(v).0.cmp(&RELEASE_RANK),
            Item::List(items) => match items.first() {
                None => Ordering::Equal,
                Some(first) => first.cmp_missing(),
            },
        }
    }

    fn cmp_item(&self, other: &Item) -> Ordering {
        match (self, other) {
            (Item::Int(a), Item::Int(b)) => compare_ints(a, b),
            (Item::Int(_), _) => Ordering::Greater,
            (Item::Str(_), Item::Int(_)) => Ordering::Less,
            (Item::Str(a), Item::Str(b)) => qualifier_rank(a).cmp(&qualifier_rank(b)),
            (Item::Str(_), Item::List(_)) => Ordering::Less,
            (Item::List(_), Item::Int(_)) => Ordering::Less,
            (Item::List(_), Item::Str(_)) => Ordering::Greater,
            (Item::List(a), Item::List(b)) => compare_lists(a, b),
        }
    }
}

fn compare_lists(a: &[Item], b: &[Item]) -> Ordering {
    let len = a.len().max(b.len());
    for idx in 0..len {
        let result = match (a.get(idx), b.get(idx)) {
            (Some(l), Some(r)) => l.cmp_item(r),
            (Some(l), None) => l.cmp_missing(),
            (None, Some(r)) => r.cmp_missing().reverse(),
            (None, None) => Ordering::Equal,
        };
        if result != Ordering::Equal {
            return result;
        }
    }
    Ordering::Equal
}

/// Splits a lowercased literal into the nested item structure. `-` opens a
/// sub list, and so does every switch between digits and letters.
fn parse_items(literal: &str) -> Vec<Item> {
    let version = literal.to_lowercase();
    let chars: Vec<char> = version.chars().collect();
    // Stack of open lists; the bottom one is the result.
    let mut stack: Vec<Vec<Item>> = vec![Vec::new()];
    let mut is_digit = false;
    let mut start = 0;

    fn push_item(stack: &mut [Vec<Item>], item: Item) {
        if let Some(top) = stack.last_mut() {
            top.push(item);
        }
    }

    for (i, &c) in chars.iter().enumerate() {
        if c == '.' || c == '-' {
            if i == start {
                push_item(&mut stack, Item::int("0"));
            } else {
                let part: String = chars[start..i].iter().collect();
                let item = if is_digit {
                    Item::int(&part)
                } else {
                    Item::string(&part, false)
                };
                push_item(&mut stack, item);
            }
            start = i + 1;
            if c == '-' {
                stack.push(Vec::new());
            }
        } else if c.is_ascii_digit() {
            if !is_digit && i > start {
                let part: String = chars[start..i].iter().collect();
                push_item(&mut stack, Item::string(&part, true));
                start = i;
                stack.push(Vec::new());
            }
            is_digit = true;
        } else {
            if is_digit && i > start {
                let part: String = chars[start..i].iter().collect();
                push_item(&mut stack, Item::int(&part));
                start = i;
                stack.push(Vec::new());
            }
            is_digit = false;
        }
    }
    if chars.len() > start {
        let part: String = chars[start..].iter().collect();
        let item = if is_digit {
            Item::int(&part)
        } else {
            Item::string(&part, false)
        };
        push_item(&mut stack, item);
    }

    // Close the open lists from the innermost outwards.
    while stack.len() > 1 {
        let mut inner = stack.pop().unwrap_or_default();
        normalize_list(&mut inner);
        push_item(&mut stack, Item::List(inner));
    }
    let mut root = stack.pop().unwrap_or_default();
    normalize_list(&mut root);
    root
}

/// Drops trailing null items (`0`, release qualifiers, empty lists) until
/// the first non-null, non-list item.
fn normalize_list(items: &mut Vec<Item>) {
    let mut idx = items.len();
    while idx > 0 {
        idx -= 1;
        if items[idx].is_null() {
            items.remove(idx);
        } else if !matches!(items[idx], Item::List(_)) {
            break;
        }
    }
}

/// A Maven version. Keeps the literal it was created from; compares by
/// Maven's component-wise rules, not lexically.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MavenVersion {
    literal: String,
    items: Vec<Item>,
}

impl MavenVersion {
    pub fn parse(literal: &str) -> Result<Self> {
        let literal = literal.trim();
        if literal.is_empty() {
            return Err(IdxError::InvalidVersion(
                literal.to_string(),
                "empty version".to_string(),
            ));
        }
        if let Some(c) = literal
            .chars()
            .find(|c| c.is_whitespace() || matches!(c, '[' | ']' | '(' | ')' | ','))
        {
            return Err(IdxError::InvalidVersion(
                literal.to_string(),
                format!("unexpected character '{c}'"),
            ));
        }
        Ok(Self {
            literal: literal.to_string(),
            items: parse_items(literal),
        })
    }

    /// The lowest version, used as the start of complements.
    pub fn zero() -> Self {
        Self {
            literal: "0".to_string(),
            items: Vec::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.literal
    }

    pub fn is_snapshot(&self) -> bool {
        self.literal.to_ascii_uppercase().ends_with("SNAPSHOT")
    }

    /// Maven ordering without the literal tie-break, so `1` and `1.0`
    /// compare equal here.
    pub fn maven_cmp(&self, other: &MavenVersion) -> Ordering {
        compare_lists(&self.items, &other.items)
    }
}

impl PartialEq for MavenVersion {
    fn eq(&self, other: &Self) -> bool {
        self.literal == other.literal
    }
}

impl Eq for MavenVersion {}

impl Hash for MavenVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.literal.hash(state);
    }
}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.maven_cmp(other)
            .then_with(|| self.literal.cmp(&other.literal))
    }
}

impl fmt::Display for MavenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal)
    }
}

impl fmt::Debug for MavenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MavenVersion({})", self.literal)
    }
}

impl FromStr for MavenVersion {
    type Err = IdxError;

    fn from_str(s: &str) -> Result<Self> {
        MavenVersion::parse(s)
    }
}

impl TryFrom<String> for MavenVersion {
    type Error = IdxError;

    fn try_from(value: String) -> Result<Self> {
        MavenVersion::parse(&value)
    }
}

impl From<MavenVersion> for String {
    fn from(value: MavenVersion) -> Self {
        value.literal
    }
}
