//! Naming conventions for generated classes, routes and views
//!
//! Pure string transforms, independent of the schema.

use heck::{ToKebabCase, ToLowerCamelCase, ToSnakeCase, ToTitleCase, ToUpperCamelCase};

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "feedback",
    "metadata",
    "money",
    "news",
    "series",
    "sheep",
    "species",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("woman", "women"),
    ("tooth", "teeth"),
    ("foot", "feet"),
    ("mouse", "mice"),
    ("goose", "geese"),
];

pub fn studly(input: &str) -> String {
    input.to_upper_camel_case()
}

pub fn camel(input: &str) -> String {
    input.to_lower_camel_case()
}

pub fn snake(input: &str) -> String {
    input.to_snake_case()
}

pub fn kebab(input: &str) -> String {
    input.to_kebab_case()
}

/// `PostComment` -> `Post Comment`, `user_id` -> `User Id`
pub fn title(input: &str) -> String {
    input.to_title_case()
}

/// Upper-case the first character only
pub fn ucfirst(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Class name for a table: `post_comments` -> `PostComment`
pub fn model_name(table: &str) -> String {
    studly(&singular(table))
}

fn is_uncountable(lower: &str) -> bool {
    UNCOUNTABLE.iter().any(|w| lower.ends_with(w))
}

/// Replace the last `from_len` bytes of `word` with `to`, keeping the case
/// of the replaced segment's first letter
fn replace_suffix(word: &str, from_len: usize, to: &str) -> String {
    let stem = &word[..word.len() - from_len];
    let segment_upper = word[word.len() - from_len..]
        .chars()
        .next()
        .map_or(false, |c| c.is_uppercase());
    if segment_upper {
        format!("{}{}", stem, ucfirst(to))
    } else {
        format!("{}{}", stem, to)
    }
}

fn ends_with_consonant_y(lower: &str) -> bool {
    let mut rev = lower.chars().rev();
    rev.next() == Some('y') && rev.next().map_or(false, |c| !"aeiou".contains(c))
}

pub fn plural(word: &str) -> String {
    let lower = word.to_lowercase();
    if word.is_empty() || is_uncountable(&lower) {
        return word.to_string();
    }
    for (single, many) in IRREGULAR {
        if lower.ends_with(many) {
            return word.to_string();
        }
        if lower.ends_with(single) {
            return replace_suffix(word, single.len(), many);
        }
    }

    if ends_with_consonant_y(&lower) {
        format!("{}ies", &word[..word.len() - 1])
    } else if lower.ends_with('s')
        || lower.ends_with("sh")
        || lower.ends_with("ch")
        || lower.ends_with('x')
        || lower.ends_with('z')
    {
        format!("{}es", word)
    } else if lower.ends_with("fe") {
        format!("{}ves", &word[..word.len() - 2])
    } else if lower.ends_with('f') && !lower.ends_with("ff") {
        format!("{}ves", &word[..word.len() - 1])
    } else {
        format!("{}s", word)
    }
}

pub fn singular(word: &str) -> String {
    let lower = word.to_lowercase();
    if word.is_empty() || is_uncountable(&lower) {
        return word.to_string();
    }
    for (single, many) in IRREGULAR {
        if lower.ends_with(many) {
            return replace_suffix(word, many.len(), single);
        }
        if lower.ends_with(single) {
            return word.to_string();
        }
    }

    let len = word.len();
    if lower.ends_with("ies") && len > 3 {
        format!("{}y", &word[..len - 3])
    } else if lower.ends_with("ives") {
        format!("{}ife", &word[..len - 4])
    } else if lower.ends_with("ves") && len > 3 {
        format!("{}f", &word[..len - 3])
    } else if lower.ends_with("sses")
        || lower.ends_with("shes")
        || lower.ends_with("ches")
        || lower.ends_with("xes")
        || lower.ends_with("zes")
        || ends_with_consonant_uses(&lower)
    {
        word[..len - 2].to_string()
    } else if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
        word.to_string()
    } else if lower.ends_with('s') {
        word[..len - 1].to_string()
    } else {
        word.to_string()
    }
}

/// `statuses`, `buses` but not `houses`, `causes`
fn ends_with_consonant_uses(lower: &str) -> bool {
    lower
        .strip_suffix("uses")
        .and_then(|stem| stem.chars().last())
        .map_or(false, |c| !"aeiou".contains(c))
}
