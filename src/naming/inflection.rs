//! Pluralization and singularization of the last word of a name.
//!
//! Database names are usually compound (`ARTIST_EXHIBIT`); only the final
//! word takes the inflection. `inflector` handles regular English, the table
//! below covers irregular nouns common in schemas.

use inflector::Inflector;

/// (singular, plural) pairs `inflector` gets wrong or leaves alone.
const IRREGULAR_NOUNS: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("leaf", "leaves"),
    ("life", "lives"),
    ("wife", "wives"),
    ("knife", "knives"),
    ("half", "halves"),
    ("shelf", "shelves"),
    ("hero", "heroes"),
    ("potato", "potatoes"),
    ("analysis", "analyses"),
    ("basis", "bases"),
    ("crisis", "crises"),
    ("thesis", "theses"),
    ("criterion", "criteria"),
    ("phenomenon", "phenomena"),
    ("datum", "data"),
    ("medium", "media"),
    ("index", "indices"),
    ("matrix", "matrices"),
    ("vertex", "vertices"),
    ("appendix", "appendices"),
];

#[derive(Clone, Copy)]
enum Number {
    Singular,
    Plural,
}

fn irregular(word: &str, to: Number) -> Option<&'static str> {
    let lower = word.to_lowercase();
    IRREGULAR_NOUNS.iter().find_map(|(singular, plural)| {
        if lower != *singular && lower != *plural {
            return None;
        }
        Some(match to {
            Number::Singular => *singular,
            Number::Plural => *plural,
        })
    })
}

fn inflect_word(word: &str, to: Number) -> String {
    if word.is_empty() {
        return String::new();
    }
    if let Some(found) = irregular(word, to) {
        return found.to_string();
    }
    match to {
        Number::Singular => word.to_lowercase().to_singular(),
        Number::Plural => word.to_lowercase().to_plural(),
    }
}

/// Inflect the word after the last `_` of a lower-cased snake name.
fn inflect_last(name: &str, to: Number) -> String {
    let name = name.to_lowercase();
    match name.rsplit_once('_') {
        Some((head, last)) if !last.is_empty() => format!("{}_{}", head, inflect_word(last, to)),
        _ => inflect_word(&name, to),
    }
}

/// Plural of a (possibly compound) database name, lower-cased.
///
/// ```ignore
/// assert_eq!(pluralize("PAINTING"), "paintings");
/// assert_eq!(pluralize("ARTIST_EXHIBIT"), "artist_exhibits");
/// assert_eq!(pluralize("PERSON"), "people");
/// ```
pub fn pluralize(name: &str) -> String {
    inflect_last(name, Number::Plural)
}

/// Singular of a (possibly compound) database name, lower-cased.
pub fn singularize(name: &str) -> String {
    inflect_last(name, Number::Singular)
}
