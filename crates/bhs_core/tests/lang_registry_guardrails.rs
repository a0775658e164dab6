use std::collections::HashMap;

use bhs_core::lang::keywords::{self, KeywordCategory};
use bhs_core::lang::punctuation;

#[test]
fn keywords_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, keywords::KeywordId> = HashMap::new();

    for info in keywords::KEYWORDS {
        assert_eq!(
            keywords::from_str(info.canonical),
            Some(info.id),
            "keyword canonical spelling not resolvable: {}",
            info.canonical
        );
        assert_eq!(
            keywords::as_str(info.id),
            info.canonical,
            "keyword as_str mismatch for {:?}",
            info.id
        );

        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!(
                "duplicate keyword spelling {:?}: {:?} and {:?}",
                info.canonical, prev, info.id
            );
        }

        for &alias in info.aliases {
            assert_eq!(
                keywords::from_str(alias),
                Some(info.id),
                "keyword alias not resolvable: {}",
                alias
            );
            if let Some(prev) = seen.insert(alias, info.id) {
                panic!(
                    "duplicate keyword alias spelling {:?}: {:?} and {:?}",
                    alias, prev, info.id
                );
            }
        }
    }
}

#[test]
fn keyword_spellings_are_plain_words() {
    // The recognizers splice these spellings into regex alternations unescaped.
    for info in keywords::KEYWORDS {
        for spelling in std::iter::once(&info.canonical).chain(info.aliases.iter()) {
            assert!(
                spelling.chars().all(|c| c.is_ascii_alphabetic()),
                "keyword spelling must be alphabetic: {}",
                spelling
            );
        }
    }
}

#[test]
fn every_category_is_populated() {
    for category in [
        KeywordCategory::Modifier,
        KeywordCategory::Type,
        KeywordCategory::FunctionForm,
        KeywordCategory::Definition,
    ] {
        assert!(
            !keywords::spellings(category).is_empty(),
            "no keywords registered for {:?}",
            category
        );
    }
}

#[test]
fn bracket_characters_are_distinct() {
    let mut seen = Vec::new();
    for b in punctuation::BRACKETS {
        assert!(!seen.contains(&b.open), "duplicate bracket char {:?}", b.open);
        seen.push(b.open);
        assert!(!seen.contains(&b.close), "duplicate bracket char {:?}", b.close);
        seen.push(b.close);
        assert!(!punctuation::is_identifier_char(b.open));
        assert!(!punctuation::is_identifier_char(b.close));
    }
}
