//! Property tests over generated key/value lines

use kv_parser::{ParseError, Parsed, Parser, StrictParser};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn key_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_]{1,12}"
}

fn bare_value_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_./:@-]{1,12}"
}

fn quoted_value_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ,.]{0,16}"
}

fn spaces(min: usize) -> impl Strategy<Value = String> {
    (min..4usize).prop_map(|n| " ".repeat(n))
}

proptest! {
    #[test]
    fn prop_well_formed_lines_parse_completely(
        pairs in prop::collection::btree_map(key_strategy(), bare_value_strategy(), 0..8),
        gaps in prop::collection::vec((spaces(1), spaces(0), spaces(0)), 8),
        lead in spaces(0),
    ) {
        let mut line = lead;
        for ((key, value), (gap, before_eq, after_eq)) in pairs.iter().zip(&gaps) {
            line.push_str(&format!("{key}{before_eq}={after_eq}{value}{gap}"));
        }

        let parsed = Parser::new().parse(&line).unwrap();
        prop_assert_eq!(parsed.len(), pairs.len());
        for (key, value) in &pairs {
            prop_assert_eq!(parsed.get(key), Some(value.as_str()));
        }
    }

    #[test]
    fn prop_quoting_is_transparent_without_spaces(
        key in key_strategy(),
        value in bare_value_strategy(),
    ) {
        let parser = Parser::new();
        let bare = parser.parse(&format!("{key}={value}")).unwrap();
        let quoted = parser.parse(&format!("{key}=\"{value}\"")).unwrap();
        prop_assert_eq!(bare, quoted);
    }

    #[test]
    fn prop_quoted_values_round_trip(
        key in key_strategy(),
        value in quoted_value_strategy(),
        pad in spaces(0),
    ) {
        let line = format!("{pad}{key}{pad}={pad}\"{value}\"{pad}");
        let parsed = Parser::new().parse(&line).unwrap();
        let expected: Parsed = [(key.as_str(), value.as_str())].into_iter().collect();
        prop_assert_eq!(parsed, expected);
    }

    #[test]
    fn prop_case_insensitive_keeps_input_casing(
        pairs in prop::collection::btree_map("[a-z_]{1,10}", bare_value_strategy(), 1..6),
        flips in prop::collection::vec(any::<bool>(), 10),
    ) {
        let allowed: Vec<String> = pairs.keys().cloned().collect();
        let written: BTreeMap<String, String> = pairs
            .iter()
            .map(|(key, value)| {
                let cased: String = key
                    .chars()
                    .zip(flips.iter().cycle())
                    .map(|(ch, &upper)| if upper { ch.to_ascii_uppercase() } else { ch })
                    .collect();
                (cased, value.clone())
            })
            .collect();

        let line = written
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(" ");

        let parsed = StrictParser::with_case_sensitivity(allowed, false)
            .parse(&line)
            .unwrap();
        let expected: Parsed = written.into_iter().collect();
        prop_assert_eq!(parsed, expected);
    }

    #[test]
    fn prop_empty_allow_list_rejects_first_pair(
        key in key_strategy(),
        value in bare_value_strategy(),
    ) {
        let line = format!("{key}={value}");
        let err = StrictParser::default().parse(&line).unwrap_err();
        prop_assert_eq!(
            err,
            ParseError::InvalidKey { invalid_key: key, position: line.len() - 1 }
        );
    }

    #[test]
    fn prop_error_positions_index_the_input(line in "[a-z= \"]{1,24}") {
        if let Err(err) = Parser::new().parse(&line) {
            prop_assert!(err.position() < line.len());
        }
    }
}
