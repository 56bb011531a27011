//! Allow-list parsing, case-sensitive and case-insensitive

use kv_parser::{
    DuplicateKeyBehavior, ParseError, Parsed, Parser, ParserConfig, StrictKeys, StrictParser,
};

fn expected(pairs: &[(&str, &str)]) -> Parsed {
    pairs.iter().copied().collect()
}

fn invalid_key(key: &str, position: usize) -> ParseError {
    ParseError::InvalidKey {
        invalid_key: key.to_string(),
        position,
    }
}

#[cfg(test)]
mod strict_parser {
    use super::*;

    #[test]
    fn test_single_allowed_key() {
        let parser = StrictParser::new(["name"]);
        assert_eq!(parser.parse("age=23"), Err(invalid_key("age", 5)));
        assert_eq!(parser.parse("name=john"), Ok(expected(&[("name", "john")])));
    }

    #[test]
    fn test_multiple_allowed_keys() {
        let parser = StrictParser::new(["name", "age"]);
        assert_eq!(
            parser.parse("name=john age=23").unwrap(),
            expected(&[("name", "john"), ("age", "23")])
        );
        assert_eq!(parser.parse("color=blue"), Err(invalid_key("color", 9)));
    }

    #[test]
    fn test_one_invalid_key_among_valid_ones() {
        let parser = StrictParser::new(["name", "age"]);
        assert_eq!(
            parser.parse("name=john color=blue age=23"),
            Err(invalid_key("color", 20))
        );
    }

    #[test]
    fn test_spaces_around_assignment() {
        let parser = StrictParser::new(["name", "age"]);
        assert_eq!(parser.parse("color   = blue"), Err(invalid_key("color", 13)));
        assert_eq!(
            parser.parse("color   = \"blue\""),
            Err(invalid_key("color", 15))
        );
        assert_eq!(
            parser.parse("name = john color   = \"light blue\""),
            Err(invalid_key("color", 33))
        );
    }

    #[test]
    fn test_no_allowed_keys() {
        let empty: [&str; 0] = [];
        assert_eq!(
            StrictParser::new(empty).parse("name=john"),
            Err(invalid_key("name", 8))
        );
        assert_eq!(
            StrictParser::default().parse("name=john"),
            Err(invalid_key("name", 8))
        );
    }

    #[test]
    fn test_empty_input_is_fine_with_empty_allow_list() {
        assert!(StrictParser::default().parse("   ").unwrap().is_empty());
    }

    #[test]
    fn test_owned_allow_list() {
        let allowed = vec!["name".to_string(), "age".to_string()];
        let parser = StrictParser::new(allowed);
        assert_eq!(parser.allowed_keys(), &["name".to_string(), "age".to_string()]);
        assert!(parser.parse("age=1").is_ok());
    }

    #[test]
    fn test_from_keys() {
        let parser = StrictParser::from_keys(StrictKeys::new(["id"], false));
        assert!(!parser.is_case_sensitive());
        assert_eq!(parser.parse("ID=7").unwrap(), expected(&[("ID", "7")]));
    }

    #[test]
    fn test_config_forwarded() {
        let config = ParserConfig::new().with_duplicate_key_behavior(DuplicateKeyBehavior::Error);
        let parser = StrictParser::new(["a"]).with_config(config.clone());
        assert_eq!(parser.as_parser().config(), &config);
        assert!(matches!(
            parser.parse("a=1 a=2"),
            Err(ParseError::DuplicateKey { .. })
        ));
    }

    #[test]
    fn test_shared_across_threads() {
        let parser = std::sync::Arc::new(StrictParser::new(["name"]));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let parser = parser.clone();
                std::thread::spawn(move || parser.parse(&format!("name=n{}", i)))
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let parsed = handle.join().unwrap().unwrap();
            assert_eq!(parsed.get("name"), Some(format!("n{}", i).as_str()));
        }
    }
}

#[cfg(test)]
mod case_insensitive {
    use super::*;

    #[test]
    fn test_lower_case_allow_list_upper_case_input() {
        let parser = StrictParser::with_case_sensitivity(["name"], false);
        assert_eq!(
            parser.parse("NAME=jayanth").unwrap(),
            expected(&[("NAME", "jayanth")])
        );
    }

    #[test]
    fn test_mixed_case_allow_list_lower_case_input() {
        let parser = StrictParser::with_case_sensitivity(["Name"], false);
        assert_eq!(
            parser.parse("name=jayanth").unwrap(),
            expected(&[("name", "jayanth")])
        );
    }

    #[test]
    fn test_mixed_case_input_keeps_its_casing() {
        let parser = StrictParser::with_case_sensitivity(["name", "company"], false);
        assert_eq!(
            parser.parse("NaMe=jayanth ComPany=thoughtworks").unwrap(),
            expected(&[("NaMe", "jayanth"), ("ComPany", "thoughtworks")])
        );
    }

    #[test]
    fn test_unknown_key_still_rejected() {
        let parser = StrictParser::with_case_sensitivity(["name"], false);
        assert_eq!(parser.parse("AGE=23"), Err(invalid_key("AGE", 5)));
    }
}

#[cfg(test)]
mod case_sensitive {
    use super::*;

    #[test]
    fn test_upper_case_input_rejected() {
        let parser = StrictParser::with_case_sensitivity(["name"], true);
        assert_eq!(parser.parse("NAME=jayanth"), Err(invalid_key("NAME", 11)));
    }

    #[test]
    fn test_lower_case_input_rejected_for_upper_case_allow_list() {
        let parser = StrictParser::with_case_sensitivity(["NAME"], true);
        assert!(matches!(
            parser.parse("name=jayanth"),
            Err(ParseError::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_default_is_case_sensitive() {
        let parser = StrictParser::new(["name"]);
        assert!(parser.is_case_sensitive());
        assert!(parser.parse("Name=x").is_err());
    }

    #[test]
    fn test_permissive_parser_ignores_allow_lists() {
        assert!(Parser::new().parse("anything=goes").is_ok());
    }
}
