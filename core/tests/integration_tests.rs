use command_args_core::{
    ArgsError, FlagValue, ParseProfile, ParsedArguments, StringView, join_quoted, next_word, split,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parsed(input: &str) -> ParsedArguments {
    ParsedArguments::parse(input).unwrap()
}

fn ctx(name: &str) -> String {
    name.to_string()
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

#[test]
fn unquoted_input_matches_naive_whitespace_split() {
    for input in [
        "a b c",
        "  leading and trailing  ",
        "tabs\tand\nnewlines",
        "-flag value -other 12 -x",
        "unicode ünïcödé 日本語",
    ] {
        let naive: Vec<&str> = input.split_whitespace().collect();
        assert_eq!(split(input).unwrap(), naive, "input: {input:?}");
    }
}

#[test]
fn quoted_words() {
    assert_eq!(split(r#"foo "bar baz""#).unwrap(), vec!["foo", "bar baz"]);
    assert_eq!(
        split(r#"-name "Bob \"The Bold\"""#).unwrap(),
        vec!["-name", r#"Bob "The Bold""#]
    );
}

#[test]
fn unterminated_quote_is_an_error() {
    let err = split(r#""unterminated"#).unwrap_err();
    assert_eq!(
        err,
        ArgsError::UnterminatedQuote {
            expected: Some('"')
        }
    );
    assert!(ParsedArguments::<String>::parse(r#"-name "Bob"#).is_err());
}

#[test]
fn apostrophes_and_mid_word_quotes() {
    assert_eq!(split("don't stop").unwrap(), vec!["don't", "stop"]);
    assert_eq!(split(r#"mid"quote"end"#).unwrap(), vec!["midquoteend"]);
}

#[test]
fn cursor_driven_tokenizing() {
    let mut view = StringView::new("one «two three» four");
    let mut words = Vec::new();
    while let Some(word) = next_word(&mut view).unwrap() {
        words.push(word);
        view.skip_ws();
    }
    assert_eq!(words, vec!["one", "two three", "four"]);
}

#[test]
fn join_quoted_output_splits_back() {
    let words = vec!["-desc", "a \"quoted\" phrase", "-n", "3"];
    assert_eq!(split(&join_quoted(&words)).unwrap(), words);
}

// ---------------------------------------------------------------------------
// Flag building
// ---------------------------------------------------------------------------

#[test]
fn repeated_flags_collect_every_value() {
    let args: ParsedArguments = ParsedArguments::from_tokens(&["-a", "1", "-a", "2"]);
    assert_eq!(args.get("a"), vec!["1", "2"]);
    assert_eq!(args.last("a").as_deref(), Some("2"));
}

#[test]
fn flag_values_are_also_recorded_as_flags() {
    let args: ParsedArguments = ParsedArguments::from_tokens(&["-a", "1"]);
    assert_eq!(args.values("a"), &[FlagValue::from("1")]);
    assert_eq!(args.values("1"), &[FlagValue::Present]);
}

#[test]
fn custom_splitter() {
    let args: ParsedArguments =
        ParsedArguments::parse_with("-a|x y|-b", |s| Ok(s.split('|').map(String::from).collect()))
            .unwrap();
    assert_eq!(args.get("a"), vec!["x y"]);
    assert_eq!(args.values("b"), &[FlagValue::Present]);
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[test]
fn context_overlay_appends_and_restores() {
    let mut args = parsed("-k 1");
    args.add_context(ctx("x"), parsed("-k 2"));

    args.set_context(Some(&ctx("x")));
    assert_eq!(args.get("k"), vec!["1", "2"]);

    args.set_context(None);
    assert_eq!(args.get("k"), vec!["1"]);
}

#[test]
fn switching_between_contexts() {
    let mut args = parsed("-b 1");
    args.add_context(ctx("first"), parsed("-b 2"));
    args.add_context(ctx("second"), parsed("-b 3 -crit"));

    args.set_context(Some(&ctx("first")));
    assert_eq!(args.get("b"), vec!["1", "2"]);
    assert!(!args.contains("crit"));

    args.set_context(Some(&ctx("second")));
    assert_eq!(args.get("b"), vec!["1", "3"]);
    assert!(args.contains("crit"));
}

#[test]
fn ignore_clears_baseline_view_and_overlays() {
    let mut args = parsed("-k 1 -keep yes");
    args.add_context(ctx("x"), parsed("-k 2"));
    args.set_context(Some(&ctx("x")));

    args.ignore("k");
    assert!(!args.contains("k"));

    args.set_context(None);
    assert!(!args.contains("k"));
    args.set_context(Some(&ctx("x")));
    assert!(!args.contains("k"));
    assert!(args.context(&ctx("x")).is_some_and(|o| !o.contains("k")));
    assert_eq!(args.get("keep"), vec!["yes"]);
}

#[test]
fn missing_flag_default_skips_coercion() {
    let args = parsed("");
    let empty: Vec<i32> = Vec::new();
    let result = args
        .get_or("missing", empty.clone(), |_: &str| -> Result<i32, String> {
            panic!("coerce must not run for a missing flag")
        })
        .unwrap();
    assert_eq!(result, empty);
}

#[test]
fn failed_coercion_is_invalid_argument() {
    let args = parsed("-n x");
    let err = args.last_as("n", str::parse::<i64>).unwrap_err();
    assert!(matches!(err, ArgsError::InvalidArgument { .. }));
    assert!(err.to_string().contains("`n`"));
}

#[test]
fn typed_reads() {
    let args = parsed("-level 5 -ratio 0.5 -verbose");
    assert_eq!(args.last_or("level", 1, str::parse::<u8>).unwrap(), 5);
    assert_eq!(args.last_or("ratio", 1.0, str::parse::<f64>).unwrap(), 0.5);
    assert!(args.last_or("verbose", false, str::parse::<bool>).unwrap());
    assert!(!args.last_or("quiet", false, str::parse::<bool>).unwrap());
}

#[test]
fn direct_mutations_track_the_baseline() {
    let mut args = parsed("-a 1");
    args.update([("a", vec!["2", "3"]), ("b", vec!["4"])]);
    args.update_if_absent([("a", Some("9")), ("c", Some("5")), ("d", None)]);
    args.set_context(None);

    assert_eq!(args.get("a"), vec!["2", "3"]);
    assert_eq!(args.get("b"), vec!["4"]);
    assert_eq!(args.get("c"), vec!["5"]);
    assert!(!args.contains("d"));
}

#[test]
fn profile_drives_the_store() {
    let profile = ParseProfile::from_yaml(
        r#"
contexts:
  melee: "-b 2"
defaults:
  b: "0"
  name: Anonymous
ignore: [debug]
"#,
    )
    .unwrap();

    let mut args = parsed("-b 1 -debug");
    profile.apply(&mut args).unwrap();
    assert_eq!(args.get("b"), vec!["1"]);
    assert_eq!(args.last("name").as_deref(), Some("Anonymous"));
    assert!(!args.contains("debug"));

    args.set_context(Some(&ctx("melee")));
    assert_eq!(args.get_as("b", str::parse::<i32>).unwrap(), vec![1, 2]);
}
