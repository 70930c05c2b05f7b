use weft::{base_english, ErrorClass, Grammar, WeftError};

// ---
// Test Setup
// ---

fn grammar(entries: &[(&str, &[&str])]) -> Grammar {
    Grammar::from_map(
        entries
            .iter()
            .map(|(key, rules)| (key.to_string(), rules.to_vec())),
    )
    .with_modifiers(base_english())
    .with_seed(1234)
}

// ---
// Plain text and escapes
// ---

#[test]
fn test_plain_text_passes_through() {
    let mut g = Grammar::new();
    assert_eq!(g.flatten("Hello world."), "Hello world.");
    assert!(g.errors().is_empty());
}

#[test]
fn test_empty_rule_yields_empty_text() {
    let mut g = Grammar::new();
    assert_eq!(g.flatten(""), "");
    assert!(g.errors().is_empty());
}

#[test]
fn test_escaped_hash_is_literal() {
    let mut g = Grammar::new();
    assert_eq!(g.flatten(r"\#"), "#");
    assert_eq!(g.flatten(r"a\#b\#c"), "a#b#c");
    assert!(g.errors().is_empty());
}

#[test]
fn test_escaped_backslash_collapses() {
    let mut g = Grammar::new();
    assert_eq!(g.flatten(r"\\X"), r"\X");
}

#[test]
fn test_escaped_brackets_are_literal() {
    let mut g = Grammar::new();
    assert_eq!(g.flatten(r"\[key:rule\]"), "[key:rule]");
    assert!(g.errors().is_empty());
}

#[test]
fn test_preserve_escapes_skips_unescaping() {
    let mut g = Grammar::new();
    let result = g.expand(r"a\#b", true);
    assert_eq!(result.text, r"a\#b");
    assert!(result.errors.is_empty());
}

#[test]
fn test_escapes_cleared_after_symbol_expansion() {
    let mut g = grammar(&[("x", &[r"\#not a tag\#"])]);
    assert_eq!(g.flatten("#x#"), "#not a tag#");
}

// ---
// Symbol expansion
// ---

#[test]
fn test_single_alternative_is_deterministic() {
    let mut g = grammar(&[("origin", &["#a# #a#"]), ("a", &["X"])]);
    assert_eq!(g.flatten("#origin#"), "X X");
    assert!(g.errors().is_empty());
}

#[test]
fn test_nested_expansion() {
    let mut g = grammar(&[
        ("origin", &["the #animal#"]),
        ("animal", &["#bird#"]),
        ("bird", &["owl"]),
    ]);
    assert_eq!(g.flatten("#origin#"), "the owl");
}

#[test]
fn test_selection_covers_all_alternatives() {
    let mut g = grammar(&[("coin", &["heads", "tails"])]);
    let mut seen_heads = false;
    let mut seen_tails = false;
    for _ in 0..100 {
        match g.flatten("#coin#").as_str() {
            "heads" => seen_heads = true,
            "tails" => seen_tails = true,
            other => panic!("unexpected expansion: {other}"),
        }
    }
    assert!(seen_heads && seen_tails);
}

#[test]
fn test_unknown_symbol_yields_placeholder_and_one_error() {
    let mut g = Grammar::new();
    let result = g.expand("#nope#", false);
    assert_eq!(result.text, "((nope))");
    assert_eq!(
        result.errors,
        vec![WeftError::UnknownSymbol { key: "nope".into() }]
    );
    assert_eq!(result.errors[0].class(), ErrorClass::Resolution);
    // The same diagnostics land in the grammar-wide log.
    assert_eq!(g.errors(), result.errors.as_slice());
}

#[test]
fn test_use_log_records_selections() {
    let mut g = grammar(&[("origin", &["#a#"]), ("a", &["X"])]);
    g.flatten("#origin#");
    let uses = g.symbol("origin").unwrap().uses();
    assert_eq!(uses.len(), 1);
    assert_eq!(uses[0].tag, "origin");
    // `a` is selected one level deeper than `origin`.
    let inner = g.symbol("a").unwrap().uses();
    assert_eq!(inner.len(), 1);
    assert!(inner[0].depth > uses[0].depth);
}

// ---
// Modifiers
// ---

#[test]
fn test_modifier_chain_applies_left_to_right() {
    let mut g = grammar(&[("animal", &["owl"])]);
    assert_eq!(g.flatten("#animal.capitalize.s#"), "Owls");
    assert_eq!(g.flatten("#animal.s.capitalize#"), "Owls");
    assert_eq!(g.flatten("#animal.uppercase#"), "OWL");
}

#[test]
fn test_modifier_with_parameters() {
    let mut g = grammar(&[("x", &["banana"])]);
    assert_eq!(g.flatten("#x.replace(a,o)#"), "bonono");
}

#[test]
fn test_article_modifier_on_expansion() {
    let mut g = grammar(&[("animal", &["owl"])]);
    assert_eq!(g.flatten("#animal.a#"), "an owl");
}

#[test]
fn test_missing_modifier_appends_marker() {
    let mut g = grammar(&[("x", &["word"])]);
    let result = g.expand("#x.unknownMod#", false);
    assert_eq!(result.text, "word((.unknownMod))");
    assert_eq!(
        result.errors,
        vec![WeftError::MissingModifier {
            name: "unknownMod".into()
        }]
    );
    assert_eq!(result.errors[0].class(), ErrorClass::Resolution);
}

#[test]
fn test_missing_modifier_does_not_stop_the_chain() {
    let mut g = grammar(&[("x", &["word"])]);
    // The valid modifier before the missing one has already applied...
    let result = g.expand("#x.capitalize.unknownMod#", false);
    assert_eq!(result.text, "Word((.unknownMod))");
    // ...and one after the missing one still applies, marker included.
    let result = g.expand("#x.unknownMod.uppercase#", false);
    assert_eq!(result.text, "WORD((.UNKNOWNMOD))");
}

// ---
// Actions and scoped bindings
// ---

#[test]
fn test_tag_preaction_binding_is_scoped_to_the_tag() {
    let mut g = grammar(&[
        ("origin", &["#[hero:Anna]story#"]),
        ("story", &["#hero# met #hero#"]),
    ]);
    assert_eq!(g.flatten("#origin#"), "Anna met Anna");

    // The paired pop ran when the tag finished: `hero` no longer resolves.
    let result = g.expand("#hero#", false);
    assert_eq!(result.text, "((hero))");
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].class(), ErrorClass::Resolution);
}

#[test]
fn test_pushed_random_value_is_reused_consistently() {
    let mut g = grammar(&[
        ("name", &["Arjun", "Yuuma", "Darcy", "Mia", "Chiaki"]),
        ("origin", &["#[hero:#name#]story#"]),
        ("story", &["#hero# and #hero# and #hero#"]),
    ]);
    for _ in 0..20 {
        let text = g.flatten("#origin#");
        let parts: Vec<&str> = text.split(" and ").collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], parts[1]);
        assert_eq!(parts[1], parts[2]);
    }
}

#[test]
fn test_bare_action_emits_no_text() {
    let mut g = grammar(&[("story", &["#hero#"])]);
    assert_eq!(g.flatten("[hero:Anna]#story#"), "Anna");
}

#[test]
fn test_bare_push_is_not_auto_popped() {
    let mut g = grammar(&[("story", &["#hero#"])]);
    // Only tag pre-actions get a synthesized pop; a bare action binds for
    // the rest of the grammar's life (until popped or cleared).
    g.flatten("[hero:Anna]");
    assert_eq!(g.flatten("#story#"), "Anna");
}

#[test]
fn test_explicit_pop_action() {
    let mut g = grammar(&[("k", &["base"])]);
    assert_eq!(g.flatten("[k:over]#k# [k:POP]#k#"), "over base");
    assert!(g.errors().is_empty());
}

#[test]
fn test_call_action_discards_text_but_keeps_side_effects() {
    let mut g = grammar(&[("setup", &["[hero:Anna]"]), ("story", &["#hero#"])]);
    // `[#setup#]` expands `#setup#` for its side effects only; the nested
    // push escapes the call because calls have no paired pop.
    assert_eq!(g.flatten("[#setup#]#story#"), "Anna");
    assert_eq!(g.flatten("#story#"), "Anna");
}

#[test]
fn test_push_rules_pre_expanded_before_binding() {
    let mut g = grammar(&[
        ("animal", &["owl"]),
        ("origin", &["#[pet:the #animal#]story#"]),
        ("story", &["#pet#, always #pet#"]),
    ]);
    assert_eq!(g.flatten("#origin#"), "the owl, always the owl");
}

#[test]
fn test_multi_rule_push_binds_alternatives() {
    let mut g = grammar(&[
        ("origin", &["#[mood:vexed,wistful]story#"]),
        ("story", &["#mood#"]),
    ]);
    let mut seen = std::collections::HashSet::new();
    for _ in 0..100 {
        seen.insert(g.flatten("#origin#"));
    }
    assert_eq!(seen.len(), 2);
    assert!(seen.contains("vexed"));
    assert!(seen.contains("wistful"));
}

// ---
// Malformed input stays soft
// ---

#[test]
fn test_unclosed_tag_still_produces_text() {
    let mut g = Grammar::new();
    let result = g.expand("before #oops", false);
    assert_eq!(result.text, "before oops");
    assert_eq!(result.errors, vec![WeftError::UnclosedTag]);
}

#[test]
fn test_empty_tag_reports_parse_and_structural_errors() {
    let mut g = Grammar::new();
    let result = g.expand("a##b", false);
    assert_eq!(result.text, "ab");
    assert!(result
        .errors
        .iter()
        .any(|e| matches!(e, WeftError::EmptyTag { .. })));
}

#[test]
fn test_action_only_tag_runs_actions_without_output() {
    let mut g = grammar(&[("later", &["#hero#"])]);
    let result = g.expand("#[hero:Anna]#", false);
    assert_eq!(result.text, "");
    assert!(result
        .errors
        .iter()
        .any(|e| matches!(e, WeftError::MissingSymbolSection { .. })));
    // The binding was pushed and popped around the empty tag body.
    assert_eq!(g.flatten("#later#"), "((hero))");
}
