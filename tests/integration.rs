//! Integration tests for the public matcher API.
//!
//! These exercise the crate the way a linter or codemod would: build or
//! compile a matcher once, test it against many parsed statements, and fold
//! the matches to extract data.

use prism_matchers::build::*;
use prism_matchers::{NodeMatcher, compile};

fn parse_ruby(source: &str) -> ruby_prism::ParseResult<'_> {
    ruby_prism::parse(source.as_bytes())
}

fn top_stmts<'a>(result: &'a ruby_prism::ParseResult<'a>) -> Vec<ruby_prism::Node<'a>> {
    result
        .node()
        .as_program_node()
        .unwrap()
        .statements()
        .body()
        .iter()
        .collect()
}

#[test]
fn extract_required_gems() {
    // One matcher, many candidates: collect the argument of every
    // top-level `require` call.
    let source = "\
require 'json'
require 'set'
puts 'hello'
x = require_relative 'lib/foo'
require 'time'
";
    let result = parse_ruby(source);

    let pat: NodeMatcher<Vec<String>> = send(SendMatcher {
        receiver: absent(),
        name: is("require"),
        args: seq([str_(StrMatcher {
            then: on_str(|mut acc: Vec<String>, n, _| {
                acc.push(String::from_utf8_lossy(&n.unescaped()).into_owned());
                acc
            }),
            ..Default::default()
        })]),
        ..Default::default()
    });

    let mut gems = Vec::new();
    for stmt in top_stmts(&result) {
        if pat.test(&stmt, &()) {
            gems = pat.fold(gems, &stmt, &mut ());
        }
    }
    assert_eq!(gems, vec!["json".to_string(), "set".to_string(), "time".to_string()]);
}

#[test]
fn compiled_and_built_matchers_agree() {
    let compiled: NodeMatcher = compile("(send (send _ :where) {:first :take})").unwrap();
    let built: NodeMatcher = send(SendMatcher {
        receiver: one(send(SendMatcher { name: is("where"), ..Default::default() })),
        name: is("first"),
        ..Default::default()
    });

    for (source, expect_compiled) in [
        ("users.where(active: true).first", true),
        ("users.where(active: true).take", true),
        ("users.where(active: true).last", false),
        ("users.first", false),
    ] {
        let result = parse_ruby(source);
        let stmt = &top_stmts(&result)[0];
        assert_eq!(compiled.test(stmt, &()), expect_compiled, "pattern vs {source}");
        if expect_compiled && source.ends_with("first") {
            assert!(built.test(stmt, &()));
        }
    }
}

#[test]
fn context_threads_through_the_fold() {
    // The context is the caller's: here a running count of matches seen,
    // mutated by callbacks during folds and read-only during tests.
    let source = "a.compact\nb.compact\nc.flatten\n";
    let result = parse_ruby(source);

    let pat: NodeMatcher<(), usize> = send(SendMatcher {
        name: is("compact"),
        then: on_send(|acc, _, seen: &mut usize| {
            *seen += 1;
            acc
        }),
        ..Default::default()
    });

    let mut seen = 0usize;
    for stmt in top_stmts(&result) {
        if pat.test(&stmt, &seen) {
            pat.run(&stmt, &mut seen);
        }
    }
    assert_eq!(seen, 2);
}

#[test]
fn callbacks_fire_in_post_order_across_nesting() {
    let source = "outer(inner(1))";
    let result = parse_ruby(source);
    let stmt = &top_stmts(&result)[0];

    let pat: NodeMatcher<Vec<&'static str>> = send(SendMatcher {
        name: is("outer"),
        args: seq([send(SendMatcher {
            name: is("inner"),
            args: seq([int(IntMatcher {
                then: on_int(|mut acc: Vec<&'static str>, _, _| {
                    acc.push("literal");
                    acc
                }),
                ..Default::default()
            })]),
            then: on_send(|mut acc: Vec<&'static str>, _, _| {
                acc.push("inner");
                acc
            }),
            ..Default::default()
        })]),
        then: on_send(|mut acc: Vec<&'static str>, _, _| {
            acc.push("outer");
            acc
        }),
        ..Default::default()
    });

    assert!(pat.test(stmt, &()));
    let order = pat.fold(Vec::new(), stmt, &mut ());
    assert_eq!(order, vec!["literal", "inner", "outer"]);
}

#[test]
fn block_pattern_end_to_end() {
    let pat: NodeMatcher = compile("(block (send _ {:each :map}) _ (send _ :save))").unwrap();

    let result = parse_ruby("records.each { |r| r.save }");
    assert!(pat.test(&top_stmts(&result)[0], &()));

    let result = parse_ruby("records.each { |r| r.destroy }");
    assert!(!pat.test(&top_stmts(&result)[0], &()));

    let result = parse_ruby("records.reject { |r| r.save }");
    assert!(!pat.test(&top_stmts(&result)[0], &()));
}

#[test]
fn matcher_reuse_is_deterministic() {
    let pat: NodeMatcher = compile("(if _ _ nil?)").unwrap();
    let with_else = parse_ruby("if a; b; else; c; end");
    let without_else = parse_ruby("if a; b; end");
    let with_else = &top_stmts(&with_else)[0];
    let without_else = &top_stmts(&without_else)[0];

    for _ in 0..3 {
        assert!(!pat.test(with_else, &()));
        assert!(pat.test(without_else, &()));
    }
}
