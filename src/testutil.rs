//! Shared helpers for unit tests.

/// Parse a Ruby snippet. Panics on empty input only when callers index into
/// it; parse itself accepts anything.
pub fn parse_ruby(source: &str) -> ruby_prism::ParseResult<'_> {
    ruby_prism::parse(source.as_bytes())
}

/// The first top-level statement of a parse result.
///
/// Panics if the program is empty; tests always pass non-empty snippets.
pub fn first_stmt<'pr>(result: &'pr ruby_prism::ParseResult<'pr>) -> ruby_prism::Node<'pr> {
    result
        .node()
        .as_program_node()
        .unwrap()
        .statements()
        .body()
        .iter()
        .next()
        .unwrap()
}
