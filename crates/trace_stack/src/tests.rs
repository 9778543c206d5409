use super::*;

/// Depth-counted walk over a chain of nested boxes.
enum Nested {
    Leaf,
    Node(Box<Nested>),
}

fn build(depth: usize) -> Nested {
    (0..depth).fold(Nested::Leaf, |inner, _| Nested::Node(Box::new(inner)))
}

fn measure(node: &Nested, depth: usize, limit: usize) -> usize {
    ensure_sufficient_stack(|| match node {
        Nested::Node(_) if depth >= limit => depth,
        Nested::Node(inner) => measure(inner, depth + 1, limit),
        Nested::Leaf => depth,
    })
}

#[test]
fn test_limit_stops_walk() {
    let chain = build(50);
    assert_eq!(measure(&chain, 0, 10), 10);
}

#[test]
fn test_deep_walk_does_not_overflow() {
    let chain = build(100_000);
    assert_eq!(measure(&chain, 0, usize::MAX), 100_000);
    // Iterative drop; the recursive Drop would overflow on its own.
    let mut cur = chain;
    while let Nested::Node(inner) = cur {
        cur = *inner;
    }
}

#[test]
fn test_returns_closure_result() {
    let result: Result<i32, &str> = ensure_sufficient_stack(|| Ok(123));
    assert_eq!(result, Ok(123));
}
