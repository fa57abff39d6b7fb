// ABOUTME: Depth-first pre-order collection of design nodes matching a predicate
// ABOUTME: Pure functions over an immutable tree; the capped variant stops early

use crate::node::DesignNode;

/// Collect every node matching `predicate`, in document order
pub fn collect<'a, P>(root: &'a DesignNode, predicate: P) -> Vec<&'a DesignNode>
where
    P: Fn(&DesignNode) -> bool,
{
    collect_limited(root, predicate, usize::MAX)
}

/// Collect at most `limit` matching nodes, stopping traversal once the cap is hit
pub fn collect_limited<'a, P>(root: &'a DesignNode, predicate: P, limit: usize) -> Vec<&'a DesignNode>
where
    P: Fn(&DesignNode) -> bool,
{
    let mut matched = Vec::new();
    if limit == 0 {
        return matched;
    }

    // Explicit stack keeps very deep documents off the call stack.
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if predicate(node) {
            matched.push(node);
            if matched.len() >= limit {
                break;
            }
        }
        stack.extend(node.children().iter().rev());
    }

    matched
}

/// Count matching nodes without materialising them
pub fn count<P>(root: &DesignNode, predicate: P) -> usize
where
    P: Fn(&DesignNode) -> bool,
{
    let mut total = 0;
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if predicate(node) {
            total += 1;
        }
        stack.extend(node.children().iter());
    }
    total
}
