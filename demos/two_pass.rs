//! Two passes, one set of identifiers.
//!
//! This demo runs the same small component tree through:
//! - an "upfront" pass that processes siblings back to front, standing in
//!   for a streaming server render where subtrees finish out of order;
//! - a "takeover" pass that walks the emitted markup front to back and
//!   verifies every identifier it finds.
//!
//! The two passes never exchange state, yet every derived identifier
//! matches byte for byte.

use treeid::{
    IdAllocator, Identifier, RequestCounter, TreePath, Verdict, check_takeover, push_fork,
};

const PREFIX: &str = "demo-";

/// (label, identifier) pairs for the three components in the tree:
///
/// ```text
/// root ─┬─ fork ─┬─ "title"
///       │        └─ "body"
///       └─ "footer"
/// ```
fn render(sibling_order: &[usize]) -> Vec<(&'static str, Identifier)> {
    let mut alloc = IdAllocator::new(PREFIX);
    let mut out = Vec::new();

    for &top in sibling_order {
        let path = push_fork(&TreePath::ROOT, top as u32, 2);
        match top {
            0 => {
                // The inner fork: again in the caller-chosen order.
                for &inner in sibling_order {
                    let leaf = push_fork(&path, inner as u32, 2);
                    let label = if inner == 0 { "title" } else { "body" };
                    let mut counter = RequestCounter::new();
                    out.push((label, alloc.request(Some(&leaf), &mut counter)));
                }
            }
            _ => {
                let mut counter = RequestCounter::new();
                out.push(("footer", alloc.request(Some(&path), &mut counter)));
            }
        }
    }
    out
}

fn main() {
    // Upfront pass: "body" and "footer" finished before "title".
    let upfront = render(&[1, 0]);
    println!("upfront pass (reverse completion order):");
    for (label, id) in &upfront {
        println!("  {label:>7} -> {id}");
    }

    // Takeover pass: document order.
    let takeover = render(&[0, 1]);
    println!("\ntakeover pass (document order):");
    for (label, id) in &takeover {
        println!("  {label:>7} -> {id}");
    }

    // Validate the "markup" the upfront pass produced.
    println!("\nvalidation:");
    for (label, emitted) in &upfront {
        let (_, takeover_id) = takeover.iter().find(|(l, _)| l == label).unwrap();
        let path = match *label {
            "title" => push_fork(&push_fork(&TreePath::ROOT, 0, 2), 0, 2),
            "body" => push_fork(&push_fork(&TreePath::ROOT, 0, 2), 1, 2),
            _ => push_fork(&TreePath::ROOT, 1, 2),
        };
        let verdict = check_takeover(emitted.as_str(), PREFIX, &path, 0).unwrap();
        assert_eq!(verdict, Verdict::Matches);
        assert_eq!(emitted, takeover_id);
        println!("  {label:>7} -> {verdict:?}");
    }

    println!("\nall positions agree across passes");
}
