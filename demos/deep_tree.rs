//! Unbounded depth: watch the word budget spill into overflow digits.
//!
//! Forks a 6-wide list 60 levels deep (180 path bits — three times the
//! fast-path word) and shows that the encoding keeps growing without
//! losing a single fork decision.

use treeid::{TreePath, decode_path, derived_identifier, encode_path, push_fork};

fn main() {
    let mut path = TreePath::ROOT;
    for level in 0u32..60 {
        path = push_fork(&path, level % 6, 6);
        if level % 12 == 11 {
            println!(
                "depth {:>2}: {:>3} bits, {:>2} overflow digits, id {}",
                level + 1,
                path.depth_bits(),
                path.overflow_digits().len(),
                derived_identifier("deep-", &path, 0)
            );
        }
    }

    let digits = encode_path(&path);
    let bits = decode_path(&digits).expect("internally produced digits always decode");
    assert_eq!(bits, path.fork_bits());
    assert_eq!(bits.len(), 180);

    println!("\nfinal digits : {digits}");
    println!("decoded bits : {bits}");
    println!("round-tripped {} fork-decision bits losslessly", bits.len());
}
