//! Identifier format behavior: multi-request suffixes, client-only
//! distinguishability, encode/decode round-trips, and malformed input.

use treeid::{
    IdAllocator, MalformedIdentifier, PathBits, Provenance, RequestCounter, TreePath,
    decode_path, encode_path, parse_identifier, push_fork,
};

#[test]
fn three_requests_from_one_instance() {
    // Scenario: one instance asks three times. All three share the
    // derived marker and the same path root; only the request-index
    // suffix distinguishes them.
    let mut alloc = IdAllocator::new("");
    let mut counter = RequestCounter::new();
    let path = push_fork(&TreePath::ROOT, 0, 2);

    let ids: Vec<_> = (0..3)
        .map(|_| alloc.request(Some(&path), &mut counter))
        .collect();

    assert_eq!(ids[0].as_str(), "_R_5_");
    assert_eq!(ids[1].as_str(), "_R_5H1_");
    assert_eq!(ids[2].as_str(), "_R_5H2_");
    for (expected_index, id) in ids.iter().enumerate() {
        assert_eq!(id.provenance(), Provenance::Derived);
        let parsed = parse_identifier(id.as_str(), "").unwrap();
        assert_eq!(parsed.payload, "5");
        assert_eq!(parsed.request_index, expected_index as u32);
    }
}

#[test]
fn rerender_replays_the_same_identifiers() {
    // A diagnostic double-invocation resets the instance counter and
    // replays; the sequence must not drift.
    let mut alloc = IdAllocator::new("");
    let path = push_fork(&TreePath::ROOT, 2, 3);
    let mut counter = RequestCounter::new();

    let first_commit: Vec<String> = (0..4)
        .map(|_| alloc.request(Some(&path), &mut counter).into_string())
        .collect();
    counter.reset();
    let second_commit: Vec<String> = (0..4)
        .map(|_| alloc.request(Some(&path), &mut counter).into_string())
        .collect();

    assert_eq!(first_commit, second_commit);
    let distinct: std::collections::BTreeSet<_> = first_commit.iter().collect();
    assert_eq!(distinct.len(), 4);
}

#[test]
fn client_only_ids_are_always_recognizable() {
    let mut alloc = IdAllocator::new("x-");
    let mut counter = RequestCounter::new();
    for _ in 0..40 {
        let id = alloc.request(None, &mut counter);
        let parsed = parse_identifier(id.as_str(), "x-").unwrap();
        assert_eq!(parsed.provenance, Provenance::ClientOnly);
    }
}

#[test]
fn client_only_never_collides_with_derived() {
    // One traversal minting both kinds: the provenance marker keeps the
    // namespaces apart even when payload digits coincide.
    let mut alloc = IdAllocator::new("");
    let mut counter = RequestCounter::new();
    let derived: Vec<String> = (0..8)
        .map(|i| {
            let path = push_fork(&TreePath::ROOT, i, 8);
            alloc
                .request(Some(&path), &mut RequestCounter::new())
                .into_string()
        })
        .collect();
    let client: Vec<String> = (0..8)
        .map(|_| alloc.request(None, &mut counter).into_string())
        .collect();
    for c in &client {
        assert!(!derived.contains(c));
    }
}

#[test]
fn round_trip_over_a_family_of_fork_sequences() {
    // Sweep tree shapes from shallow to past the spill threshold; every
    // produced path must decode back to its exact fork-bit sequence.
    for total in [1u32, 2, 3, 5, 9, 17, 100] {
        for depth in [1usize, 2, 5, 13, 29] {
            let mut path = TreePath::ROOT;
            let mut expected = String::new();
            for level in 0..depth {
                let index = (level as u32 * 7 + 3) % total;
                path = push_fork(&path, index, total);
                // Newest decision first: prepend this level's slot field.
                let width = 32 - total.leading_zeros();
                let slot = index + 1;
                let field: String = (0..width)
                    .rev()
                    .map(|i| if (slot >> i) & 1 == 1 { '1' } else { '0' })
                    .collect();
                expected.insert_str(0, &field);
            }
            let decoded = decode_path(&encode_path(&path)).unwrap();
            assert_eq!(
                decoded.to_string(),
                expected,
                "total={total} depth={depth}"
            );
            assert_eq!(decoded, path.fork_bits());
        }
    }
}

#[test]
fn overflowing_paths_agree_across_passes() {
    // Deep enough that the word spills several times; both passes build
    // the path independently and still agree on the digits.
    let build = || {
        let mut path = TreePath::ROOT;
        for level in 0u32..100 {
            path = push_fork(&path, level % 4, 4);
        }
        path
    };
    let upfront = build();
    let takeover = build();
    assert_eq!(upfront, takeover);
    assert_eq!(encode_path(&upfront), encode_path(&takeover));
    assert_eq!(upfront.depth_bits(), 300);
    assert!(!upfront.overflow_digits().is_empty());
}

#[test]
fn malformed_markup_fails_without_panicking() {
    // Scenario: the takeover pass meets strings this crate never
    // produced. Every one is a MalformedIdentifier, never a crash.
    let garbage = [
        "",
        "_",
        "__",
        "_R_",
        "_Q_1_",
        "_R_0_",
        "_R__",
        "_R_!!_",
        "_R_1H_",
        "_R_1Hx!_",
        "no-frame-at-all",
        "_R_1_extra",
        "_r_0H2_",
    ];
    for raw in garbage {
        let err = parse_identifier(raw, "").unwrap_err();
        // Exercise Display while we're here; messages must render.
        assert!(!err.to_string().is_empty(), "raw={raw:?} err={err:?}");
    }

    assert_eq!(
        parse_identifier("_Z_1_", "").unwrap_err(),
        MalformedIdentifier::UnknownProvenance('Z')
    );
}

#[test]
fn value_types_serialize() {
    let path = push_fork(&TreePath::ROOT, 1, 2);
    let json = serde_json::to_string(&path).unwrap();
    let back: TreePath = serde_json::from_str(&json).unwrap();
    assert_eq!(back, path);

    let mut alloc = IdAllocator::new("s-");
    let mut counter = RequestCounter::new();
    let id = alloc.request(Some(&path), &mut counter);
    let json = serde_json::to_string(&id).unwrap();
    let back: treeid::Identifier = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

#[test]
fn deserialization_guards_the_path_invariants() {
    // A word of 0 has no length-marker bit; every path operation assumes
    // one is present, so the serde boundary must refuse it outright.
    let err = serde_json::from_str::<TreePath>(r#"{"word":0,"overflow":""}"#).unwrap_err();
    assert!(err.to_string().contains("length marker"), "{err}");

    // Overflow digits outside the alphabet are equally off limits.
    let err = serde_json::from_str::<TreePath>(r#"{"word":5,"overflow":"x"}"#).unwrap_err();
    assert!(err.to_string().contains("base-32"), "{err}");

    // A well-formed value still round-trips.
    let ok: TreePath = serde_json::from_str(r#"{"word":5,"overflow":""}"#).unwrap();
    assert_eq!(ok, push_fork(&TreePath::ROOT, 0, 2));
    assert_eq!(encode_path(&ok), "5");
}

#[test]
fn path_bits_display_is_binary() {
    let bits = PathBits::from_bits(vec![true, false, true]);
    assert_eq!(bits.to_string(), "101");
    assert_eq!(bits.len(), 3);
    assert!(!bits.is_empty());
    assert_eq!(PathBits::default().to_string(), "");
}
