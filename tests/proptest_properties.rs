use doccmp::{
    Branch, Divergence, IgnoreEntry, Key, Node, Scalar, compare, compare_with_spec, equals,
    normalize,
};
use proptest::prelude::*;

// Floats are left out: NaN is never strictly equal to itself.
fn leaf() -> impl Strategy<Value = Node> {
    prop_oneof![
        Just(Node::Leaf(Scalar::Null)),
        any::<bool>().prop_map(Node::from),
        any::<i64>().prop_map(Node::from),
        "[a-z0-9]{0,4}".prop_map(Node::from),
    ]
}

fn key() -> impl Strategy<Value = Key> {
    prop_oneof!["[a-e]".prop_map(Key::from), (0u64..4).prop_map(Key::Index)]
}

fn node() -> impl Strategy<Value = Node> {
    leaf().prop_recursive(4, 64, 6, |inner| {
        prop::collection::btree_map(key(), inner, 0..6).prop_map(Node::Branch)
    })
}

fn branch() -> impl Strategy<Value = Branch> {
    prop::collection::btree_map(key(), node(), 0..6)
}

fn entries() -> impl Strategy<Value = Vec<IgnoreEntry>> {
    let entry = key().prop_map(IgnoreEntry::Key).prop_recursive(3, 32, 4, |inner| {
        (key(), prop::collection::vec(inner, 0..4))
            .prop_map(|(k, nested)| IgnoreEntry::Nested(k, nested))
    });
    prop::collection::vec(entry, 0..5)
}

fn with(doc: &Branch, key: &Key, value: Node) -> Branch {
    let mut out = doc.clone();
    out.insert(key.clone(), value);
    out
}

proptest! {
    #[test]
    fn prop_reflexive(doc in branch()) {
        prop_assert!(equals(&doc, &doc, &[]));
    }

    #[test]
    fn prop_reflexive_under_any_ignore_list(doc in branch(), ignore in entries()) {
        prop_assert!(equals(&doc, &doc, &ignore));
    }

    #[test]
    fn prop_right_only_keys_are_invisible(doc in branch(), extra in node()) {
        let extra_key = Key::from("zz_extra");
        let right = with(&doc, &extra_key, extra);
        prop_assert!(equals(&doc, &right, &[]));
    }

    #[test]
    fn prop_left_only_keys_diverge(doc in branch(), extra in node()) {
        let extra_key = Key::from("zz_extra");
        let left = with(&doc, &extra_key, extra.clone());
        let cmp = compare(&left, &doc, &[]);
        prop_assert!(!cmp.is_equal());
        prop_assert_eq!(cmp.diff().get(&extra_key), Some(&Divergence::Missing(&extra)));
        prop_assert!(equals(&left, &doc, &[IgnoreEntry::Key(extra_key)]));
    }

    #[test]
    fn prop_full_exclusion_hides_any_change(
        doc in branch(),
        k in key(),
        a in node(),
        b in node(),
    ) {
        let left = with(&doc, &k, a);
        let right = with(&doc, &k, b);
        prop_assert!(equals(&left, &right, &[IgnoreEntry::Key(k)]));
    }

    #[test]
    fn prop_partial_exclusion_hides_only_the_nested_key(
        doc in branch(),
        shared in branch(),
        k in key(),
        j in key(),
        a in node(),
        b in node(),
    ) {
        let left = with(&doc, &k, Node::Branch(with(&shared, &j, a.clone())));
        let right = with(&doc, &k, Node::Branch(with(&shared, &j, b.clone())));
        let ignore = [IgnoreEntry::Nested(k.clone(), vec![IgnoreEntry::Key(j.clone())])];
        prop_assert!(equals(&left, &right, &ignore));

        // Without the nested rule the outcome is that of `j` alone.
        let only_j_left = Branch::from([(j.clone(), a)]);
        let only_j_right = Branch::from([(j, b)]);
        prop_assert_eq!(
            equals(&left, &right, &[]),
            equals(&only_j_left, &only_j_right, &[])
        );
    }

    #[test]
    fn prop_normalization_is_idempotent(
        ignore in entries(),
        left in branch(),
        right in branch(),
    ) {
        let spec = normalize(&ignore);
        let again = normalize(&spec.to_entries());
        prop_assert_eq!(&again, &spec);
        prop_assert_eq!(
            compare_with_spec(&left, &right, &spec),
            compare_with_spec(&left, &right, &again)
        );
    }
}
