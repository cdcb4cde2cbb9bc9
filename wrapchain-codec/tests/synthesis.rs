//! End-to-end synthesis tests: assemble a chain, then run it over real content
//! with the filter models.

use proptest::prelude::*;
use wrapchain_codec::injector::push_char;
use wrapchain_codec::{
    length_trace, synthesize, Chain, Primitive, SynthesisOpts, TargetSpec, WrapError,
};
use wrapchain_format::align_right;
use wrapchain_format::constants::DEFAULT_PADDING_CHARACTER;
use wrapchain_test_utils::{expected_wrap, show, SourceBuilder};

fn wrap(prefix: &[u8], suffix: &[u8], estimated_len: usize, content: &[u8]) -> Vec<u8> {
    let target = TargetSpec::new(prefix.to_vec(), suffix.to_vec(), estimated_len);
    let synthesis = synthesize(&target, &SynthesisOpts::default()).expect("synthesize");
    assert!(synthesis.verified);
    synthesis.chain.apply(content).expect("apply chain")
}

#[test]
fn json_message_around_1008_bytes() {
    let content = SourceBuilder::new().printable(1008).build();
    let out = wrap(b"{\"message\":\"", b"\"}", 1008, &content);

    assert_eq!(out.len(), 12 + 1008 + 2);
    assert!(out.starts_with(b"{\"message\":\""));
    assert!(out.ends_with(b"\"}"));
    assert_eq!(&out[12..1020], content.as_slice());
}

#[test]
fn xml_document_around_1008_bytes() {
    let content = SourceBuilder::new().printable(1008).build();
    let out = wrap(b"<root><name>", b"</name></root>", 1008, &content);

    let mut expected = b"<root><name>".to_vec();
    expected.extend_from_slice(&content);
    expected.extend_from_slice(b"</name></root>");
    assert_eq!(out, expected, "{}", show(&out));
}

#[test]
fn content_is_quoted_printable_escaped() {
    let content = SourceBuilder::new().passwd_lines(10).build();
    let out = wrap(b"<r>", b"</r>", 99, &content);
    assert_eq!(
        out,
        expected_wrap(b"<r>", &content, b"</r>", 99, DEFAULT_PADDING_CHARACTER),
        "{}",
        show(&out)
    );
}

#[test]
fn short_prefix_is_padded() {
    let content = SourceBuilder::new().printable(64).build();
    let out = wrap(b"x", b"y", 27, &content);
    assert!(out.starts_with(b"xMM"));
    assert_eq!(&out[3..30], &content[..27]);
    assert!(out.ends_with(b"y"));
}

#[test]
fn zero_estimate_keeps_only_prefix_and_suffix() {
    let content = SourceBuilder::new().text("secret").build();
    assert_eq!(wrap(b"abc", b"de", 0, &content), b"abcde");
}

#[test]
fn empty_source_stays_empty() {
    let empty = SourceBuilder::new().build();
    assert_eq!(wrap(b"abc", b"de", 0, &empty), b"");
    assert_eq!(wrap(b"abc", b"de", 9, &empty), b"");
}

#[test]
fn three_aligned_estimate_is_exact() {
    let content = SourceBuilder::new().text("0123456789abcde").build();
    assert_eq!(wrap(b"<a>", b"", 15, &content), b"<a>0123456789abcde");

    let content = SourceBuilder::new().text("0123456789ab").build();
    assert_eq!(
        wrap(b"abcdef", b"</a>", 12, &content),
        b"abcdef0123456789ab</a>"
    );
}

#[test]
fn unaligned_estimate_leaves_at_most_two_bytes() {
    let content = SourceBuilder::new().text("0123456789").build();

    let out = wrap(b"xyz<a>", b"</a>", 10, &content);
    assert_eq!(out.len(), 6 + 12 + 4, "{}", show(&out));
    assert!(out.starts_with(b"xyz<a>0123456789"));
    assert!(out.ends_with(b"</a>"));

    // Three prefix bytes cannot fill a 12-byte dump up to 18, so it grows to 15.
    let target = TargetSpec::new(b"<a>".to_vec(), b"</a>".to_vec(), 10);
    let synthesis = synthesize(&target, &SynthesisOpts::default()).unwrap();
    assert_eq!(synthesis.plan.dumped_len, 15);
    let out = synthesis.chain.apply(&content).unwrap();
    assert_eq!(out.len(), 3 + 15 + 4, "{}", show(&out));
    assert!(out.starts_with(b"<a>0123456789"));
    assert!(out.ends_with(b"</a>"));
}

#[test]
fn long_prefix_and_suffix_fit_the_chunk() {
    for prefix_len in [0, 5, 42, 132] {
        for suffix_len in [3, 58, 200, 300] {
            for estimate in [0, 9, 18, 27] {
                let prefix = vec![b'P'; prefix_len];
                let suffix = vec![b'S'; suffix_len];
                let content = SourceBuilder::new().printable(64).build();

                let out = wrap(&prefix, &suffix, estimate, &content);

                let mut expected = align_right(&prefix, 3, DEFAULT_PADDING_CHARACTER);
                let dumped = out.len() - expected.len() - suffix_len;
                assert!(dumped >= estimate && dumped < estimate + 9);
                expected.extend_from_slice(&content[..dumped]);
                expected.extend_from_slice(&suffix);
                assert_eq!(
                    out, expected,
                    "prefix {prefix_len}, suffix {suffix_len}, estimate {estimate}"
                );
            }
        }
    }
}

#[test]
fn suffix_without_prefix() {
    let content = SourceBuilder::new().printable(18).build();
    let mut expected = content.clone();
    expected.extend_from_slice(b"\x00\xff");
    assert_eq!(wrap(b"", b"\x00\xff", 18, &content), expected);
}

#[test]
fn empty_target_gives_identity_chain() {
    let target = TargetSpec::new(Vec::new(), Vec::new(), 1008);
    let synthesis = synthesize(&target, &SynthesisOpts::default()).unwrap();
    assert!(synthesis.chain.is_empty());
    assert_eq!(synthesis.cost.steps, 0);
}

#[test]
fn cost_model_does_not_drift() {
    let target = TargetSpec::new(b"<a>".to_vec(), b"</a>".to_vec(), 45);
    let synthesis = synthesize(&target, &SynthesisOpts::default()).unwrap();
    assert_eq!(length_trace(&synthesis.chain, 45), synthesis.length_trace);

    // Exact primitives produce exactly what the cost model predicts.
    let mut buffer = SourceBuilder::new().printable(45).build();
    for primitive in &synthesis.chain {
        let out = primitive.apply(&buffer).unwrap();
        if primitive.is_exact() {
            assert_eq!(out.len(), primitive.length_after(buffer.len()), "{primitive}");
        } else {
            assert!(out.len() <= primitive.length_after(buffer.len()), "{primitive}");
        }
        buffer = out;
    }
}

#[test]
fn chain_size_grows_with_estimate() {
    let small = synthesize(
        &TargetSpec::new(b"<".to_vec(), b">".to_vec(), 9),
        &SynthesisOpts::default(),
    )
    .unwrap();
    let large = synthesize(
        &TargetSpec::new(b"<".to_vec(), b">".to_vec(), 90),
        &SynthesisOpts::default(),
    )
    .unwrap();
    // 81 more dumped bytes are 9 more groups of 9, at 16 rotations each.
    assert_eq!(large.plan.rotations - small.plan.rotations, 9 * 16);
    assert!(large.cost.filters_len > small.cost.filters_len);
}

#[test]
fn unsupported_byte_is_rejected_before_emitting() {
    let mut chain = Chain::from(vec![Primitive::Base64Encode]);
    assert!(matches!(
        push_char(&mut chain, b'\n'),
        Err(WrapError::UnsupportedByte(b'\n'))
    ));
    assert_eq!(chain.len(), 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn any_prefix_and_suffix_are_wrapped(
        prefix_groups in prop::collection::vec(any::<[u8; 3]>(), 0..4),
        suffix in prop::collection::vec(any::<u8>(), 0..8),
        nines in 0usize..4,
    ) {
        let prefix = prefix_groups.concat();
        prop_assume!(!prefix.is_empty() || !suffix.is_empty());
        let len = nines * 9;
        let content = SourceBuilder::new().printable(len.max(1)).build();

        let out = wrap(&prefix, &suffix, len, &content);

        let mut expected = prefix.clone();
        expected.extend_from_slice(&content[..len]);
        expected.extend_from_slice(&suffix);
        prop_assert_eq!(out, expected);
    }
}
