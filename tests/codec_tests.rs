use flashlog::format_registry::descriptor_for;
use flashlog::{encode, ArgKind, ArgValue, EncodeError, Level, RECORD_CAPACITY};

#[test]
fn test_reference_scenario() {
    // encode(Info, "value={} name={}", (42, "alpha")) renders exactly
    // "value=42 name=alpha".
    let descriptor = descriptor_for("value={} name={}", &[ArgKind::Int, ArgKind::Text]);
    let record =
        encode(descriptor, Level::Info, &[ArgValue::Int(42), ArgValue::Text("alpha")]).unwrap();

    assert_eq!(record.level().unwrap(), Level::Info);

    let mut out = String::new();
    record.render_message(&mut out).unwrap();
    assert_eq!(out, "value=42 name=alpha");
}

#[test]
fn test_every_kind_round_trips() {
    let descriptor = descriptor_for(
        "i={} u={} f={} b={} t={}",
        &[ArgKind::Int, ArgKind::Uint, ArgKind::Float, ArgKind::Bool, ArgKind::Text],
    );
    let record = encode(
        descriptor,
        Level::Debug,
        &[
            ArgValue::Int(-7),
            ArgValue::Uint(u64::MAX),
            ArgValue::Float(2.5),
            ArgValue::Bool(false),
            ArgValue::Text("tail"),
        ],
    )
    .unwrap();

    let mut out = String::new();
    record.render_message(&mut out).unwrap();
    assert_eq!(out, format!("i=-7 u={} f=2.5 b=false t=tail", u64::MAX));
}

#[test]
fn test_no_argument_record() {
    let descriptor = descriptor_for("consumer started", &[]);
    let record = encode(descriptor, Level::Fatal, &[]).unwrap();
    assert_eq!(record.payload_len(), 1); // level tag only

    let mut out = String::new();
    record.render_message(&mut out).unwrap();
    assert_eq!(out, "consumer started");
}

#[test]
fn test_oversized_arguments_are_rejected() {
    let descriptor = descriptor_for("body={}", &[ArgKind::Text]);
    let big = "x".repeat(RECORD_CAPACITY);
    let err = encode(descriptor, Level::Info, &[ArgValue::Text(&big)]).unwrap_err();
    assert!(matches!(err, EncodeError::PayloadOverflow { .. }));
}

#[test]
fn test_largest_fitting_text() {
    // Capacity minus the level tag and the NUL sentinel.
    let descriptor = descriptor_for("{}", &[ArgKind::Text]);
    let exact = "y".repeat(RECORD_CAPACITY - 2);
    let record = encode(descriptor, Level::Info, &[ArgValue::Text(&exact)]).unwrap();
    assert_eq!(record.payload_len(), RECORD_CAPACITY);

    let mut out = String::new();
    record.render_message(&mut out).unwrap();
    assert_eq!(out, exact);

    let too_big = "y".repeat(RECORD_CAPACITY - 1);
    assert!(encode(descriptor, Level::Info, &[ArgValue::Text(&too_big)]).is_err());
}

#[test]
fn test_render_is_repeatable() {
    // Rendering consumes a fresh cursor each time and mutates neither the
    // record nor the shared descriptor.
    let descriptor = descriptor_for("n={}", &[ArgKind::Uint]);
    let record = encode(descriptor, Level::Error, &[ArgValue::Uint(9)]).unwrap();

    let mut first = String::new();
    record.render_message(&mut first).unwrap();
    let mut second = String::new();
    record.render_message(&mut second).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, "n=9");
}

#[test]
fn test_records_are_independent() {
    let descriptor = descriptor_for("slot={}", &[ArgKind::Int]);
    let a = encode(descriptor, Level::Info, &[ArgValue::Int(1)]).unwrap();
    let b = encode(descriptor, Level::Info, &[ArgValue::Int(2)]).unwrap();

    let mut out_a = String::new();
    a.render_message(&mut out_a).unwrap();
    let mut out_b = String::new();
    b.render_message(&mut out_b).unwrap();
    assert_eq!(out_a, "slot=1");
    assert_eq!(out_b, "slot=2");
}

#[test]
fn test_unicode_text_survives() {
    let descriptor = descriptor_for("msg={}", &[ArgKind::Text]);
    let record = encode(descriptor, Level::Info, &[ArgValue::Text("héllo → 世界")]).unwrap();

    let mut out = String::new();
    record.render_message(&mut out).unwrap();
    assert_eq!(out, "msg=héllo → 世界");
}
