use embedded_json_rs::{decode, DecoderOptions, Error, InvalidEmbedded, Key, Value};
use serde_json::json;

fn default_opts() -> DecoderOptions {
    DecoderOptions {
        max_depth: 512,
        expand_embedded: true,
        invalid_embedded: InvalidEmbedded::KeepString,
    }
}

#[test]
fn decode_single_scalar_root() {
    let value = decode("42", &default_opts()).unwrap();
    assert_eq!(value.as_i64(), Some(42));

    let value = decode("true", &default_opts()).unwrap();
    assert_eq!(value.as_bool(), Some(true));

    let value = decode("\"{\\\"a\\\":1}\"", &default_opts()).unwrap();
    assert_eq!(value.as_str(), Some("{\"a\":1}"));
}

#[test]
fn decode_embedded_values_are_tagged() {
    let value = decode(r#"{"a":1,"b":"[2,3]","c":"{\"d\":4}"}"#, &default_opts()).unwrap();

    assert_eq!(value.get("a").and_then(Value::as_i64), Some(1));
    assert!(!value.get("a").unwrap().is_composite());

    let b = value.get("b").unwrap();
    assert!(b.is_embedded_origin());
    assert_eq!(b.to_plain(), json!([2, 3]));

    let c = value.get("c").unwrap();
    assert!(c.is_embedded_origin());
    assert_eq!(c.get("d").and_then(Value::as_i64), Some(4));
}

#[test]
fn decode_keeps_source_key_order() {
    let value = decode(r#"{"b":1,"a":2,"c":"{\"z\":1,\"y\":2}"}"#, &default_opts()).unwrap();
    let keys: Vec<Key> = value.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec![Key::from("b"), Key::from("a"), Key::from("c")]);
}

#[test]
fn decode_malformed_embedded_keeps_literal() {
    let value = decode(r#"{"x":"[1,2"}"#, &default_opts()).unwrap();
    assert_eq!(value.get("x").and_then(Value::as_str), Some("[1,2"));
}

#[test]
fn decode_top_level_parse_error_is_fatal() {
    let err = decode("{\"x\":", &default_opts()).unwrap_err();
    match err {
        Error::ParseError(_) => {}
        _ => panic!("expected ParseError"),
    }
}

#[test]
fn decode_depth_exceeded() {
    let opts = DecoderOptions {
        max_depth: 3,
        ..default_opts()
    };
    let err = decode(r#"{"a":{"b":"{\"c\":1}"}}"#, &opts).unwrap_err();
    match err {
        Error::DepthExceeded { max_depth } => assert_eq!(max_depth, 3),
        _ => panic!("expected DepthExceeded error"),
    }
}

#[test]
fn decode_calls_do_not_share_state() {
    let shallow = DecoderOptions {
        max_depth: 1,
        ..default_opts()
    };
    assert!(decode(r#"[[1]]"#, &shallow).is_err());
    assert!(decode(r#"[1]"#, &shallow).is_ok());
    assert!(decode(r#"[[1]]"#, &default_opts()).is_ok());
}

#[test]
fn decode_concurrently() {
    let text = r#"{"a":"[1,{\"b\":\"[2]\"}]"}"#;
    let expected = decode(text, &default_opts()).unwrap();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| decode(text, &default_opts()).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
