use embedded_json_rs::{decode, encode, DecoderOptions, EncoderOptions};

fn round_trip(title: &str, text: &str) {
    println!("{}", title);
    println!("{}", "=".repeat(title.len()));

    println!("Original:\n{}\n", text);

    let value = decode(text, &DecoderOptions::default()).unwrap();
    println!("Decoded (plain view):\n{}\n", value);

    let encoded = encode(&value, &EncoderOptions::default()).unwrap();
    println!("Re-encoded:\n{}\n", encoded);

    assert_eq!(text, encoded, "Round-trip failed!");
    println!("Round-trip successful!\n");
}

fn main() {
    println!("=== Embedded JSON Round-Trip Examples ===\n");

    round_trip("Example 1: No embedded strings", r#"{"name":"Alice","age":30}"#);

    round_trip(
        "Example 2: Event log with JSON payloads",
        r#"[{"event":"login","data":"{\"ip\":\"10.0.0.1\"}"},{"event":"logout","data":"{}"}]"#,
    );

    round_trip(
        "Example 3: Doubly embedded",
        r#"{"outer":"{\"inner\":\"[1,2,3]\"}"}"#,
    );

    round_trip(
        "Example 4: Strings that only look like JSON",
        r#"{"broken":"[1,2","text":"{not json}"}"#,
    );
}
