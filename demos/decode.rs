use embedded_json_rs::{decode, DecoderOptions, InvalidEmbedded, Value};

fn describe(value: &Value, indent: usize) {
    for (key, child) in value {
        let origin = if child.is_embedded_origin() {
            " (embedded)"
        } else {
            ""
        };
        if child.is_composite() {
            println!("{}{}{}:", " ".repeat(indent), key, origin);
            describe(child, indent + 2);
        } else {
            println!("{}{} = {}", " ".repeat(indent), key, child);
        }
    }
}

fn main() {
    println!("=== Embedded JSON Decode Examples ===\n");

    // Example 1: Plain document
    println!("1. Plain document:");
    let text = r#"{"a":1,"b":[2,3],"c":{"d":4}}"#;
    println!("Input: {}", text);
    describe(&decode(text, &DecoderOptions::default()).unwrap(), 2);
    println!();

    // Example 2: Strings holding JSON
    println!("2. Strings holding JSON:");
    let text = r#"{"a":1,"b":"[2,3]","c":"{\"d\":4}"}"#;
    println!("Input: {}", text);
    describe(&decode(text, &DecoderOptions::default()).unwrap(), 2);
    println!();

    // Example 3: Malformed embedded text is kept
    println!("3. Malformed embedded text:");
    let text = r#"{"x":"[1,2"}"#;
    println!("Input: {}", text);
    describe(&decode(text, &DecoderOptions::default()).unwrap(), 2);
    println!();

    // Example 4: Legacy null substitution
    println!("4. Null substitution:");
    let options = DecoderOptions {
        invalid_embedded: InvalidEmbedded::Null,
        ..DecoderOptions::default()
    };
    describe(&decode(text, &options).unwrap(), 2);
    println!();

    // Example 5: Depth limit
    println!("5. Depth limit:");
    let options = DecoderOptions {
        max_depth: 2,
        ..DecoderOptions::default()
    };
    match decode(r#"{"a":"[1]"}"#, &options) {
        Ok(value) => println!("  decoded: {}", value),
        Err(e) => println!("  error: {}", e),
    }
}
