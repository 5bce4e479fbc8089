use embedded_json_rs::{encode, EncoderOptions, Object, Value};
use serde_json::json;

fn main() {
    println!("=== Encoding Value Trees ===\n");

    // Example 1: Native nesting stays inline
    println!("1. Native nested object:");
    let value = Value::from_plain(json!({"user": {"id": 1, "name": "Alice"}}), false).unwrap();
    println!("{}\n", encode(&value, &EncoderOptions::default()).unwrap());

    // Example 2: Embedded subtree becomes a quoted string
    println!("2. Embedded subtree:");
    let settings = Value::from_plain(json!({"theme": "dark", "size": 12}), true).unwrap();
    let value = Value::Object(
        [("user", Value::from("alice")), ("settings", settings)]
            .into_iter()
            .collect::<Object>(),
    );
    println!("{}\n", encode(&value, &EncoderOptions::default()).unwrap());

    // Example 3: Building a tree with accessors
    println!("3. Built with accessors:");
    let mut value = Value::Object(Object::default());
    value.set("name", "report").unwrap();
    let mut rows = Value::from_plain(json!([]), true).unwrap();
    rows.push(1).unwrap();
    rows.push(2).unwrap();
    value.set("rows", rows).unwrap();
    println!("{}\n", encode(&value, &EncoderOptions::default()).unwrap());

    // Example 4: Plain conversion drops provenance
    println!("4. Plain conversion:");
    println!("{}\n", encode(&value.to_plain(), &EncoderOptions::default()).unwrap());

    // Example 5: Pretty output
    println!("5. Pretty output:");
    let options = EncoderOptions {
        pretty: true,
        indent: 2,
        ..EncoderOptions::default()
    };
    println!("{}", encode(&value, &options).unwrap());
}
