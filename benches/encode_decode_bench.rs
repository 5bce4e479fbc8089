use criterion::{black_box, criterion_group, criterion_main, Criterion};
use embedded_json_rs::{decode, encode, DecoderOptions, EncoderOptions};
use serde_json::json;

fn get_complex_json() -> String {
    let profile = json!({
        "fullName": "Alice Anderson",
        "joinDate": "2023-01-15T10:00:00Z",
        "preferences": json!({"theme": "dark", "pageSize": 20}).to_string()
    });
    let users: Vec<_> = (0..50)
        .map(|id| {
            json!({
                "id": id,
                "username": format!("user{}", id),
                "roles": json!(["admin", "editor"]).to_string(),
                "profile": profile.to_string(),
                "active": id % 2 == 0
            })
        })
        .collect();

    json!({
        "name": "Complex JSON for Benchmarking",
        "version": "1.0.0",
        "keywords": ["json", "embedded", "benchmark", "performance", "rust"],
        "users": users,
        "settings": json!({
            "notifications": {"email": true, "push": false},
            "matrix": [[1, 2, 3], [4, 5, 6]]
        }).to_string(),
        "broken": "[not json",
        "empty_object": {},
        "empty_array": []
    })
    .to_string()
}

fn benchmark_decode(c: &mut Criterion) {
    let text = get_complex_json();
    let options = DecoderOptions::default();

    c.bench_function("decode_embedded_json", |b| {
        b.iter(|| decode(black_box(&text), black_box(&options)).unwrap())
    });
}

fn benchmark_encode(c: &mut Criterion) {
    let value = decode(&get_complex_json(), &DecoderOptions::default()).unwrap();
    let options = EncoderOptions::default();

    c.bench_function("encode_embedded_json", |b| {
        b.iter(|| encode(black_box(&value), black_box(&options)).unwrap())
    });
}

criterion_group!(benches, benchmark_encode, benchmark_decode);
criterion_main!(benches);
