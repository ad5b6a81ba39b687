use serde_json::{Value, json};

use crate::types::Record;

const MAKES: &[&str] = &[
    "ford", "hyundai", "toyota", "honda", "mazda", "subaru", "volvo", "kia",
];

const MODELS: &[&str] = &[
    "fusion", "escort", "sonata", "corolla", "civic", "miata", "outback", "xc90",
];

fn into_record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}

/// The three cars used as the fixed benchmark input.
pub fn cars() -> Vec<Record> {
    vec![
        into_record(json!({"make": "ford", "model": "fusion", "year": 2012})),
        into_record(json!({"make": "ford", "model": "escort", "year": 1999})),
        into_record(json!({"make": "hyundai", "model": "sonata", "year": 2003})),
    ]
}

/// `count` car-shaped records whose `make` cycles through `cardinality`
/// distinct values. Deterministic, so bench runs are comparable.
pub fn synthetic(count: usize, cardinality: usize) -> Vec<Record> {
    let cardinality = cardinality.max(1);
    (0..count)
        .map(|i| {
            let group = i % cardinality;
            let make = match MAKES.get(group) {
                Some(name) => name.to_string(),
                None => format!("make-{}", group),
            };
            into_record(json!({
                "make": make,
                "model": MODELS[i % MODELS.len()],
                "year": 1990 + (i * 7) % 35,
            }))
        })
        .collect()
}
