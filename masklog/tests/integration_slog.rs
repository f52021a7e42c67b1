//! Integration tests for the slog adapter.
//!
//! These tests verify that:
//! - derived types serialize as their redacted rendering
//! - `redacted()` / `redacted_as()` wrap arbitrary values
//! - raw values never reach the serializer

#![cfg(feature = "slog")]

use std::{collections::HashMap, fmt::Arguments};

use masklog::{
    slog::{IntoRedactedText, RedactedText},
    Sensitive, Tag, Value,
};

/// Captures every emitted pair as text.
#[derive(Default)]
struct CapturingSerializer {
    captured: HashMap<String, String>,
}

impl slog::Serializer for CapturingSerializer {
    fn emit_arguments(&mut self, key: slog::Key, val: &Arguments<'_>) -> slog::Result {
        self.captured.insert(key.to_string(), val.to_string());
        Ok(())
    }

    fn emit_str(&mut self, key: slog::Key, val: &str) -> slog::Result {
        self.captured.insert(key.to_string(), val.to_string());
        Ok(())
    }
}

fn serialize_to_capture<V: slog::Value>(value: &V, key: &'static str) -> String {
    static RS: slog::RecordStatic<'static> = slog::record_static!(slog::Level::Info, "");
    let args = format_args!("");
    let record = slog::Record::new(&RS, &args, slog::b!());
    let mut serializer = CapturingSerializer::default();
    value.serialize(&record, key, &mut serializer).unwrap();
    serializer.captured.remove(key).unwrap_or_default()
}

#[derive(Sensitive)]
struct Customer {
    #[sensitive(RealName)]
    name: String,
    #[sensitive(PhoneNumber)]
    mobile: String,
    tier: u8,
}

fn customer() -> Customer {
    Customer {
        name: "张三丰".to_string(),
        mobile: "13243562635".to_string(),
        tier: 2,
    }
}

#[test]
fn test_derived_types_emit_their_redacted_rendering() {
    assert_eq!(
        serialize_to_capture(&customer(), "customer"),
        "Customer { name: 张*丰, mobile: 132****2635, tier: 2 }"
    );
}

#[test]
fn test_references_use_the_blanket_impl() {
    let customer = customer();
    let rendered = serialize_to_capture(&&customer, "customer");
    assert!(!rendered.contains("13243562635"), "{rendered}");
}

#[test]
fn test_redacted_as_applies_a_tag() {
    let mobile = "13243562635".to_string();
    assert_eq!(
        serialize_to_capture(&mobile.redacted_as(Tag::PhoneNumber), "mobile"),
        "132****2635"
    );
    assert_eq!(serialize_to_capture(&mobile.redacted(), "mobile"), "13243562635");
}

#[test]
fn test_values_and_collections() {
    let body = vec![Value::Int(1), Value::from("abcd@xyz.com")];
    let text = RedactedText::new(&body, Some(Tag::Email));
    assert_eq!(text.as_str(), "[1, abc***@xyz.com]");
    assert_eq!(serialize_to_capture(&text, "body"), "[1, abc***@xyz.com]");
}

#[test]
fn test_logger_drain_sees_only_masked_text() {
    use std::sync::{Arc, Mutex};

    use slog::{o, Drain};

    struct CollectingDrain {
        lines: Arc<Mutex<Vec<String>>>,
    }

    impl Drain for CollectingDrain {
        type Ok = ();
        type Err = slog::Never;

        fn log(
            &self,
            record: &slog::Record<'_>,
            values: &slog::OwnedKVList,
        ) -> Result<Self::Ok, Self::Err> {
            let mut serializer = CapturingSerializer::default();
            slog::KV::serialize(&record.kv(), record, &mut serializer).unwrap();
            slog::KV::serialize(values, record, &mut serializer).unwrap();
            let mut pairs: Vec<String> = serializer
                .captured
                .into_iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect();
            pairs.sort();
            self.lines
                .lock()
                .unwrap()
                .push(format!("{} {}", record.msg(), pairs.join(" ")));
            Ok(())
        }
    }

    let lines = Arc::new(Mutex::new(Vec::new()));
    let drain = CollectingDrain {
        lines: Arc::clone(&lines),
    };
    let logger = slog::Logger::root(drain.fuse(), o!("service" => "billing"));
    slog::info!(logger, "checkout"; "customer" => customer());

    let lines = lines.lock().unwrap();
    assert_eq!(
        lines.as_slice(),
        ["checkout customer=Customer { name: 张*丰, mobile: 132****2635, tier: 2 } service=billing"]
    );
}
