//! Typed result records.
//!
//! Every line of a TestRunner result file and every synthesized object
//! in the combined archive is one of these records. The wire shape is
//! the loader's fixture format: `{"model": "rsinterface.<kind>",
//! "pk": <int>, "fields": {...}}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The record kinds the result pipeline knows.
///
/// Wire labels keep the legacy `rsinterface.` prefix the website
/// loader expects. Dispatch on kind is exhaustive; there is no
/// substring matching anywhere downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    #[serde(rename = "rsinterface.test")]
    Test,
    #[serde(rename = "rsinterface.log")]
    Log,
    #[serde(rename = "rsinterface.message")]
    Message,
    #[serde(rename = "rsinterface.cpu")]
    Cpu,
    #[serde(rename = "rsinterface.dut")]
    Dut,
    #[serde(rename = "rsinterface.chassis")]
    Chassis,
    #[serde(rename = "rsinterface.os")]
    Os,
    #[serde(rename = "rsinterface.date")]
    Date,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Test => "rsinterface.test",
            RecordKind::Log => "rsinterface.log",
            RecordKind::Message => "rsinterface.message",
            RecordKind::Cpu => "rsinterface.cpu",
            RecordKind::Dut => "rsinterface.dut",
            RecordKind::Chassis => "rsinterface.chassis",
            RecordKind::Os => "rsinterface.os",
            RecordKind::Date => "rsinterface.date",
        }
    }

    /// Look up a kind from its wire label.
    pub fn from_label(label: &str) -> Option<RecordKind> {
        match label {
            "rsinterface.test" => Some(RecordKind::Test),
            "rsinterface.log" => Some(RecordKind::Log),
            "rsinterface.message" => Some(RecordKind::Message),
            "rsinterface.cpu" => Some(RecordKind::Cpu),
            "rsinterface.dut" => Some(RecordKind::Dut),
            "rsinterface.chassis" => Some(RecordKind::Chassis),
            "rsinterface.os" => Some(RecordKind::Os),
            "rsinterface.date" => Some(RecordKind::Date),
            _ => None,
        }
    }
}

/// One archival record: a kind, a primary key, and its fields.
///
/// Keys are only meaningful within one archive; relations between
/// records (`log.test`, `message.log`, `test.os`, `os.chassis`) are
/// plain integer fields pointing at another record's key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "model")]
    pub kind: RecordKind,
    #[serde(rename = "pk")]
    pub key: i64,
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(kind: RecordKind, key: i64) -> Self {
        Self {
            kind,
            key,
            fields: Map::new(),
        }
    }

    /// Integer field access, tolerating string-encoded integers.
    pub fn int_field(&self, name: &str) -> Option<i64> {
        self.fields.get(name).and_then(value_to_int)
    }

    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) {
        self.fields.insert(name.to_string(), value.into());
    }
}

/// Convert a field value to an integer if possible.
///
/// Result files occasionally carry keys as quoted numbers; both forms
/// are accepted.
pub fn value_to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
