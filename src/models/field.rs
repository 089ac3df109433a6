// Report field values and insertion-ordered field maps

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Literal rendered for any value that could not be resolved.
pub const NOT_AVAILABLE: &str = "N/A";

/// One cell of a report: a number, a preformatted string, or nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Unavailable,
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, FieldValue::Unavailable)
    }
}

impl From<Option<f64>> for FieldValue {
    fn from(v: Option<f64>) -> Self {
        v.map_or(FieldValue::Unavailable, FieldValue::Number)
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<usize> for FieldValue {
    fn from(n: usize) -> Self {
        FieldValue::Number(n as f64)
    }
}

/// Whole numbers print without a fractional part ("12", not "12.0").
fn integral(n: f64) -> Option<i64> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Some(n as i64)
    } else {
        None
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => match integral(*n) {
                Some(i) => write!(f, "{i}"),
                None => write!(f, "{n}"),
            },
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Unavailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Number(n) => match integral(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Unavailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

/// Field name -> value, kept in insertion order. Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(Vec<(String, FieldValue)>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field, replacing the value in place if the name already exists.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.push(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_display_drops_fraction_for_whole_values() {
        assert_eq!(FieldValue::Number(12.0).to_string(), "12");
        assert_eq!(FieldValue::Number(12.5).to_string(), "12.5");
        assert_eq!(FieldValue::Unavailable.to_string(), "N/A");
    }

    #[test]
    fn fields_keep_insertion_order_and_replace_in_place() {
        let mut f = Fields::new().with("b", 1usize).with("a", "x");
        f.push("b", 2usize);
        let names: Vec<&str> = f.names().collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(f.get("b"), Some(&FieldValue::Number(2.0)));
    }

    #[test]
    fn fields_serialize_as_ordered_object() {
        let f = Fields::new()
            .with("owner", "alice")
            .with("opackets", FieldValue::Number(10.0))
            .with("Tx bps", FieldValue::Unavailable);
        let json = serde_json::to_string(&f).unwrap();
        assert_eq!(json, r#"{"owner":"alice","opackets":10,"Tx bps":"N/A"}"#);
    }
}
