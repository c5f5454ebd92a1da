use serde_json::Value;

/// Values the upstream treats as absent: `""`, `0`, `null` and `false`.
pub fn is_empty_or_zero_or_null(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Turns `camelCase` and `snake_case` keys into readable labels,
/// e.g. `viewCount` -> `View Count`, `like_count` -> `Like count`.
pub fn format_key_label(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);

    for (i, c) in key.chars().enumerate() {
        if c == '_' {
            spaced.push(' ');
        } else {
            if i > 0 && c.is_uppercase() {
                spaced.push(' ');
            }
            spaced.push(c);
        }
    }

    capitalize(&spaced)
}

pub fn format_size_mb(bytes: f64) -> String {
    format!("{:.2} MB", bytes / 1024.0 / 1024.0)
}
