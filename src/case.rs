//! Key case conversion: declared snake_case column names are exposed as camelCase keys.

/// Convert a single identifier from snake_case to camelCase.
/// e.g. "due_date" -> "dueDate", "created_at" -> "createdAt", "line_1" -> "line1"
pub fn to_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut capitalize_next = false;
    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            out.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case() {
        assert_eq!(to_camel_case("created_at"), "createdAt");
        assert_eq!(to_camel_case("title"), "title");
        assert_eq!(to_camel_case("line_1"), "line1");
    }
}
