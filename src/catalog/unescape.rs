/// Normalize the escape sequences a catalog string may contain.
///
/// Only `\"` and `\n` are recognized, in that order. Every other backslash
/// sequence is kept verbatim so the output matches what the catalog author
/// wrote.
pub fn unescape(raw: &str) -> String {
    raw.replace("\\\"", "\"").replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_quote() {
        assert_eq!(unescape(r#"Say \"hi\""#), r#"Say "hi""#);
    }

    #[test]
    fn test_unescape_newline() {
        assert_eq!(unescape(r"line one\nline two"), "line one\nline two");
    }

    #[test]
    fn test_unescape_leaves_other_sequences() {
        assert_eq!(unescape(r"tab\there"), r"tab\there");
        assert_eq!(unescape(r"back\\slash"), r"back\\slash");
    }

    #[test]
    fn test_unescape_plain_text_unchanged() {
        assert_eq!(unescape("كلمة المرور"), "كلمة المرور");
        assert_eq!(unescape(""), "");
    }
}
