const REDACTED: &str = "[REDACTED]";

/// Replaces every non-empty secret in `text` with `[REDACTED]`.
pub fn redact<S: AsRef<str>>(text: &str, secrets: &[S]) -> String {
    let mut redacted = text.to_string();
    for secret in secrets {
        let secret = secret.as_ref();
        if !secret.is_empty() {
            redacted = redacted.replace(secret, REDACTED);
        }
    }
    redacted
}

/// Keeps at most `limit` characters, respecting char boundaries.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_every_occurrence() {
        let out = redact("token=abc123 again abc123", &["abc123"]);
        assert_eq!(out, "token=[REDACTED] again [REDACTED]");
    }

    #[test]
    fn ignores_empty_secrets() {
        let out = redact("nothing to hide", &["", "zzz"]);
        assert_eq!(out, "nothing to hide");
    }

    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }
}
