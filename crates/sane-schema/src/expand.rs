//! `$VAR` / `${VAR}` expansion for paths declared in a sanefile.

/// Expand `$VAR` and `${VAR}` using `lookup`. Unset variables expand to the
/// empty string; a `$` that does not start a variable reference is kept as-is.
pub fn expand_with<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(braced) = after.strip_prefix('{') {
            if let Some(end) = braced.find('}') {
                out.push_str(&lookup(&braced[..end]).unwrap_or_default());
                rest = &braced[end + 1..];
                continue;
            }
        } else {
            let len = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            if len > 0 {
                out.push_str(&lookup(&after[..len]).unwrap_or_default());
                rest = &after[len..];
                continue;
            }
        }

        out.push('$');
        rest = after;
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "HOME" => Some("/home/sane".to_owned()),
            "DATA_DIR" => Some("/srv/data".to_owned()),
            _ => None,
        }
    }

    #[test]
    fn expands_bare_and_braced() {
        assert_eq!(expand_with("$HOME/.redis", lookup), "/home/sane/.redis");
        assert_eq!(expand_with("${DATA_DIR}/pg", lookup), "/srv/data/pg");
        assert_eq!(expand_with("$HOME:${DATA_DIR}", lookup), "/home/sane:/srv/data");
    }

    #[test]
    fn unset_expands_to_empty() {
        assert_eq!(expand_with("$NOPE/x", lookup), "/x");
        assert_eq!(expand_with("${NOPE}x", lookup), "x");
    }

    #[test]
    fn literal_dollars_survive() {
        assert_eq!(expand_with("cost: $", lookup), "cost: $");
        assert_eq!(expand_with("a$-b", lookup), "a$-b");
        assert_eq!(expand_with("${unterminated", lookup), "${unterminated");
    }

    #[test]
    fn no_variables_is_passthrough() {
        assert_eq!(expand_with("/etc/redis.conf", lookup), "/etc/redis.conf");
    }
}
