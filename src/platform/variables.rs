//! Argument placeholders in command bodies.
//!
//! Canonical bodies use `$ARGUMENTS` for the full argument string and `$1`
//! through `$9` for positional arguments. Each platform declares its own
//! spelling through a [`VariableSyntax`]; translation rewrites canonical
//! tokens and validation reports `$UPPER_CASE` tokens the platform would pass
//! through literally.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static CANONICAL_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(ARGUMENTS\b|[1-9]\b)").expect("placeholder regex is valid")
});

static UPPER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Z][A-Z0-9_]*)\b").expect("variable regex is valid"));

/// How a platform spells argument placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableSyntax {
    /// Replacement for `$ARGUMENTS`
    pub arguments: &'static str,
    /// Prefix for positional arguments; `$1` becomes `{positional}1`
    pub positional: &'static str,
    /// Upper-case variable names the platform expands itself
    pub known: &'static [&'static str],
}

impl VariableSyntax {
    /// `$ARGUMENTS` and `$1`..`$9`, as used by both Claude Code and OpenCode.
    pub const CANONICAL: Self = Self {
        arguments: "$ARGUMENTS",
        positional: "$",
        known: &["ARGUMENTS"],
    };

    fn is_canonical(&self) -> bool {
        self.arguments == Self::CANONICAL.arguments && self.positional == Self::CANONICAL.positional
    }
}

/// Rewrite canonical placeholders in `body` into `syntax`.
pub fn translate(body: &str, syntax: &VariableSyntax) -> String {
    if syntax.is_canonical() {
        return body.to_string();
    }
    CANONICAL_TOKEN
        .replace_all(body, |caps: &Captures<'_>| {
            let token = &caps[1];
            if token == "ARGUMENTS" {
                syntax.arguments.to_string()
            } else {
                format!("{}{token}", syntax.positional)
            }
        })
        .into_owned()
}

/// Upper-case `$VARIABLES` in `body` that `syntax` does not expand.
///
/// Each name is reported once, in order of first appearance.
pub fn unsupported(body: &str, syntax: &VariableSyntax) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for caps in UPPER_TOKEN.captures_iter(body) {
        let name = &caps[1];
        if syntax.known.contains(&name) || found.iter().any(|f| f == name) {
            continue;
        }
        found.push(name.to_string());
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    const BRACED: VariableSyntax = VariableSyntax {
        arguments: "{{args}}",
        positional: "%",
        known: &["ARGUMENTS"],
    };

    #[test]
    fn test_canonical_is_identity() {
        let body = "Review $ARGUMENTS, starting with $1.";
        assert_eq!(translate(body, &VariableSyntax::CANONICAL), body);
    }

    #[test]
    fn test_translate_custom_syntax() {
        let out = translate("Fix $ARGUMENTS in $1 and $2, not $10 or $ARGUMENTSX", &BRACED);
        assert_eq!(out, "Fix {{args}} in %1 and %2, not $10 or $ARGUMENTSX");
    }

    #[test]
    fn test_unsupported_variables() {
        let body = "Use $ARGUMENTS with $FILE and $FILE again, plus $SELECTION. $lower is fine, so is $1.";
        assert_eq!(
            unsupported(body, &VariableSyntax::CANONICAL),
            vec!["FILE".to_string(), "SELECTION".to_string()]
        );
        assert!(unsupported("plain text", &VariableSyntax::CANONICAL).is_empty());
    }
}
