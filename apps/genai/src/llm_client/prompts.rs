// Cross-cutting prompt fragments shared by every gateway call.
// Each feature module that talks to the model defines its own prompts.rs alongside it.

/// Appended to the system prompt of every tool chat so the model answers
/// through the function call only.
pub const FUNCTION_CALL_ONLY: &str = "You MUST respond by calling the provided function. \
    Do NOT answer in plain text. \
    Do NOT call any other function. \
    Fill in every required argument.";

/// Fills `{name}` placeholders from `vars` in a single left-to-right pass.
///
/// Substituted values are copied verbatim and never rescanned, so a value
/// that itself contains `{name}` stays literal. Braces that do not form a
/// known placeholder are kept as written.
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_every_occurrence() {
        let out = render_template("{a} and {b}, again {a}", &[("a", "x"), ("b", "y")]);
        assert_eq!(out, "x and y, again x");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let out = render_template(
            "Title: {title}\nSecret: {secret}",
            &[("title", "uses {secret} here"), ("secret", "S")],
        );
        assert_eq!(out, "Title: uses {secret} here\nSecret: S");
    }

    #[test]
    fn test_unknown_and_unbalanced_braces_kept() {
        let out = render_template("{json: 1} {x} {unclosed", &[("x", "1")]);
        assert_eq!(out, "{json: 1} 1 {unclosed");
    }

    #[test]
    fn test_multibyte_text_around_placeholders() {
        let out = render_template("Grüße {name} – ok", &[("name", "München")]);
        assert_eq!(out, "Grüße München – ok");
    }
}
