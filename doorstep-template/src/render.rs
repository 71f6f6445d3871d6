//! Single-pass placeholder substitution.

use ahash::AHashMap;

/// Mapping from placeholder name to replacement text.
pub type TemplateVars = AHashMap<String, String>;

/// Substitute `{{variable}}` placeholders in `template` with values from
/// `vars`.
///
/// Placeholder names are trimmed of surrounding whitespace inside the
/// braces before lookup, so `{{ visitor_name }}` and `{{visitor_name}}` are
/// equivalent. Names missing from the mapping render as the empty string;
/// the renderer performs no validation.
///
/// Substitution is a single pass: replacement text is never re-scanned, so
/// a value containing `{{...}}` comes through literally. Text that is not a
/// balanced `{{...}}` pair is copied through unchanged.
#[must_use]
pub fn render(template: &str, vars: &TemplateVars) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let (before, from_open) = rest.split_at(start);
        out.push_str(before);
        let inner = &from_open[2..];

        match inner.find("}}") {
            Some(end) => {
                let name = inner[..end].trim();
                if let Some(value) = vars.get(name) {
                    out.push_str(value);
                }
                rest = &inner[end + 2..];
            }
            None => {
                // Unbalanced braces: the remainder is literal text
                out.push_str(from_open);
                return out;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> TemplateVars {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn substitutes_known_variables() {
        let rendered = render(
            "Hi {{visitor_name}}, thanks for visiting {{property_name}}!",
            &vars(&[("visitor_name", "Jane"), ("property_name", "Maple House")]),
        );
        assert_eq!(rendered, "Hi Jane, thanks for visiting Maple House!");
    }

    #[test]
    fn adjacent_placeholders() {
        let rendered = render(
            "{{visitor_name}}{{property_name}}",
            &vars(&[("visitor_name", "Jane"), ("property_name", "Maple House")]),
        );
        assert_eq!(rendered, "JaneMaple House");
    }

    #[test]
    fn missing_variables_render_empty() {
        assert_eq!(
            render("{{visitor_name}}{{property_name}}", &TemplateVars::default()),
            ""
        );
        assert_eq!(render("a {{unknown}} b", &TemplateVars::default()), "a  b");
    }

    #[test]
    fn whitespace_inside_braces_is_trimmed() {
        let rendered = render("Hi {{ visitor_name }}", &vars(&[("visitor_name", "Jane")]));
        assert_eq!(rendered, "Hi Jane");
    }

    #[test]
    fn empty_template_and_no_placeholders() {
        assert_eq!(render("", &TemplateVars::default()), "");
        assert_eq!(
            render("no placeholders here", &TemplateVars::default()),
            "no placeholders here"
        );
    }

    #[test]
    fn unbalanced_braces_stay_literal() {
        assert_eq!(
            render("Hi {{visitor_name", &vars(&[("visitor_name", "Jane")])),
            "Hi {{visitor_name"
        );
        assert_eq!(render("}} stray close", &TemplateVars::default()), "}} stray close");
    }

    #[test]
    fn substitution_is_not_recursive() {
        let rendered = render(
            "{{outer}}",
            &vars(&[("outer", "{{inner}}"), ("inner", "gotcha")]),
        );
        assert_eq!(rendered, "{{inner}}");
    }

    #[test]
    fn render_is_idempotent_for_placeholder_free_output() {
        let mapping = vars(&[("visitor_name", "Jane")]);
        let once = render("Hi {{visitor_name}}", &mapping);
        assert_eq!(render(&once, &mapping), once);
    }
}
