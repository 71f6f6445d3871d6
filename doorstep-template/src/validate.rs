//! Save-time template validation.

/// The variables available to campaign templates at dispatch time.
///
/// Anything else appearing in a template is rejected when the campaign is
/// saved.
pub const RECOGNIZED_VARIABLES: [&str; 12] = [
    "visitor_name",
    "visitor_email",
    "visitor_phone",
    "property_name",
    "property_address",
    "admin_name",
    "admin_email",
    "admin_phone",
    "visit_date",
    "feedback_rating",
    "feedback_comments",
    "interested",
];

/// Outcome of validating a template against an allowed variable set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    /// Placeholder names not present in the allowed set, in the order they
    /// appear in the template
    pub invalid_names: Vec<String>,
}

/// Distinct placeholder names found in `template`, in first-appearance
/// order.
///
/// Unbalanced placeholders are literal text to the renderer and are not
/// reported here.
#[must_use]
pub fn extract_variables(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let inner = &rest[start + 2..];
        let Some(end) = inner.find("}}") else { break };

        let name = inner[..end].trim();
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
        rest = &inner[end + 2..];
    }

    names
}

/// Check that every placeholder in `template` is one of `allowed`.
#[must_use]
pub fn validate(template: &str, allowed: &[&str]) -> Validation {
    let invalid_names: Vec<String> = extract_variables(template)
        .into_iter()
        .filter(|name| !allowed.contains(&name.as_str()))
        .collect();

    Validation {
        valid: invalid_names.is_empty(),
        invalid_names,
    }
}
