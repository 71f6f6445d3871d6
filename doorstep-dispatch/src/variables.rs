//! Per-visitor template variable assembly.

use doorstep_common::Admin;
use doorstep_store::VisitorContext;
use doorstep_template::TemplateVars;

/// Format used for the `visit_date` variable, e.g. "August 6, 2026".
const VISIT_DATE_FORMAT: &str = "%B %-d, %Y";

/// Build the variable mapping for one visitor.
///
/// Every recognized variable is present in the result; values that do not
/// apply to this visitor are empty strings, so their placeholders render as
/// empty rather than leaking through.
#[must_use]
pub fn build_variables(context: &VisitorContext, admin: &Admin) -> TemplateVars {
    let visitor = &context.visitor;
    let property = context.property.as_ref();
    let feedback = context.feedback.as_ref();

    let mut vars = TemplateVars::default();
    let mut set = |name: &str, value: String| {
        vars.insert(name.to_string(), value);
    };

    set("visitor_name", visitor.name.clone());
    set("visitor_email", visitor.email.clone().unwrap_or_default());
    set("visitor_phone", visitor.phone.clone().unwrap_or_default());
    set(
        "property_name",
        property.map(|p| p.name.clone()).unwrap_or_default(),
    );
    set(
        "property_address",
        property.map(|p| p.address.clone()).unwrap_or_default(),
    );
    set("admin_name", admin.name.clone());
    set("admin_email", admin.email.clone());
    set("admin_phone", admin.phone.clone().unwrap_or_default());
    set(
        "visit_date",
        visitor.visited_at.format(VISIT_DATE_FORMAT).to_string(),
    );
    set(
        "feedback_rating",
        feedback.map(|f| f.rating.to_string()).unwrap_or_default(),
    );
    set(
        "feedback_comments",
        feedback
            .and_then(|f| f.comments.clone())
            .unwrap_or_default(),
    );
    set(
        "interested",
        feedback
            .map(|f| if f.interested { "yes" } else { "no" }.to_string())
            .unwrap_or_default(),
    );

    vars
}
