//! Save-time validation for campaigns.

use doorstep_common::Campaign;
use doorstep_template::{RECOGNIZED_VARIABLES, validate};

use crate::error::DispatchError;

/// Validate a campaign before it is saved or activated.
///
/// Checks that the channels declared by the campaign's message type have
/// non-empty content, and that every template (present on the campaign,
/// whether or not its channel is currently declared) references only
/// recognized variables. This is the pre-condition gate; it keeps
/// malformed campaigns out of the dispatch path entirely.
///
/// # Errors
///
/// [`DispatchError::InvalidConfiguration`] describing the first problem
/// found.
pub fn validate_campaign(campaign: &Campaign) -> Result<(), DispatchError> {
    campaign.validate_content(campaign.message_type)?;

    let templates = [
        ("email subject", campaign.email_subject.as_deref()),
        ("email body", campaign.email_body.as_deref()),
        ("sms body", campaign.sms_body.as_deref()),
    ];

    for (label, template) in templates {
        let Some(template) = template else { continue };
        let outcome = validate(template, &RECOGNIZED_VARIABLES);
        if !outcome.valid {
            return Err(DispatchError::InvalidConfiguration(format!(
                "{label} references unknown variables: {}",
                outcome.invalid_names.join(", ")
            )));
        }
    }

    Ok(())
}
