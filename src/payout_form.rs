//! Interactive form collecting the payout terms of one offer.

use tracing::{debug, warn};

use crate::error::{EditorError, Result};
use crate::models::{Amount, CountryOverrides, PayoutTerms, PayoutType};
use crate::prompt::{Prompt, ask_optional};

/// Answer that opts into editing country overrides (case-insensitive).
const CONFIRM_ANSWER: &str = "yes";

/// Runs the payout form against `existing` terms and returns the new ones.
///
/// Empty answers keep the existing type and amounts. Only the fields the
/// resulting type uses are present in the returned terms; unrecognized
/// types get no amounts at all. Answering "yes" to the override question
/// starts a fresh override map, otherwise the existing one is kept.
///
/// Amount answers that are not finite numbers are rejected and the same
/// question is asked again.
///
/// # Errors
///
/// Propagates prompt failures, e.g. [`EditorError::InputClosed`].
#[inline]
pub fn collect_payout<P: Prompt + ?Sized>(
    prompt: &mut P,
    existing: &PayoutTerms,
) -> Result<PayoutTerms> {
    let current_type = existing
        .kind
        .as_ref()
        .map_or("none", PayoutType::as_str);
    let kind = match ask_optional(
        prompt,
        &format!("Enter payout type (CPA/FIXED/CPA_AND_FIXED) [{current_type}]: "),
    )? {
        Some(answer) => Some(PayoutType::from(answer)),
        None => existing.kind.clone(),
    };
    if let Some(PayoutType::Other(ref text)) = kind {
        warn!(payout_type = %text, "unrecognized payout type, no amounts collected");
    }

    let mut terms = PayoutTerms {
        kind,
        ..PayoutTerms::default()
    };
    let (includes_cpa, includes_fixed) = terms
        .kind
        .as_ref()
        .map_or((false, false), |kind| (kind.includes_cpa(), kind.includes_fixed()));

    if includes_cpa {
        let default = amount_default(existing.cpa_amount);
        terms.cpa_amount = Some(ask_amount(
            prompt,
            &format!("Enter base CPA amount [{default}]: "),
            Some(default),
        )?);

        let answer =
            prompt.ask("Do you want to edit country-specific CPA overrides? (yes/no): ")?;
        terms.cpa_country_overrides = if answer.to_lowercase() == CONFIRM_ANSWER {
            Some(collect_overrides(prompt)?)
        } else {
            existing.cpa_country_overrides.clone()
        };
    }

    if includes_fixed {
        let default = amount_default(existing.fixed_amount);
        terms.fixed_amount = Some(ask_amount(
            prompt,
            &format!("Enter fixed amount [{default}]: "),
            Some(default),
        )?);
    }

    Ok(terms)
}

/// Collects country overrides until the operator enters an empty code.
fn collect_overrides<P: Prompt + ?Sized>(prompt: &mut P) -> Result<CountryOverrides> {
    let mut overrides = CountryOverrides::new();
    while let Some(country) =
        ask_optional(prompt, "Enter country code (or press Enter to finish): ")?
    {
        let amount = ask_amount(prompt, &format!("Enter CPA for {country}: "), None)?;
        let _previous = overrides.insert(country.to_uppercase(), amount);
    }
    Ok(overrides)
}

/// Returns the existing amount if it is usable, zero otherwise.
fn amount_default(existing: Option<Amount>) -> Amount {
    existing.and_then(Amount::finite).unwrap_or(Amount::ZERO)
}

/// Asks for an amount until the answer parses.
///
/// An empty answer yields `default` when one is given. A blank answer of
/// only whitespace counts as zero.
fn ask_amount<P: Prompt + ?Sized>(
    prompt: &mut P,
    question: &str,
    default: Option<Amount>,
) -> Result<Amount> {
    loop {
        let answer = prompt.ask(question)?;
        if answer.is_empty()
            && let Some(value) = default
        {
            return Ok(value);
        }
        if !answer.is_empty() && answer.trim().is_empty() {
            debug!("blank amount read as zero");
            return Ok(Amount::ZERO);
        }
        match Amount::parse(&answer) {
            Ok(value) => return Ok(value),
            Err(EditorError::InvalidAmount { input }) => {
                debug!(input = %input, "rejected amount");
                prompt.tell(&format!("'{input}' is not a valid amount, try again"))?;
            }
            Err(err) => return Err(err),
        }
    }
}
