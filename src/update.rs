//! The offer update session.
//!
//! Asks for an offer ID, loads both documents, collects the operator's
//! changes to the offer and its payout, and saves both documents again.

use tracing::{info, warn};

use crate::error::Result;
use crate::models::{Offer, OfferEdit, OfferId, Payout, PayoutTerms, parse_categories};
use crate::payout_form::collect_payout;
use crate::prompt::{Prompt, ask_optional};
use crate::storage::Storage;

/// Notice shown when the requested offer does not exist.
pub const NOT_FOUND_MESSAGE: &str = "Offer not found!";
/// Notice shown after both documents were saved.
pub const SUCCESS_MESSAGE: &str = "Offer updated successfully!";

/// Result of an update session that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// The offer and its payout were saved.
    Updated(UpdatedOffer),
    /// No offer has the requested ID; nothing was saved.
    NotFound(OfferId),
}

/// The records written by a successful session.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatedOffer {
    /// The offer as saved.
    pub offer: Offer,
    /// The payout as saved.
    pub payout: Payout,
    /// `true` if no payout existed and a new entry was appended.
    pub payout_appended: bool,
}

/// Runs one interactive update session.
///
/// When `offer_id` is `None` the operator is asked for it first. Both
/// documents are loaded together and, once every answer is in, saved
/// together. If no offer matches, the operator is told so and nothing is
/// written. If the offer has no payout yet, the new one is appended.
///
/// # Errors
///
/// Returns the first load, prompt or save failure. A failure before the
/// save step leaves both documents untouched.
#[inline]
#[tracing::instrument(skip_all)]
pub async fn update_offer<S, P>(
    storage: &S,
    prompt: &mut P,
    offer_id: Option<OfferId>,
) -> Result<UpdateOutcome>
where
    S: Storage,
    P: Prompt + ?Sized,
{
    let offer_id = match offer_id {
        Some(id) => id,
        None => OfferId::new(prompt.ask("Enter the Offer ID to update: ")?),
    };

    let (mut offers, mut payouts) =
        tokio::try_join!(storage.load_offers(), storage.load_payouts())?;

    let Some(offer) = offers.iter_mut().find(|offer| offer.id == offer_id) else {
        prompt.tell(NOT_FOUND_MESSAGE)?;
        info!(offer_id = %offer_id, "offer not found");
        return Ok(UpdateOutcome::NotFound(offer_id));
    };

    let payout_index = payouts
        .iter()
        .position(|payout| payout.offer_id == offer_id);
    let existing_terms = payout_index
        .and_then(|index| payouts.get(index))
        .map(|payout| payout.terms.clone())
        .unwrap_or_default();

    let edit = collect_offer_edit(prompt, offer)?;
    offer.apply(edit);
    let updated = offer.clone();

    let terms = collect_payout(prompt, &existing_terms)?;
    let (payout, payout_appended) = replace_payout(&mut payouts, offer_id, terms, payout_index);

    let ((), ()) = tokio::try_join!(storage.save_offers(&offers), storage.save_payouts(&payouts))?;

    prompt.tell(SUCCESS_MESSAGE)?;
    info!(offer_id = %updated.id, payout_appended, "offer updated");
    Ok(UpdateOutcome::Updated(UpdatedOffer {
        offer: updated,
        payout,
        payout_appended,
    }))
}

/// Asks for the title, description and categories of `offer`.
fn collect_offer_edit<P: Prompt + ?Sized>(prompt: &mut P, offer: &Offer) -> Result<OfferEdit> {
    let title = ask_optional(prompt, &format!("Enter new title [{}]: ", offer.title))?;
    let description = ask_optional(
        prompt,
        &format!("Enter new description [{}]: ", offer.description),
    )?;
    let categories = ask_optional(
        prompt,
        &format!(
            "Enter new categories comma separated [{}]: ",
            offer.categories.join(", ")
        ),
    )?;
    Ok(OfferEdit {
        title,
        description,
        categories: categories.as_deref().map(parse_categories),
    })
}

/// Stores the new payout at `index`, or appends it when there is none.
///
/// Returns the stored payout and whether it was appended.
fn replace_payout(
    payouts: &mut Vec<Payout>,
    offer_id: OfferId,
    terms: PayoutTerms,
    index: Option<usize>,
) -> (Payout, bool) {
    let payout = Payout::new(offer_id, terms);
    if let Some(slot) = index.and_then(|position| payouts.get_mut(position)) {
        slot.clone_from(&payout);
        (payout, false)
    } else {
        warn!(offer_id = %payout.offer_id, "offer had no payout, appending a new one");
        payouts.push(payout.clone());
        (payout, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;
    use crate::models::{Amount, CountryOverrides, PayoutType};
    use crate::prompt::ScriptedPrompt;
    use crate::storage::{FileStorage, InMemoryStorage};
    use std::path::Path;

    /// The offer from the documented scenarios.
    fn scenario_offer() -> Offer {
        Offer::new(
            OfferId::from("o1"),
            "Old".to_owned(),
            "D".to_owned(),
            vec!["a".to_owned(), "b".to_owned()],
        )
    }

    /// An unrelated offer that must never change.
    fn other_offer() -> Offer {
        Offer::new(
            OfferId::from("o2"),
            "Other".to_owned(),
            "Untouched".to_owned(),
            vec!["z".to_owned()],
        )
    }

    /// Builds a payout with the given type and amounts.
    fn payout(id: &str, kind: &str, cpa: Option<f64>, fixed: Option<f64>) -> Payout {
        Payout::new(
            OfferId::from(id),
            PayoutTerms {
                kind: Some(PayoutType::from(kind)),
                cpa_amount: cpa.map(Amount::new),
                cpa_country_overrides: None,
                fixed_amount: fixed.map(Amount::new),
            },
        )
    }

    /// Storage holding both offers and a FIXED payout for each.
    fn seeded_storage() -> InMemoryStorage {
        InMemoryStorage::with_records(
            vec![scenario_offer(), other_offer()],
            vec![
                payout("o1", "FIXED", None, Some(10.0)),
                payout("o2", "FIXED", None, Some(1.0)),
            ],
        )
    }

    /// Writes the scenario documents into `dir` and returns a storage.
    fn seeded_files(dir: &Path) -> FileStorage {
        let storage = FileStorage::new(dir.join("offers.json"), dir.join("offerPayouts.json"));
        std::fs::write(
            storage.offers_path(),
            serde_json::to_string_pretty(&[scenario_offer(), other_offer()]).unwrap(),
        )
        .unwrap();
        std::fs::write(
            storage.payouts_path(),
            serde_json::to_string_pretty(&[
                payout("o1", "FIXED", None, Some(10.0)),
                payout("o2", "FIXED", None, Some(1.0)),
            ])
            .unwrap(),
        )
        .unwrap();
        storage
    }

    /// Unwraps an `Updated` outcome.
    fn expect_updated(outcome: UpdateOutcome) -> UpdatedOffer {
        match outcome {
            UpdateOutcome::Updated(updated) => updated,
            UpdateOutcome::NotFound(id) => panic!("offer {id} unexpectedly not found"),
        }
    }

    #[tokio::test]
    async fn scenario_a_categories_only() {
        let storage = seeded_storage();
        let mut prompt = ScriptedPrompt::new(["o1", "", "", "x, y, z", "", ""]);
        let updated = expect_updated(update_offer(&storage, &mut prompt, None).await.unwrap());

        assert_eq!(updated.offer.title, "Old");
        assert_eq!(updated.offer.description, "D");
        assert_eq!(updated.offer.categories, vec!["x", "y", "z"]);

        let offers = storage.offers().unwrap();
        assert_eq!(offers[0], updated.offer);
        assert_eq!(offers[1], other_offer());
    }

    #[tokio::test]
    async fn scenario_b_fixed_to_cpa() {
        let storage = seeded_storage();
        let mut prompt = ScriptedPrompt::new(["o1", "", "", "", "CPA", "5", "no"]);
        let updated = expect_updated(update_offer(&storage, &mut prompt, None).await.unwrap());

        let expected = payout("o1", "CPA", Some(5.0), None);
        assert_eq!(updated.payout, expected);
        assert!(!updated.payout_appended);

        let payouts = storage.payouts().unwrap();
        assert_eq!(payouts.len(), 2);
        assert_eq!(payouts[0], expected);
        assert_eq!(payouts[1], payout("o2", "FIXED", None, Some(1.0)));
        assert_eq!(
            serde_json::to_value(&payouts[0]).unwrap(),
            serde_json::json!({"offerId": "o1", "type": "CPA", "cpaAmount": 5})
        );
    }

    #[tokio::test]
    async fn scenario_c_cpa_and_fixed_with_override() {
        let storage = seeded_storage();
        let mut prompt = ScriptedPrompt::new([
            "o1",
            "",
            "",
            "",
            "CPA_AND_FIXED",
            "2",
            "yes",
            "us",
            "3",
            "",
            "7",
        ]);
        let updated = expect_updated(update_offer(&storage, &mut prompt, None).await.unwrap());

        assert_eq!(
            serde_json::to_value(&updated.payout).unwrap(),
            serde_json::json!({
                "offerId": "o1",
                "type": "CPA_AND_FIXED",
                "cpaAmount": 2,
                "cpaCountryOverrides": {"US": 3},
                "fixedAmount": 7
            })
        );
        assert_eq!(prompt.messages(), [SUCCESS_MESSAGE]);
    }

    #[tokio::test]
    async fn scenario_d_unknown_offer_saves_nothing() {
        let storage = seeded_storage();
        let mut prompt = ScriptedPrompt::new(["missing"]);
        let outcome = update_offer(&storage, &mut prompt, None).await.unwrap();

        assert_eq!(outcome, UpdateOutcome::NotFound(OfferId::from("missing")));
        assert_eq!(prompt.messages(), [NOT_FOUND_MESSAGE]);
        assert_eq!(storage.save_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn all_empty_answers_change_nothing() {
        let storage = seeded_storage();
        let mut prompt = ScriptedPrompt::new(["o1", "", "", "", "", ""]);
        let updated = expect_updated(update_offer(&storage, &mut prompt, None).await.unwrap());

        assert_eq!(updated.offer, scenario_offer());
        assert_eq!(storage.offers().unwrap(), vec![scenario_offer(), other_offer()]);
        assert_eq!(
            storage.payouts().unwrap(),
            vec![
                payout("o1", "FIXED", None, Some(10.0)),
                payout("o2", "FIXED", None, Some(1.0)),
            ]
        );
        assert_eq!(storage.save_count().unwrap(), 2);
    }

    #[tokio::test]
    async fn missing_payout_is_appended() {
        let storage = InMemoryStorage::with_records(
            vec![other_offer(), scenario_offer()],
            vec![payout("o2", "FIXED", None, Some(1.0))],
        );
        let mut prompt = ScriptedPrompt::new(["o1", "", "", "", "FIXED", "3"]);
        let updated = expect_updated(update_offer(&storage, &mut prompt, None).await.unwrap());

        assert!(updated.payout_appended);
        let payouts = storage.payouts().unwrap();
        assert_eq!(
            payouts,
            vec![
                payout("o2", "FIXED", None, Some(1.0)),
                payout("o1", "FIXED", None, Some(3.0)),
            ]
        );
        assert!(
            prompt
                .questions()
                .contains(&"Enter payout type (CPA/FIXED/CPA_AND_FIXED) [none]: ".to_owned())
        );
    }

    #[tokio::test]
    async fn given_offer_id_skips_first_question() {
        let storage = seeded_storage();
        let mut prompt = ScriptedPrompt::new(["New title", "", "", "", ""]);
        let updated = expect_updated(
            update_offer(&storage, &mut prompt, Some(OfferId::from("o1")))
                .await
                .unwrap(),
        );
        assert_eq!(updated.offer.title, "New title");
        assert_eq!(prompt.questions()[0], "Enter new title [Old]: ");
    }

    #[tokio::test]
    async fn offer_prompts_show_current_values() {
        let storage = seeded_storage();
        let mut prompt = ScriptedPrompt::new(["o1", "", "", "", "", ""]);
        let _outcome = update_offer(&storage, &mut prompt, None).await.unwrap();
        assert_eq!(
            &prompt.questions()[..4],
            [
                "Enter the Offer ID to update: ",
                "Enter new title [Old]: ",
                "Enter new description [D]: ",
                "Enter new categories comma separated [a, b]: ",
            ]
        );
    }

    #[tokio::test]
    async fn override_keys_are_uppercase_after_save() {
        let storage = seeded_storage();
        let mut prompt =
            ScriptedPrompt::new(["o1", "", "", "", "CPA", "1", "yes", "nl", "2", ""]);
        let _outcome = update_offer(&storage, &mut prompt, None).await.unwrap();

        let payouts = storage.payouts().unwrap();
        let mut expected = CountryOverrides::new();
        let _previous = expected.insert("NL".to_owned(), Amount::new(2.0));
        assert_eq!(payouts[0].terms.cpa_country_overrides, Some(expected));
    }

    #[tokio::test]
    async fn input_closed_mid_session_saves_nothing() {
        let storage = seeded_storage();
        let mut prompt = ScriptedPrompt::new(["o1", "New title"]);
        let err = update_offer(&storage, &mut prompt, None).await.unwrap_err();
        assert!(matches!(err, EditorError::InputClosed));
        assert_eq!(storage.save_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_file_aborts_before_questions() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(
            dir.path().join("offers.json"),
            dir.path().join("offerPayouts.json"),
        );
        let mut prompt = ScriptedPrompt::new(["o1"]);
        let err = update_offer(&storage, &mut prompt, None).await.unwrap_err();
        assert!(matches!(err, EditorError::NotFound { .. }));
        assert_eq!(prompt.questions().len(), 1);
    }

    #[tokio::test]
    async fn file_session_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let storage = seeded_files(dir.path());
        let mut prompt = ScriptedPrompt::new([
            "o1",
            "",
            "",
            "x, y, z",
            "CPA_AND_FIXED",
            "2",
            "yes",
            "us",
            "3",
            "",
            "7",
        ]);
        let _outcome = update_offer(&storage, &mut prompt, None).await.unwrap();

        let offers: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(storage.offers_path()).unwrap())
                .unwrap();
        assert_eq!(offers[0]["categories"], serde_json::json!(["x", "y", "z"]));
        assert_eq!(offers[0]["title"], "Old");

        let payouts_text = std::fs::read_to_string(storage.payouts_path()).unwrap();
        let payouts: serde_json::Value = serde_json::from_str(&payouts_text).unwrap();
        assert_eq!(
            payouts[0],
            serde_json::json!({
                "offerId": "o1",
                "type": "CPA_AND_FIXED",
                "cpaAmount": 2,
                "cpaCountryOverrides": {"US": 3},
                "fixedAmount": 7
            })
        );
        assert!(payouts_text.contains("\n  {\n    \"offerId\": \"o1\","));
    }

    #[tokio::test]
    async fn file_session_not_found_leaves_bytes_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let storage = seeded_files(dir.path());
        let offers_before = std::fs::read(storage.offers_path()).unwrap();
        let payouts_before = std::fs::read(storage.payouts_path()).unwrap();

        let mut prompt = ScriptedPrompt::new(["nope"]);
        let outcome = update_offer(&storage, &mut prompt, None).await.unwrap();

        assert!(matches!(outcome, UpdateOutcome::NotFound(_)));
        assert_eq!(prompt.messages(), [NOT_FOUND_MESSAGE]);
        assert_eq!(std::fs::read(storage.offers_path()).unwrap(), offers_before);
        assert_eq!(std::fs::read(storage.payouts_path()).unwrap(), payouts_before);
    }

    #[tokio::test]
    async fn file_session_keeps_unrelated_records_byte_for_byte() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(
            dir.path().join("offers.json"),
            dir.path().join("offerPayouts.json"),
        );
        let offers = r#"[
  {
    "id": "o1",
    "title": "Old",
    "description": "D",
    "categories": [
      "a"
    ]
  },
  {
    "id": "o2",
    "status": "live",
    "title": "Other",
    "description": "Untouched",
    "categories": [
      "z"
    ]
  }
]"#;
        let payouts = r#"[
  {
    "offerId": "o1",
    "type": "FIXED",
    "fixedAmount": 10
  },
  {
    "offerId": "o2",
    "type": "CPA",
    "cpaAmount": 1,
    "cpaCountryOverrides": {
      "US": 1,
      "DE": 2
    }
  }
]"#;
        std::fs::write(storage.offers_path(), offers).unwrap();
        std::fs::write(storage.payouts_path(), payouts).unwrap();

        let mut prompt = ScriptedPrompt::new(["o1", "", "", "", "", ""]);
        let _outcome = update_offer(&storage, &mut prompt, None).await.unwrap();

        assert_eq!(std::fs::read_to_string(storage.offers_path()).unwrap(), offers);
        assert_eq!(std::fs::read_to_string(storage.payouts_path()).unwrap(), payouts);
    }

    #[test]
    fn replace_payout_in_place() {
        let mut payouts = vec![payout("o1", "FIXED", None, Some(1.0))];
        let terms = payout("o1", "CPA", Some(2.0), None).terms;
        let (stored, appended) = replace_payout(&mut payouts, OfferId::from("o1"), terms, Some(0));
        assert!(!appended);
        assert_eq!(payouts, vec![stored]);
    }

    #[test]
    fn replace_payout_drops_unknown_fields_of_old_entry() {
        let mut old = payout("o1", "FIXED", None, Some(1.0));
        let _previous = old
            .extra
            .insert("legacy".to_owned(), serde_json::Value::Bool(true));
        let mut payouts = vec![old];
        let terms = PayoutTerms::default();
        let _stored = replace_payout(&mut payouts, OfferId::from("o1"), terms, Some(0));
        assert!(payouts[0].extra.is_empty());
    }
}
