// Decides whose identity prints on a generated legal document. Missing
// buyer data is a first-class variant the caller must handle; the selling
// organization's identity is never substituted for an absent buyer, no
// matter what the contact's declared type says.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::database::models::{DealContact, Dealer, FinanceDeal};

/// Where a resolved identity came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PartySource {
    /// The deal's own buyer/seller contact block
    DealContact,
    /// The dealer CRM record the deal references
    DealerRecord,
}

/// Identity as it will print on the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyIdentity {
    pub name: String,
    pub organization: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub source: PartySource,
}

/// Why a party could not be resolved
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MissingParty {
    #[error("deal has no buyer block")]
    BuyerAbsent,
    #[error("deal has no seller block and no dealer on file")]
    SellerAbsent,
    #[error("party has no printable name")]
    NameMissing,
    #[error("party name is a placeholder: '{0}'")]
    PlaceholderName(String),
}

/// Resolution result. `Unknown` is a normal outcome, not an error type,
/// so list endpoints can report it per record.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedParty {
    Known(PartyIdentity),
    Unknown(MissingParty),
}

impl ResolvedParty {
    pub fn known(&self) -> Option<&PartyIdentity> {
        match self {
            ResolvedParty::Known(identity) => Some(identity),
            ResolvedParty::Unknown(_) => None,
        }
    }
}

/// Placeholder spellings found in the historical data
const PLACEHOLDER_NAMES: &[&str] = &["n/a", "na", "none", "unknown", "tbd", "-"];

fn printable_name(contact: &DealContact) -> Result<String, MissingParty> {
    let name = contact.name.as_deref().map(str::trim).unwrap_or("");
    if name.is_empty() {
        return Err(MissingParty::NameMissing);
    }
    if PLACEHOLDER_NAMES.contains(&name.to_ascii_lowercase().as_str()) {
        return Err(MissingParty::PlaceholderName(name.to_string()));
    }
    Ok(name.to_string())
}

fn identity_from_contact(contact: &DealContact) -> Result<PartyIdentity, MissingParty> {
    let name = printable_name(contact)?;
    Ok(PartyIdentity {
        name,
        organization: contact.organization.clone(),
        email: contact.email.clone(),
        phone: contact.phone.clone(),
        address: contact.address.clone(),
        source: PartySource::DealContact,
    })
}

fn identity_from_dealer(dealer: &Dealer) -> PartyIdentity {
    PartyIdentity {
        name: dealer.name.clone(),
        organization: Some(dealer.name.clone()),
        email: dealer.email.clone(),
        phone: dealer.phone.clone(),
        address: dealer.address.clone(),
        source: PartySource::DealerRecord,
    }
}

/// Resolve the buyer side. Absent block, blank name, or a placeholder all
/// resolve to `Unknown` regardless of the contact's declared type.
pub fn resolve_buyer(deal: &FinanceDeal) -> ResolvedParty {
    match deal.buyer.as_deref() {
        None => ResolvedParty::Unknown(MissingParty::BuyerAbsent),
        Some(contact) => match identity_from_contact(contact) {
            Ok(identity) => ResolvedParty::Known(identity),
            Err(reason) => ResolvedParty::Unknown(reason),
        },
    }
}

/// Resolve the seller side. The deal's own seller block wins; when it is
/// absent or unprintable, the referenced dealer record stands in, and the
/// substitution is visible through `PartyIdentity::source`.
pub fn resolve_seller(deal: &FinanceDeal, dealer: Option<&Dealer>) -> ResolvedParty {
    let from_contact = deal
        .seller
        .as_deref()
        .map(identity_from_contact);

    match from_contact {
        Some(Ok(identity)) => ResolvedParty::Known(identity),
        Some(Err(reason)) => match dealer {
            Some(d) => ResolvedParty::Known(identity_from_dealer(d)),
            None => ResolvedParty::Unknown(reason),
        },
        None => match dealer {
            Some(d) => ResolvedParty::Known(identity_from_dealer(d)),
            None => ResolvedParty::Unknown(MissingParty::SellerAbsent),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn deal(buyer: Option<DealContact>, seller: Option<DealContact>) -> FinanceDeal {
        let now = Utc::now();
        FinanceDeal {
            id: Uuid::new_v4(),
            vin: Some("2T1BURHE0JC123456".to_string()),
            year: Some(2018),
            make: Some("Toyota".to_string()),
            model: Some("Corolla".to_string()),
            purchase_price: Some(Decimal::new(12_000_00, 2)),
            list_price: None,
            wholesale_price: None,
            seller: seller.map(Json),
            buyer: buyer.map(Json),
            current_stage: "intake".to_string(),
            priority: "medium".to_string(),
            dealer_name: Some("Lakeside Auto Group".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    fn dealer() -> Dealer {
        let now = Utc::now();
        Dealer {
            id: Uuid::new_v4(),
            name: "Lakeside Auto Group".to_string(),
            contact_person: Some("Dana Whitfield".to_string()),
            phone: Some("555-0100".to_string()),
            email: Some("office@lakeside.example.com".to_string()),
            address: Some("200 Shore Rd".to_string()),
            total_deals: 12,
            total_volume: Decimal::new(250_000_00, 2),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn absent_buyer_resolves_unknown() {
        let d = deal(None, None);
        assert_eq!(
            resolve_buyer(&d),
            ResolvedParty::Unknown(MissingParty::BuyerAbsent)
        );
    }

    #[test]
    fn placeholder_buyer_name_resolves_unknown() {
        let d = deal(Some(DealContact::named("N/A")), None);
        assert_eq!(
            resolve_buyer(&d),
            ResolvedParty::Unknown(MissingParty::PlaceholderName("N/A".to_string()))
        );

        let d = deal(Some(DealContact::named("   ")), None);
        assert_eq!(
            resolve_buyer(&d),
            ResolvedParty::Unknown(MissingParty::NameMissing)
        );
    }

    #[test]
    fn dealer_typed_buyer_with_real_name_stays_the_buyer() {
        // A legitimate dealer buyer must never be replaced by the
        // selling organization.
        let mut contact = DealContact::named("Hilltop Motors Inc");
        contact.contact_type = Some("dealer".to_string());
        let d = deal(Some(contact), None);

        match resolve_buyer(&d) {
            ResolvedParty::Known(identity) => {
                assert_eq!(identity.name, "Hilltop Motors Inc");
                assert_eq!(identity.source, PartySource::DealContact);
            }
            other => panic!("expected known buyer, got {:?}", other),
        }
    }

    #[test]
    fn seller_falls_back_to_dealer_record_visibly() {
        let d = deal(None, None);
        let dlr = dealer();
        match resolve_seller(&d, Some(&dlr)) {
            ResolvedParty::Known(identity) => {
                assert_eq!(identity.name, "Lakeside Auto Group");
                assert_eq!(identity.source, PartySource::DealerRecord);
            }
            other => panic!("expected dealer fallback, got {:?}", other),
        }
    }

    #[test]
    fn seller_contact_wins_over_dealer_record() {
        let d = deal(None, Some(DealContact::named("Pat Alvarez")));
        match resolve_seller(&d, Some(&dealer())) {
            ResolvedParty::Known(identity) => {
                assert_eq!(identity.name, "Pat Alvarez");
                assert_eq!(identity.source, PartySource::DealContact);
            }
            other => panic!("expected seller contact, got {:?}", other),
        }
    }

    #[test]
    fn seller_unknown_when_nothing_on_file() {
        let d = deal(None, None);
        assert_eq!(
            resolve_seller(&d, None),
            ResolvedParty::Unknown(MissingParty::SellerAbsent)
        );
    }
}
