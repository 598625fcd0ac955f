// Plain-text artifact rendering. PDF layout and object storage live
// outside this service, so the artifact body is kept as text and stored
// with the document row.

use chrono::{DateTime, Utc};

use crate::database::models::{DocumentType, FinanceDeal};

use super::party::PartyIdentity;

pub struct Letterhead<'a> {
    pub name: &'a str,
    pub address: &'a str,
}

fn party_block(label: &str, identity: &PartyIdentity) -> String {
    let mut lines = vec![format!("{}: {}", label, identity.name)];
    if let Some(org) = &identity.organization {
        if org != &identity.name {
            lines.push(format!("  Organization: {}", org));
        }
    }
    if let Some(address) = &identity.address {
        lines.push(format!("  Address: {}", address));
    }
    if let Some(phone) = &identity.phone {
        lines.push(format!("  Phone: {}", phone));
    }
    if let Some(email) = &identity.email {
        lines.push(format!("  Email: {}", email));
    }
    lines.join("\n")
}

fn vehicle_line(deal: &FinanceDeal) -> String {
    let year = deal.year.map(|y| y.to_string()).unwrap_or_else(|| "----".to_string());
    format!(
        "{} {} {}",
        year,
        deal.make.as_deref().unwrap_or("(make unknown)"),
        deal.model.as_deref().unwrap_or("(model unknown)"),
    )
}

/// Render the stored artifact body for a generated document
pub fn render_document(
    doc_type: DocumentType,
    deal: &FinanceDeal,
    buyer: &PartyIdentity,
    seller: &PartyIdentity,
    letterhead: &Letterhead<'_>,
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n{}\n", letterhead.name, letterhead.address));
    out.push_str(&format!("\n{}\n", doc_type.display_title()));
    out.push_str(&format!("Generated: {}\n", generated_at.format("%Y-%m-%d %H:%M UTC")));
    out.push_str("\n----------------------------------------\n\n");

    out.push_str(&format!("Vehicle: {}\n", vehicle_line(deal)));
    out.push_str(&format!(
        "VIN: {}\n",
        deal.vin.as_deref().unwrap_or("(not recorded)")
    ));
    if let Some(price) = deal.purchase_price {
        out.push_str(&format!("Sale price: ${}\n", price));
    }
    out.push('\n');

    out.push_str(&party_block("Seller", seller));
    out.push_str("\n\n");
    out.push_str(&party_block("Buyer", buyer));
    out.push('\n');

    match doc_type {
        DocumentType::BillOfSale => {
            out.push_str(
                "\nThe seller transfers ownership of the vehicle described above \
                 to the buyer for the stated consideration.\n",
            );
        }
        DocumentType::TitleReassignment => {
            out.push_str(
                "\nThe seller reassigns the certificate of title for the vehicle \
                 described above to the buyer.\n",
            );
        }
        DocumentType::SellerUpload => {}
    }

    out.push_str("\nSeller signature: ______________________\n");
    out.push_str("Buyer signature:  ______________________\n");

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::party::PartySource;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn identity(name: &str) -> PartyIdentity {
        PartyIdentity {
            name: name.to_string(),
            organization: None,
            email: None,
            phone: None,
            address: None,
            source: PartySource::DealContact,
        }
    }

    #[test]
    fn bill_of_sale_carries_vin_and_parties() {
        let now = Utc::now();
        let deal = FinanceDeal {
            id: Uuid::new_v4(),
            vin: Some("1FTFW1ET5DFC10312".to_string()),
            year: Some(2013),
            make: Some("Ford".to_string()),
            model: Some("F-150".to_string()),
            purchase_price: Some(Decimal::new(22_500_00, 2)),
            list_price: None,
            wholesale_price: None,
            seller: None,
            buyer: None,
            current_stage: "closed".to_string(),
            priority: "medium".to_string(),
            dealer_name: None,
            created_at: now,
            updated_at: now,
        };

        let body = render_document(
            DocumentType::BillOfSale,
            &deal,
            &identity("Jordan Brooks"),
            &identity("Lakeside Auto Group"),
            &Letterhead { name: "Dealdesk Motors LLC", address: "1 Dealership Way" },
            now,
        );

        assert!(body.contains("BILL OF SALE"));
        assert!(body.contains("1FTFW1ET5DFC10312"));
        assert!(body.contains("2013 Ford F-150"));
        assert!(body.contains("Buyer: Jordan Brooks"));
        assert!(body.contains("Seller: Lakeside Auto Group"));
        assert!(body.contains("$22500.00"));
    }
}
