//! Data Model
//!
//! Credentials, product/tag rules and the contact record sent to Mailchimp.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// API credentials entered on the settings page.
///
/// Every field is optional; blank strings count as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Stripe secret key
    #[serde(default)]
    pub stripe_api_key: Option<String>,

    /// Mailchimp API key (`<key>-<datacenter>`)
    #[serde(default)]
    pub mailchimp_api_key: Option<String>,

    /// Mailchimp audience (list) id
    #[serde(default)]
    pub mailchimp_list_id: Option<String>,
}

impl Credentials {
    /// Stripe key, if configured
    pub fn stripe_key(&self) -> Option<&str> {
        non_blank(self.stripe_api_key.as_deref())
    }

    /// Mailchimp key and audience id, if both are configured
    pub fn mailchimp(&self) -> Option<(&str, &str)> {
        Some((
            non_blank(self.mailchimp_api_key.as_deref())?,
            non_blank(self.mailchimp_list_id.as_deref())?,
        ))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Maps a product title to a Mailchimp tag.
///
/// Rules form an ordered list; duplicates are allowed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTagRule {
    pub title: String,
    pub tag: String,
}

impl ProductTagRule {
    pub fn new(title: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tag: tag.into(),
        }
    }
}

/// One purchased entry of a checkout session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchasedLineItem {
    pub description: String,
}

impl PurchasedLineItem {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Insertion-ordered set of tag names
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagSet(Vec<String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag unless an identical one is already present.
    ///
    /// Returns `true` if the tag was added.
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if self.contains(&tag) {
            return false;
        }
        self.0.push(tag);
        true
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Stay details carried by booking checkouts
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDetails {
    pub checkin: String,
    #[serde(default)]
    pub checkout: String,
    #[serde(default)]
    pub cdiscount: String,
    #[serde(default)]
    pub longstay20: String,
    #[serde(default)]
    pub longstay15: String,
}

/// Customer identity extracted from a completed checkout
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomerData {
    pub email: String,
    pub first_name: String,
    pub last_name: String,

    /// Present only when the checkout carried a check-in date
    pub booking: Option<BookingDetails>,
}

/// Contact payload for the Mailchimp members endpoint
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContactRecord {
    pub email_address: String,
    pub status: String,
    pub merge_fields: BTreeMap<String, String>,
    pub tags: TagSet,
}

impl ContactRecord {
    /// Member status for every contact we push
    pub const STATUS_SUBSCRIBED: &'static str = "subscribed";

    /// Build the contact for a customer; the booking variant adds stay fields.
    pub fn new(customer: &CustomerData, tags: TagSet) -> Self {
        let mut merge_fields = BTreeMap::new();
        merge_fields.insert("FNAME".to_string(), customer.first_name.clone());
        merge_fields.insert("LNAME".to_string(), customer.last_name.clone());

        if let Some(booking) = &customer.booking {
            merge_fields.insert("CHECKIN".to_string(), booking.checkin.clone());
            merge_fields.insert("CHECKOUT".to_string(), booking.checkout.clone());
            merge_fields.insert("CDISCOUNT".to_string(), booking.cdiscount.clone());
            merge_fields.insert("LONGSTAY20".to_string(), booking.longstay20.clone());
            merge_fields.insert("LONGSTAY15".to_string(), booking.longstay15.clone());
        }

        Self {
            email_address: customer.email.clone(),
            status: Self::STATUS_SUBSCRIBED.to_string(),
            merge_fields,
            tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> CustomerData {
        CustomerData {
            email: "jane@example.com".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            booking: None,
        }
    }

    #[test]
    fn test_blank_credentials_are_absent() {
        let creds = Credentials {
            stripe_api_key: Some("  ".into()),
            mailchimp_api_key: Some("abc-us21".into()),
            mailchimp_list_id: None,
        };
        assert_eq!(creds.stripe_key(), None);
        assert_eq!(creds.mailchimp(), None);
    }

    #[test]
    fn test_tag_set_keeps_first_occurrence_order() {
        let mut tags = TagSet::new();
        assert!(tags.insert("customer"));
        assert!(tags.insert("vip"));
        assert!(!tags.insert("customer"));
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec!["customer", "vip"]);
        assert_eq!(serde_json::to_string(&tags).unwrap(), r#"["customer","vip"]"#);
    }

    #[test]
    fn test_minimal_contact_shape() {
        let mut tags = TagSet::new();
        tags.insert("customer");
        let contact = ContactRecord::new(&customer(), tags);

        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(json["email_address"], "jane@example.com");
        assert_eq!(json["status"], "subscribed");
        assert_eq!(json["merge_fields"]["FNAME"], "Jane");
        assert_eq!(json["merge_fields"]["LNAME"], "Doe");
        assert!(json["merge_fields"].get("CHECKIN").is_none());
        assert_eq!(json["tags"], serde_json::json!(["customer"]));
    }

    #[test]
    fn test_booking_contact_adds_stay_fields() {
        let mut data = customer();
        data.booking = Some(BookingDetails {
            checkin: "2026-07-01".into(),
            checkout: "2026-07-08".into(),
            ..Default::default()
        });
        let contact = ContactRecord::new(&data, TagSet::new());

        assert_eq!(contact.merge_fields["CHECKIN"], "2026-07-01");
        assert_eq!(contact.merge_fields["CHECKOUT"], "2026-07-08");
        assert_eq!(contact.merge_fields["LONGSTAY15"], "");
        assert_eq!(contact.merge_fields.len(), 7);
    }
}
