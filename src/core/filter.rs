use crate::domain::model::{CategoryPredicate, Donor, FilterPredicate, Record};
use std::borrow::Cow;

/// Sentinel category value that matches every record.
pub const ALL_CATEGORIES: &str = "all";

pub const DONOR_SEARCH_FIELDS: &[&str] = &["name", "email", "mobile", "bloodGroup"];
pub const SERVICE_SEARCH_FIELDS: &[&str] = &["name", "address", "officer"];

/// 以欄位名稱取得文字值，供搜尋與分類比對
pub trait FieldAccess {
    fn field_text(&self, field: &str) -> Option<Cow<'_, str>>;
}

impl FieldAccess for Record {
    fn field_text(&self, field: &str) -> Option<Cow<'_, str>> {
        match self.data.get(field)? {
            serde_json::Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            serde_json::Value::Number(n) => Some(Cow::Owned(n.to_string())),
            serde_json::Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            _ => None,
        }
    }
}

impl FieldAccess for Donor {
    fn field_text(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "name" => Some(Cow::Borrowed(self.name.as_str())),
            "email" => Some(Cow::Borrowed(self.email.as_str())),
            "mobile" => Some(Cow::Borrowed(self.mobile.as_str())),
            "address" => Some(Cow::Borrowed(self.address.as_str())),
            "bloodGroup" => self.blood_group.map(|group| Cow::Borrowed(group.as_str())),
            "lastDonation" => self.last_donation.as_deref().map(Cow::Borrowed),
            "isAvailable" => Some(Cow::Owned(self.is_available.to_string())),
            _ => None,
        }
    }
}

pub fn matches_search<T: FieldAccess>(record: &T, search_fields: &[&str], search: Option<&str>) -> bool {
    let term = match search {
        Some(term) if !term.is_empty() => term.to_lowercase(),
        _ => return true,
    };

    search_fields.iter().any(|field| {
        record
            .field_text(field)
            .is_some_and(|value| value.to_lowercase().contains(&term))
    })
}

pub fn matches_category<T: FieldAccess>(record: &T, category: Option<&CategoryPredicate>) -> bool {
    match category {
        None => true,
        Some(predicate) if predicate.value == ALL_CATEGORIES => true,
        Some(predicate) => record
            .field_text(&predicate.field)
            .is_some_and(|value| value == predicate.value.as_str()),
    }
}

/// Keeps records that match both the search term and the category, in input order.
pub fn filter<T: FieldAccess + Clone>(
    records: &[T],
    search_fields: &[&str],
    predicate: &FilterPredicate,
) -> Vec<T> {
    records
        .iter()
        .filter(|record| {
            matches_search(*record, search_fields, predicate.search.as_deref())
                && matches_category(*record, predicate.category.as_ref())
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::BloodGroup;
    use std::collections::HashMap;

    fn record(pairs: &[(&str, serde_json::Value)]) -> Record {
        Record {
            data: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<HashMap<_, _>>(),
        }
    }

    fn karim_rahim() -> Vec<Record> {
        vec![
            record(&[("name", "Karim".into()), ("bloodGroup", "A+".into())]),
            record(&[("name", "Rahim".into()), ("bloodGroup", "B+".into())]),
        ]
    }

    #[test]
    fn test_empty_input_stays_empty() {
        let predicate = FilterPredicate::default()
            .with_search("x")
            .with_category("bloodGroup", "A+");
        let result: Vec<Record> = filter(&[], DONOR_SEARCH_FIELDS, &predicate);
        assert!(result.is_empty());
    }

    #[test]
    fn test_noop_predicate_returns_everything_in_order() {
        let records = karim_rahim();
        let predicate = FilterPredicate::default()
            .with_search("")
            .with_category("bloodGroup", ALL_CATEGORIES);
        assert_eq!(filter(&records, DONOR_SEARCH_FIELDS, &predicate), records);
        assert_eq!(
            filter(&records, DONOR_SEARCH_FIELDS, &FilterPredicate::default()),
            records
        );
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let records = karim_rahim();
        let predicate = FilterPredicate::default()
            .with_search("rah")
            .with_category("bloodGroup", ALL_CATEGORIES);
        let result = filter(&records, DONOR_SEARCH_FIELDS, &predicate);
        assert_eq!(result, vec![records[1].clone()]);

        let upper = FilterPredicate::default().with_search("KAR");
        assert_eq!(filter(&records, DONOR_SEARCH_FIELDS, &upper), vec![records[0].clone()]);
    }

    #[test]
    fn test_search_and_category_are_combined() {
        let records = karim_rahim();
        let predicate = FilterPredicate::default()
            .with_search("im")
            .with_category("bloodGroup", "B+");
        let result = filter(&records, DONOR_SEARCH_FIELDS, &predicate);
        assert_eq!(result, vec![records[1].clone()]);

        let none = FilterPredicate::default()
            .with_search("karim")
            .with_category("bloodGroup", "B+");
        assert!(filter(&records, DONOR_SEARCH_FIELDS, &none).is_empty());
    }

    #[test]
    fn test_category_is_exact_match() {
        let records = karim_rahim();
        let lower = FilterPredicate::default().with_category("bloodGroup", "a+");
        assert!(filter(&records, DONOR_SEARCH_FIELDS, &lower).is_empty());

        let missing_field = FilterPredicate::default().with_category("district", "Dhaka");
        assert!(filter(&records, DONOR_SEARCH_FIELDS, &missing_field).is_empty());
    }

    #[test]
    fn test_search_only_looks_at_listed_fields() {
        let records = vec![
            record(&[
                ("name", "Mirpur Fire Station".into()),
                ("address", "Mirpur 10".into()),
                ("officer", "Hasan".into()),
                ("phone", "999".into()),
            ]),
            record(&[
                ("name", "Uttara Fire Station".into()),
                ("address", "Sector 7".into()),
                ("officer", serde_json::Value::Null),
            ]),
        ];
        let by_officer = FilterPredicate::default().with_search("hasan");
        assert_eq!(filter(&records, SERVICE_SEARCH_FIELDS, &by_officer).len(), 1);

        let by_phone = FilterPredicate::default().with_search("999");
        assert!(filter(&records, SERVICE_SEARCH_FIELDS, &by_phone).is_empty());
    }

    #[test]
    fn test_numeric_and_bool_fields_are_searchable() {
        let records = vec![record(&[("units", 12.into()), ("active", true.into())])];
        let predicate = FilterPredicate::default()
            .with_search("12")
            .with_category("active", "true");
        assert_eq!(filter(&records, &["units"], &predicate).len(), 1);
    }

    #[test]
    fn test_typed_donors() {
        let donors = vec![
            Donor {
                name: "Karim".to_string(),
                email: "karim@example.com".to_string(),
                mobile: "01711000000".to_string(),
                address: "Dhaka".to_string(),
                blood_group: Some(BloodGroup::APositive),
                last_donation: None,
                is_available: true,
            },
            Donor {
                name: "Nasrin".to_string(),
                email: "nasrin@example.com".to_string(),
                mobile: "01822000000".to_string(),
                address: "Khulna".to_string(),
                blood_group: Some(BloodGroup::ONegative),
                last_donation: None,
                is_available: false,
            },
        ];

        let by_mobile = FilterPredicate::default().with_search("0182");
        assert_eq!(filter(&donors, DONOR_SEARCH_FIELDS, &by_mobile)[0].name, "Nasrin");

        let by_group = FilterPredicate::default().with_category("bloodGroup", "O-");
        assert_eq!(filter(&donors, DONOR_SEARCH_FIELDS, &by_group).len(), 1);

        let by_availability = FilterPredicate::default().with_category("isAvailable", "true");
        assert_eq!(filter(&donors, DONOR_SEARCH_FIELDS, &by_availability)[0].name, "Karim");
    }
}
