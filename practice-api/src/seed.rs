//! Sample clients for local development

use shared_types::{ClientId, FilingStatus, SpouseInfo};

use crate::store::{new_record, ClientStore};

pub async fn seed_store(store: &ClientStore) {
    let mut jane = new_record("Jane", "Doe");
    jane.id = ClientId::from("client-jane-doe");
    jane.email = "jane.doe@example.com".to_string();
    jane.phone = "555-0100".to_string();
    jane.filing_status = Some(FilingStatus::MarriedFilingJointly);
    jane.dependents = 2;
    jane.address = "12 Elm Street".to_string();
    jane.city = "Springfield".to_string();
    jane.state = "IL".to_string();
    jane.zip_code = "62701".to_string();
    jane.spouse = Some(SpouseInfo {
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        email: "john.doe@example.com".to_string(),
        phone: String::new(),
    });
    jane.tags = vec!["VIP".to_string(), "Returning".to_string()];
    store.insert(jane).await;

    let mut omar = new_record("Omar", "Haddad");
    omar.id = ClientId::from("client-omar-haddad");
    omar.middle_name = "K".to_string();
    omar.email = "omar@example.com".to_string();
    omar.phone = "555-0142".to_string();
    omar.filing_status = Some(FilingStatus::Single);
    omar.city = "Portland".to_string();
    omar.state = "OR".to_string();
    omar.zip_code = "97201".to_string();
    omar.locked_fields = vec!["email".to_string(), "phone".to_string()];
    store.insert(omar).await;

    let mut lin = new_record("Lin", "Chen");
    lin.id = ClientId::from("client-lin-chen");
    lin.filing_status = Some(FilingStatus::HeadOfHousehold);
    lin.dependents = 1;
    lin.tags = vec!["Extension".to_string()];
    lin.locked_fields = vec!["tags".to_string()];
    store.insert(lin).await;

    tracing::info!(count = store.list().await.len(), "Seeded client store");
}
