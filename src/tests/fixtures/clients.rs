// Client documents as the hosted store holds them, with every cached counter consistent.

use crate::modules::hour_ledger::core::client::ClientRecord;

const HOURLY_CLIENT_JSON: &str = include_str!("json/hourly_client.json");
const LEGAL_PROCEDURE_CLIENT_JSON: &str = include_str!("json/legal_procedure_client.json");

/// One hourly service with a single 10 hour package.
pub fn hourly_client() -> ClientRecord {
    serde_json::from_str(HOURLY_CLIENT_JSON).unwrap()
}

/// One legal procedure: two hourly stages (10h and 6h) and a fixed-price stage.
pub fn legal_procedure_client() -> ClientRecord {
    serde_json::from_str(LEGAL_PROCEDURE_CLIENT_JSON).unwrap()
}

#[cfg(test)]
mod client_fixtures_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn it_should_keep_unknown_fixture_fields() {
        let client = hourly_client();
        assert_eq!(
            client.services[0].packages[0].extra["purchaseDate"],
            "2025-01-06"
        );
        let legal = legal_procedure_client();
        assert_eq!(legal.services[0].stages[2].extra["fixedPrice"], 12000);
    }
}
