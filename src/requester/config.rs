//! Endpoint descriptor model for the backend services.
//!
//! The descriptor is a static JSON document bundled with the binary: one
//! block per service with its base URL and a map of named endpoints, each
//! holding a path template, an HTTP method and optional pagination defaults.

use serde::Deserialize;
use std::collections::HashMap;

/// Whole descriptor file: one block per backend service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServicesConfig {
    pub pets_service: ServiceEndpoints,
    pub treatments_service: ServiceEndpoints,
    pub users_service: ServiceEndpoints,
}

impl ServicesConfig {
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceEndpoints {
    pub base: String,
    pub endpoints: HashMap<String, Endpoint>,
}

impl ServiceEndpoints {
    pub fn endpoint(&self, alias: &str) -> Option<&Endpoint> {
        self.endpoints.get(alias)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Endpoint {
    pub path: String,
    pub method: String,
    pub query_params: Option<QueryParams>,
}

impl Endpoint {
    /// Builds the request URL: base plus path, with every `{name}` token
    /// replaced by its value via literal substring substitution.
    pub fn url(&self, base: &str, params: &[(&str, String)]) -> String {
        let mut url = format!("{}{}", base, self.path);
        for (name, value) in params {
            url = url.replace(&format!("{{{name}}}"), value);
        }

        url
    }
}

/// Pagination defaults attached to list endpoints.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct QueryParams {
    pub offset: u32,
    pub limit: u32,
}

impl QueryParams {
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("offset".to_string(), self.offset.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTOR: &str = include_str!("../../config/endpoints.json");

    #[test]
    fn test_bundled_descriptor_parses() {
        let config = ServicesConfig::from_json(DESCRIPTOR).unwrap();

        assert_eq!(config.pets_service.base, "http://localhost:8712/pets");
        assert_eq!(config.pets_service.endpoints.len(), 3);
        assert_eq!(config.treatments_service.endpoints.len(), 3);
        assert_eq!(config.users_service.endpoints.len(), 1);

        let get_pets = config.pets_service.endpoint("get_pets").unwrap();
        assert_eq!(get_pets.path, "/owner/{ownerID}");
        assert_eq!(get_pets.method, "GET");
        assert_eq!(
            get_pets.query_params,
            Some(QueryParams {
                offset: 0,
                limit: 100
            })
        );

        let register_pet = config.pets_service.endpoint("register_pet").unwrap();
        assert_eq!(register_pet.method, "POST");
        assert!(register_pet.query_params.is_none());
    }

    #[test]
    fn test_url_substitutes_path_params() {
        let endpoint = Endpoint {
            path: "/owner/{ownerID}/pet/{petID}".to_string(),
            method: "GET".to_string(),
            query_params: None,
        };

        let url = endpoint.url(
            "https://test",
            &[("ownerID", "69".to_string()), ("petID", "7".to_string())],
        );

        assert_eq!(url, "https://test/owner/69/pet/7");
    }

    #[test]
    fn test_url_without_params_is_base_plus_path() {
        let endpoint = Endpoint {
            path: "/pet".to_string(),
            method: "POST".to_string(),
            query_params: None,
        };

        assert_eq!(endpoint.url("https://test", &[]), "https://test/pet");
    }

    #[test]
    fn test_query_params_pairs() {
        let params = QueryParams {
            offset: 0,
            limit: 5,
        };

        assert_eq!(
            params.to_pairs(),
            vec![
                ("offset".to_string(), "0".to_string()),
                ("limit".to_string(), "5".to_string()),
            ]
        );
    }
}
