//! # Backend requester
//!
//! Thin typed client over the three Pet Place REST services (pets,
//! treatments, users). Endpoints are described by a bundled JSON descriptor
//! (base URL, path templates, methods, pagination defaults) loaded once at
//! construction. Every call is a single attempt with a fixed timeout; a
//! failed exchange is classified into a [`RequestError`] and reported to
//! the caller, never retried.

pub mod config;
pub mod error;

pub use error::{RequestError, RequestErrorKind};

use crate::domain::{PetRequest, PetSummary, Treatment, UserInfo, Vaccine};
use config::{ServiceEndpoints, ServicesConfig};
use error::{
    classify_response, PetServiceError, ServiceErrorPayload, TreatmentServiceError,
    UserServiceError,
};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::str::FromStr;
use std::time::Duration;

/// Descriptor bundled into the binary; see `config/endpoints.json`.
const ENDPOINTS_DESCRIPTOR: &str = include_str!("../../config/endpoints.json");

/// Fixed per-call timeout, the only time-related policy in the client.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

// Endpoint aliases, matching the descriptor keys.
const REGISTER_PET: &str = "register_pet";
const GET_PETS: &str = "get_pets";
const GET_PET_TREATMENTS: &str = "get_pet_treatments";
const GET_TREATMENT: &str = "get_treatment";
const GET_VACCINES: &str = "get_vaccines";
const USER_FETCHER: &str = "user_fetcher";

/// Typed client over the backend services.
pub struct ServiceRequester {
    pets_service: ServiceEndpoints,
    treatments_service: ServiceEndpoints,
    users_service: ServiceEndpoints,
    client: Client,
}

impl ServiceRequester {
    /// Builds a requester from the bundled descriptor with a fresh client
    /// using the fixed timeout.
    pub fn new() -> anyhow::Result<Self> {
        let config = ServicesConfig::from_json(ENDPOINTS_DESCRIPTOR)?;
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self::from_config(config, client))
    }

    /// Builds a requester from an explicit descriptor; tests use this to
    /// point the services at a mock server.
    pub fn from_config(config: ServicesConfig, client: Client) -> Self {
        Self {
            pets_service: config.pets_service,
            treatments_service: config.treatments_service,
            users_service: config.users_service,
            client,
        }
    }

    /// Fetches brief data of every pet belonging to the given owner.
    pub async fn get_pets_by_owner_id(
        &self,
        owner_id: i64,
    ) -> Result<Vec<PetSummary>, RequestError> {
        self.fetch_json::<Vec<PetSummary>, PetServiceError>(
            &self.pets_service,
            GET_PETS,
            &[("ownerID", owner_id.to_string())],
            "GetPetsByOwnerId",
        )
        .await
    }

    /// Creates a pet record. The request body is sent once; the response
    /// body is not used beyond error classification.
    pub async fn register_pet(&self, pet_request: &PetRequest) -> Result<(), RequestError> {
        let request = self
            .build_request(&self.pets_service, REGISTER_PET, &[])?
            .json(pet_request);

        self.send::<PetServiceError>(request, "RegisterPet").await?;
        Ok(())
    }

    /// Fetches the latest treatments of the given pet, newest first.
    pub async fn get_treatments_by_pet_id(
        &self,
        pet_id: i64,
    ) -> Result<Vec<Treatment>, RequestError> {
        let mut treatments = self
            .fetch_json::<Vec<Treatment>, TreatmentServiceError>(
                &self.treatments_service,
                GET_PET_TREATMENTS,
                &[("petID", pet_id.to_string())],
                "GetTreatmentsByPetId",
            )
            .await?;

        treatments.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        Ok(treatments)
    }

    /// Fetches all the information about one treatment.
    pub async fn get_treatment(&self, treatment_id: &str) -> Result<Treatment, RequestError> {
        self.fetch_json::<Treatment, TreatmentServiceError>(
            &self.treatments_service,
            GET_TREATMENT,
            &[("treatmentID", treatment_id.to_string())],
            "GetTreatment",
        )
        .await
    }

    /// Fetches every vaccine applied to the given pet.
    pub async fn get_vaccines(&self, pet_id: i64) -> Result<Vec<Vaccine>, RequestError> {
        self.fetch_json::<Vec<Vaccine>, TreatmentServiceError>(
            &self.treatments_service,
            GET_VACCINES,
            &[("petID", pet_id.to_string())],
            "GetVaccines",
        )
        .await
    }

    /// Looks up the user profile registered for a telegram id. A 404 here
    /// means "not registered" and is branched on with `is_not_found`.
    pub async fn get_user_data(&self, telegram_id: i64) -> Result<UserInfo, RequestError> {
        self.fetch_json::<UserInfo, UserServiceError>(
            &self.users_service,
            USER_FETCHER,
            &[("telegramID", telegram_id.to_string())],
            "GetUserData",
        )
        .await
    }

    /// Resolves the endpoint alias and assembles the request: formatted
    /// URL, method from the descriptor, pagination query params when the
    /// endpoint declares them.
    fn build_request(
        &self,
        service: &ServiceEndpoints,
        alias: &str,
        params: &[(&str, String)],
    ) -> Result<RequestBuilder, RequestError> {
        let endpoint = service.endpoint(alias).ok_or_else(|| {
            RequestError::new(
                RequestErrorKind::MissingEndpoint {
                    alias: alias.to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        })?;

        let method = Method::from_str(&endpoint.method).map_err(|_| {
            RequestError::with_context(
                RequestErrorKind::BuildingRequest,
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("invalid method {}", endpoint.method),
            )
        })?;

        let url = endpoint.url(&service.base, params);
        let mut request = self.client.request(method, url);
        if let Some(query_params) = &endpoint.query_params {
            request = request.query(&query_params.to_pairs());
        }

        Ok(request)
    }

    /// Performs the exchange and applies the error policy for the
    /// service's payload shape.
    async fn send<P: ServiceErrorPayload>(
        &self,
        request: RequestBuilder,
        operation: &str,
    ) -> Result<reqwest::Response, RequestError> {
        let response = request.send().await.map_err(|err| {
            RequestError::with_context(
                RequestErrorKind::PerformingRequest,
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("{operation}: {err}"),
            )
        })?;

        classify_response::<P>(response).await
    }

    /// Full GET pipeline: build, send, classify, decode the success body.
    async fn fetch_json<T, P>(
        &self,
        service: &ServiceEndpoints,
        alias: &str,
        params: &[(&str, String)],
        operation: &str,
    ) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        P: ServiceErrorPayload,
    {
        let request = self.build_request(service, alias, params)?;
        let response = self.send::<P>(request, operation).await?;

        let status = response.status();
        let body = response.bytes().await.map_err(|_| {
            RequestError::with_context(RequestErrorKind::ReadingBody, status, operation)
        })?;

        serde_json::from_slice(&body).map_err(|err| {
            RequestError::with_context(RequestErrorKind::DecodingPayload, status, err.to_string())
        })
    }
}
