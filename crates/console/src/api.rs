//! Remote API access.
//!
//! [`RemoteApi`] is the seam the console talks through; [`ApiClient`] is the
//! HTTP implementation. The API stays the authority: nothing here caches or
//! retries.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Method, RequestBuilder};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use counterdesk_auth::{AuthResponse, Credentials, Identity, NewUser, UserUpdate};
use counterdesk_core::{DomainError, ProductId, UserId};
use counterdesk_products::{NewProduct, Product, ProductUpdate};
use counterdesk_sales::{NewSale, Sale, SaleLine};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("decode error: {0}")]
    Decode(String),

    #[error(transparent)]
    Invalid(#[from] DomainError),
}

impl ApiError {
    /// The server rejected the bearer token (or its absence).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401, .. })
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// 1-based page selector used by every list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    #[serde(rename = "PageNumber")]
    pub page_number: u32,
    #[serde(rename = "PageSize")]
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: 10,
        }
    }
}

impl PageRequest {
    pub fn new(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number: page_number.max(1),
            page_size: page_size.max(1),
        }
    }
}

/// Envelope around list responses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

/// Body of delete responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Ack {
    pub success: bool,
}

/// Headline figures for the dashboard view.
///
/// Missing figures read as zero; fields this client does not know are kept
/// in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    #[serde(default)]
    pub total_products: u64,
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_sales: u64,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total_profit: Decimal,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Optional inclusive date window for the sale report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleReportQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl SaleReportQuery {
    pub fn validate(&self) -> Result<(), DomainError> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start > end => Err(DomainError::validation(
                "start date must not be after end date",
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Serialize)]
struct ProductFilter<'a> {
    #[serde(rename = "productName", skip_serializing_if = "Option::is_none")]
    product_name: Option<&'a str>,
}

/// Operations the console needs from the server.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait RemoteApi {
    /// Replace (or clear) the bearer token attached to later calls.
    fn set_token(&self, token: Option<String>);

    async fn login(&self, credentials: &Credentials) -> ApiResult<AuthResponse>;

    async fn get_dashboard(&self) -> ApiResult<Dashboard>;

    async fn list_products(
        &self,
        page: PageRequest,
        product_name: Option<&str>,
    ) -> ApiResult<Page<Product>>;

    async fn create_product(&self, product: &NewProduct) -> ApiResult<Product>;

    async fn update_product(&self, product: &ProductUpdate) -> ApiResult<Product>;

    async fn delete_product(&self, id: &ProductId) -> ApiResult<Ack>;

    async fn list_users(&self, page: PageRequest) -> ApiResult<Page<Identity>>;

    async fn create_user(&self, user: &NewUser) -> ApiResult<Identity>;

    async fn update_user(&self, user: &UserUpdate) -> ApiResult<Identity>;

    async fn delete_user(&self, id: &UserId) -> ApiResult<Ack>;

    async fn list_sales(&self, page: PageRequest, range: SaleReportQuery) -> ApiResult<Page<Sale>>;

    /// Submit a checkout; the server echoes the recorded lines.
    async fn create_sale(&self, sale: &NewSale) -> ApiResult<Vec<SaleLine>>;
}

/// HTTP client for the console API.
#[derive(Debug)]
pub struct ApiClient {
    base_url: String,
    token: RwLock<Option<String>>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            token: RwLock::new(None),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.http.request(method, self.endpoint(path));
        match self.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> ApiResult<T> {
        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), "API call failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        resp.json().await.map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl RemoteApi for ApiClient {
    fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<AuthResponse> {
        credentials.validate()?;
        tracing::debug!(username = %credentials.username, "logging in");
        self.send(self.request(Method::POST, "auth/login").json(credentials))
            .await
    }

    async fn get_dashboard(&self) -> ApiResult<Dashboard> {
        let envelope: Envelope<Dashboard> = self
            .send(self.request(Method::GET, "dashboard/getDashboardData"))
            .await?;
        Ok(envelope.data)
    }

    async fn list_products(
        &self,
        page: PageRequest,
        product_name: Option<&str>,
    ) -> ApiResult<Page<Product>> {
        let filter = ProductFilter {
            product_name: product_name.map(str::trim).filter(|name| !name.is_empty()),
        };
        let req = self
            .request(Method::GET, "products/getAllProducts")
            .query(&page)
            .query(&filter);
        self.send(req).await
    }

    async fn create_product(&self, product: &NewProduct) -> ApiResult<Product> {
        product.validate()?;
        self.send(self.request(Method::POST, "products/addProduct").json(product))
            .await
    }

    async fn update_product(&self, product: &ProductUpdate) -> ApiResult<Product> {
        product.validate()?;
        self.send(self.request(Method::PUT, "products/updateProduct").json(product))
            .await
    }

    async fn delete_product(&self, id: &ProductId) -> ApiResult<Ack> {
        let path = format!("products/deleteProduct/{id}");
        self.send(self.request(Method::DELETE, &path)).await
    }

    async fn list_users(&self, page: PageRequest) -> ApiResult<Page<Identity>> {
        let req = self.request(Method::GET, "users/getAllUsers").query(&page);
        self.send(req).await
    }

    async fn create_user(&self, user: &NewUser) -> ApiResult<Identity> {
        user.validate()?;
        self.send(self.request(Method::POST, "users/addUser").json(user))
            .await
    }

    async fn update_user(&self, user: &UserUpdate) -> ApiResult<Identity> {
        user.validate()?;
        self.send(self.request(Method::PUT, "users/updateUser").json(user))
            .await
    }

    async fn delete_user(&self, id: &UserId) -> ApiResult<Ack> {
        let path = format!("users/deleteUser/{id}");
        self.send(self.request(Method::DELETE, &path)).await
    }

    async fn list_sales(&self, page: PageRequest, range: SaleReportQuery) -> ApiResult<Page<Sale>> {
        range.validate()?;
        let req = self
            .request(Method::GET, "sales/getAllSaleReport")
            .query(&page)
            .query(&range);
        self.send(req).await
    }

    async fn create_sale(&self, sale: &NewSale) -> ApiResult<Vec<SaleLine>> {
        if sale.product_sales.is_empty() {
            return Err(DomainError::validation("a sale needs at least one product").into());
        }
        self.send(self.request(Method::POST, "sales/addSale").json(sale))
            .await
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    fn built(req: RequestBuilder) -> reqwest::Request {
        req.build().unwrap()
    }

    #[test]
    fn endpoints_join_without_double_slashes() {
        let client = ApiClient::new("http://localhost:5000/api/");
        assert_eq!(client.base_url(), "http://localhost:5000/api");
        assert_eq!(
            client.endpoint("/auth/login"),
            "http://localhost:5000/api/auth/login"
        );
        assert_eq!(
            client.endpoint("sales/addSale"),
            "http://localhost:5000/api/sales/addSale"
        );
    }

    #[test]
    fn bearer_token_follows_set_token() {
        let client = ApiClient::new("http://localhost:5000/api");
        let req = built(client.request(Method::GET, "users/getAllUsers"));
        assert!(req.headers().get(reqwest::header::AUTHORIZATION).is_none());

        client.set_token(Some("abc.def".into()));
        let req = built(client.request(Method::GET, "users/getAllUsers"));
        assert_eq!(
            req.headers()[reqwest::header::AUTHORIZATION],
            "Bearer abc.def"
        );

        client.set_token(None);
        assert!(client.token().is_none());
    }

    #[test]
    fn product_listing_query() {
        let client = ApiClient::new("http://localhost:5000/api");
        let filter = ProductFilter {
            product_name: Some("oat milk"),
        };
        let req = built(
            client
                .request(Method::GET, "products/getAllProducts")
                .query(&PageRequest::new(2, 25))
                .query(&filter),
        );
        assert_eq!(
            req.url().query(),
            Some("PageNumber=2&PageSize=25&productName=oat+milk")
        );
    }

    #[test]
    fn sale_report_query_omits_missing_dates() {
        let client = ApiClient::new("http://localhost:5000/api");
        let range = SaleReportQuery {
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            end_date: None,
        };
        let req = built(
            client
                .request(Method::GET, "sales/getAllSaleReport")
                .query(&PageRequest::default())
                .query(&range),
        );
        assert_eq!(
            req.url().query(),
            Some("PageNumber=1&PageSize=10&startDate=2025-03-01")
        );
    }

    #[test]
    fn dashboard_request_and_envelope() {
        let client = ApiClient::new("http://localhost:5000/api");
        client.set_token(Some("abc".into()));
        let req = built(client.request(Method::GET, "dashboard/getDashboardData"));
        assert_eq!(
            req.url().as_str(),
            "http://localhost:5000/api/dashboard/getDashboardData"
        );
        assert_eq!(*req.method(), Method::GET);
        assert_eq!(req.headers()[reqwest::header::AUTHORIZATION], "Bearer abc");

        let envelope: Envelope<Dashboard> = serde_json::from_str(
            r#"{"data": {"totalProducts": 12, "totalRevenue": 104.5, "topSeller": "tea"}}"#,
        )
        .unwrap();
        let dashboard = envelope.data;
        assert_eq!(dashboard.total_products, 12);
        assert_eq!(dashboard.total_sales, 0);
        assert_eq!(dashboard.total_revenue, Decimal::new(1045, 1));
        assert_eq!(dashboard.total_profit, Decimal::ZERO);
        assert_eq!(dashboard.extra["topSeller"], "tea");
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let range = SaleReportQuery {
            start_date: NaiveDate::from_ymd_opt(2025, 3, 2),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 1),
        };
        assert!(range.validate().is_err());
    }

    #[test]
    fn page_envelope_tolerates_missing_total() {
        let page: Page<Ack> = serde_json::from_str(r#"{"data": [{"success": true}]}"#).unwrap();
        assert_eq!(page.data, vec![Ack { success: true }]);
        assert_eq!(page.total_count, None);

        let page: Page<Ack> =
            serde_json::from_str(r#"{"data": [], "totalCount": 41}"#).unwrap();
        assert_eq!(page.total_count, Some(41));
    }

    #[tokio::test]
    async fn invalid_payloads_never_reach_the_network() {
        // Nothing listens on port 9; a request would surface as Network.
        let client = ApiClient::new("http://127.0.0.1:9/api");

        let err = client
            .login(&Credentials::new("", "secret"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Invalid(_)));

        let err = client
            .create_sale(&NewSale {
                product_sales: Vec::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Invalid(_)));
    }

    #[test]
    fn unauthorized_status_is_recognised() {
        let err = ApiError::Status {
            status: 401,
            body: String::new(),
        };
        assert!(err.is_unauthorized());
        assert!(!ApiError::Network("refused".into()).is_unauthorized());
    }
}
