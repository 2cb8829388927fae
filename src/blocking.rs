//! Blocking executor and endpoint methods for thread-per-call callers.
//!
//! Each call blocks the calling thread for the whole exchange and is made on
//! behalf of whatever identity the calling thread has in its ambient
//! [`context`](crate::context). Set it before the call and clear it afterwards,
//! ideally with [`context::scope`](crate::context::scope):
//!
//! ```rust,no_run
//! use stuffusell_client::blocking::SusClient;
//! use stuffusell_client::context::{self, CallContext};
//! use stuffusell_client::Configuration;
//!
//! # fn main() -> stuffusell_client::Result<()> {
//! let client = SusClient::new(Configuration::new().with_access_token("key"))?;
//!
//! let _guard = context::scope(CallContext::basic("alice@example.com", "secret"));
//! if let Some(me) = client.current()? {
//!     println!("{}", me.primary_email);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Must not be called from inside an async runtime.

use crate::api;
use crate::client::{HttpClient, QueryParams};
use crate::context;
use crate::transport::TransportError;
use crate::types::{
    BookCourierRequest, CustomerDto, CustomerOrderDto, CustomerOrderUpdateRequest,
    CustomerUpdateRequest, DateListDto, InvoiceDto, LedgerDto, ListingReportDto, LoginResponse,
    PackagingQuantities, PackagingRequestDto, PageDto, PasswordResetRequest,
    PasswordResetRequestRequest, PricingChangedResponse, PricingDto, RegistrationRequest,
    RegistrationResponse, SalesTickerResponse, StockReportSummaryDto, SuccessResponse,
    UserNameAvailableResponse,
};
use crate::{Configuration, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::runtime::Runtime;

/// Blocking wrapper around [`HttpClient`], owning the runtime that drives it.
#[derive(Debug)]
pub struct Client {
    inner: HttpClient,
    runtime: Runtime,
}

impl Client {
    pub fn new(configuration: Configuration) -> Result<Self> {
        let workers = configuration.max_connections_per_route.clamp(1, 4);
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(workers)
            .thread_name("stuffusell-blocking")
            .enable_all()
            .build()
            .map_err(|e| TransportError::Other(format!("cannot start runtime: {}", e)))?;
        let inner = HttpClient::new(configuration)?;
        Ok(Self { inner, runtime })
    }

    /// The async executor this client drives.
    pub fn http(&self) -> &HttpClient {
        &self.inner
    }

    pub fn get<T: DeserializeOwned>(&self, path: &str, params: &QueryParams) -> Result<Option<T>> {
        let ctx = context::get();
        self.runtime.block_on(self.inner.get(&ctx, path, params))
    }

    pub fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &B,
    ) -> Result<Option<T>> {
        let ctx = context::get();
        self.runtime.block_on(self.inner.post(&ctx, path, payload))
    }

    pub fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &QueryParams,
    ) -> Result<Option<T>> {
        let ctx = context::get();
        self.runtime.block_on(self.inner.delete(&ctx, path, params))
    }
}

/// Customer API endpoint methods that block and read the thread's context.
#[derive(Debug)]
pub struct SusClient {
    client: Client,
    api: api::SusClient,
}

impl SusClient {
    pub fn new(configuration: Configuration) -> Result<Self> {
        let client = Client::new(configuration)?;
        let api = api::SusClient::from_http_client(client.http().clone());
        Ok(Self { client, api })
    }

    /// The raw blocking executor, for calls this client has no method for.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

// Each method snapshots the ambient context and runs the async endpoint with it.
macro_rules! blocking_endpoints {
    ($(fn $name:ident(&self $(, $arg:ident: $ty:ty)*) -> $ret:ty;)*) => {
        impl SusClient {
            $(
                pub fn $name(&self $(, $arg: $ty)*) -> Result<$ret> {
                    let ctx = context::get();
                    self.client.runtime.block_on(self.api.$name(&ctx $(, $arg)*))
                }
            )*
        }
    };
}

blocking_endpoints! {
    fn is_username_available(&self, username: &str) -> Option<UserNameAvailableResponse>;
    fn register(&self, request: &RegistrationRequest) -> Option<RegistrationResponse>;
    fn password_reset_request(&self, request: &PasswordResetRequestRequest) -> Option<SuccessResponse>;
    fn password_reset(&self, request: &PasswordResetRequest) -> Option<CustomerDto>;
    fn sales_ticker(&self) -> Option<SalesTickerResponse>;
    fn categories(&self) -> Option<Vec<String>>;
    fn available_shipping_dates(&self) -> Option<DateListDto>;
    fn login(&self, username: &str, password: &str) -> LoginResponse;
    fn current(&self) -> Option<CustomerDto>;
    fn pricing(&self) -> Option<PricingDto>;
    fn update(&self, request: &CustomerUpdateRequest) -> Option<LoginResponse>;
    fn pricing_changed(&self) -> Option<PricingChangedResponse>;
    fn request_payment(&self) -> Option<SuccessResponse>;
    fn account_ledger(&self) -> Option<LedgerDto>;
    fn invoices(&self, page: u32, page_size: u32) -> Option<PageDto<InvoiceDto>>;
    fn invoice(&self, invoice_number: &str) -> Option<LedgerDto>;
    fn new_order(&self, tcs_accepted: bool, ip_address: &str) -> Option<CustomerOrderDto>;
    fn orders(&self) -> Option<Vec<CustomerOrderDto>>;
    fn order(&self, sku: &str) -> Option<CustomerOrderDto>;
    fn update_order(&self, sku: &str, request: &CustomerOrderUpdateRequest) -> Option<SuccessResponse>;
    fn collect_plus_label_numbers(&self, sku: &str) -> Option<Vec<String>>;
    fn book_courier(&self, sku: &str, request: &BookCourierRequest) -> Option<SuccessResponse>;
    fn packaging_requests(&self, sku: &str) -> Option<Vec<PackagingRequestDto>>;
    fn update_packaging_requests(&self, sku: &str, quantities: &PackagingQuantities) -> Option<SuccessResponse>;
    fn listing_history(&self, sku: &str) -> Option<Vec<ListingReportDto>>;
    fn stock_report_summary(&self) -> Option<StockReportSummaryDto>;
    fn stock_data(&self, sku: &str) -> Option<ListingReportDto>;
}
