use super::{empty_body, SusClient};
use crate::client::QueryParams;
use crate::context::{basic_auth_token, CallContext};
use crate::types::{
    CustomerDto, CustomerUpdateRequest, DateListDto, InvoiceDto, LedgerDto, LoginResponse,
    PageDto, PasswordResetRequest, PasswordResetRequestRequest, PricingChangedResponse,
    PricingDto, RegistrationRequest, RegistrationResponse, SalesTickerResponse, SuccessResponse,
    UserNameAvailableResponse,
};
use crate::Result;

impl SusClient {
    pub async fn is_username_available(
        &self,
        ctx: &CallContext,
        username: &str,
    ) -> Result<Option<UserNameAvailableResponse>> {
        self.http
            .get(
                ctx,
                "/api/customer/username-available",
                &QueryParams::new().with("username", username),
            )
            .await
    }

    pub async fn register(
        &self,
        ctx: &CallContext,
        request: &RegistrationRequest,
    ) -> Result<Option<RegistrationResponse>> {
        self.http.post(ctx, "/api/customer/register", request).await
    }

    pub async fn password_reset_request(
        &self,
        ctx: &CallContext,
        request: &PasswordResetRequestRequest,
    ) -> Result<Option<SuccessResponse>> {
        self.http
            .post(ctx, "/api/customer/password-reset-request", request)
            .await
    }

    pub async fn password_reset(
        &self,
        ctx: &CallContext,
        request: &PasswordResetRequest,
    ) -> Result<Option<CustomerDto>> {
        self.http
            .post(ctx, "/api/customer/password-reset", request)
            .await
    }

    pub async fn sales_ticker(&self, ctx: &CallContext) -> Result<Option<SalesTickerResponse>> {
        self.http
            .get(ctx, "/api/customer/sales-ticker", &QueryParams::new())
            .await
    }

    pub async fn categories(&self, ctx: &CallContext) -> Result<Option<Vec<String>>> {
        self.http
            .get(ctx, "/api/customer/categories", &QueryParams::new())
            .await
    }

    pub async fn available_shipping_dates(&self, ctx: &CallContext) -> Result<Option<DateListDto>> {
        self.http
            .get(ctx, "/api/customer/shipping-dates", &QueryParams::new())
            .await
    }

    /// Verify the credentials and return the derived auth token with the customer.
    ///
    /// Any auth token already in `ctx` is replaced by the one derived here.
    pub async fn login(
        &self,
        ctx: &CallContext,
        username: &str,
        password: &str,
    ) -> Result<LoginResponse> {
        let auth_token = basic_auth_token(username, password);
        let ctx = ctx.clone().with_auth_token(auth_token.as_str());
        let customer = self
            .http
            .get(&ctx, "/api/customer/login", &QueryParams::new())
            .await?;
        Ok(LoginResponse {
            auth_token,
            customer,
        })
    }

    pub async fn current(&self, ctx: &CallContext) -> Result<Option<CustomerDto>> {
        self.http
            .get(ctx, "/api/customer/current", &QueryParams::new())
            .await
    }

    pub async fn pricing(&self, ctx: &CallContext) -> Result<Option<PricingDto>> {
        self.http
            .get(ctx, "/api/customer/pricing", &QueryParams::new())
            .await
    }

    /// Update the customer's details.
    ///
    /// The returned token is re-derived from the customer's primary e-mail and
    /// the password that is valid after the update. Without a customer in the
    /// response there is nothing to derive it from, and the result is `None`.
    pub async fn update(
        &self,
        ctx: &CallContext,
        request: &CustomerUpdateRequest,
    ) -> Result<Option<LoginResponse>> {
        let customer: Option<CustomerDto> = self
            .http
            .post(ctx, "/api/customer/update", request)
            .await?;
        Ok(customer.map(|customer| LoginResponse {
            auth_token: basic_auth_token(&customer.primary_email, request.effective_password()),
            customer: Some(customer),
        }))
    }

    pub async fn pricing_changed(
        &self,
        ctx: &CallContext,
    ) -> Result<Option<PricingChangedResponse>> {
        self.http
            .post(ctx, "/api/customer/pricing-changed", &empty_body())
            .await
    }

    pub async fn request_payment(&self, ctx: &CallContext) -> Result<Option<SuccessResponse>> {
        self.http
            .post(ctx, "/api/customer/customer-payment-request", &empty_body())
            .await
    }

    pub async fn account_ledger(&self, ctx: &CallContext) -> Result<Option<LedgerDto>> {
        self.http
            .get(ctx, "/api/customer/ledger", &QueryParams::new())
            .await
    }

    pub async fn invoices(
        &self,
        ctx: &CallContext,
        page: u32,
        page_size: u32,
    ) -> Result<Option<PageDto<InvoiceDto>>> {
        self.http
            .get(
                ctx,
                "/api/customer/invoices",
                &QueryParams::new()
                    .with("page", page)
                    .with("pageSize", page_size),
            )
            .await
    }

    pub async fn invoice(
        &self,
        ctx: &CallContext,
        invoice_number: &str,
    ) -> Result<Option<LedgerDto>> {
        self.http
            .get(
                ctx,
                &format!("/api/customer/invoice/{}", invoice_number),
                &QueryParams::new(),
            )
            .await
    }
}
