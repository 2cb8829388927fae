use super::SusClient;
use crate::client::QueryParams;
use crate::context::CallContext;
use crate::types::{
    BookCourierRequest, CustomerOrderDto, CustomerOrderUpdateRequest, ListingReportDto,
    NewOrderRequest, PackagingQuantities, PackagingRequestDto, StockReportSummaryDto,
    SuccessResponse,
};
use crate::Result;

impl SusClient {
    /// Open a new order.
    ///
    /// `ip_address` is recorded, in the body and as `X-Forwarded-For`, only when
    /// the terms were accepted. Otherwise no end-user address leaves the client,
    /// including one already set on `ctx`.
    pub async fn new_order(
        &self,
        ctx: &CallContext,
        tcs_accepted: bool,
        ip_address: &str,
    ) -> Result<Option<CustomerOrderDto>> {
        let ctx = if tcs_accepted {
            ctx.clone().with_ip_address(ip_address)
        } else {
            ctx.clone().without_ip_address()
        };
        self.http
            .post(
                &ctx,
                "/api/customer/new-order",
                &NewOrderRequest::new(tcs_accepted, ip_address),
            )
            .await
    }

    pub async fn orders(&self, ctx: &CallContext) -> Result<Option<Vec<CustomerOrderDto>>> {
        self.http
            .get(ctx, "/api/customer/orders", &QueryParams::new())
            .await
    }

    pub async fn order(&self, ctx: &CallContext, sku: &str) -> Result<Option<CustomerOrderDto>> {
        self.http
            .get(
                ctx,
                &format!("/api/customer/order/{}", sku),
                &QueryParams::new(),
            )
            .await
    }

    pub async fn update_order(
        &self,
        ctx: &CallContext,
        sku: &str,
        request: &CustomerOrderUpdateRequest,
    ) -> Result<Option<SuccessResponse>> {
        self.http
            .post(ctx, &format!("/api/customer/order/{}/update", sku), request)
            .await
    }

    pub async fn collect_plus_label_numbers(
        &self,
        ctx: &CallContext,
        sku: &str,
    ) -> Result<Option<Vec<String>>> {
        self.http
            .get(
                ctx,
                &format!("/api/customer/order/{}/collect-plus-label-numbers", sku),
                &QueryParams::new(),
            )
            .await
    }

    pub async fn book_courier(
        &self,
        ctx: &CallContext,
        sku: &str,
        request: &BookCourierRequest,
    ) -> Result<Option<SuccessResponse>> {
        self.http
            .post(
                ctx,
                &format!("/api/customer/order/{}/book-courier", sku),
                request,
            )
            .await
    }

    pub async fn packaging_requests(
        &self,
        ctx: &CallContext,
        sku: &str,
    ) -> Result<Option<Vec<PackagingRequestDto>>> {
        self.http
            .get(
                ctx,
                &format!("/api/customer/order/{}/packaging-request", sku),
                &QueryParams::new(),
            )
            .await
    }

    pub async fn update_packaging_requests(
        &self,
        ctx: &CallContext,
        sku: &str,
        quantities: &PackagingQuantities,
    ) -> Result<Option<SuccessResponse>> {
        self.http
            .post(
                ctx,
                &format!("/api/customer/order/{}/packaging-request", sku),
                quantities,
            )
            .await
    }

    pub async fn listing_history(
        &self,
        ctx: &CallContext,
        sku: &str,
    ) -> Result<Option<Vec<ListingReportDto>>> {
        self.http
            .get(
                ctx,
                &format!("/api/customer/order/{}/listing-history", sku),
                &QueryParams::new(),
            )
            .await
    }

    pub async fn stock_report_summary(
        &self,
        ctx: &CallContext,
    ) -> Result<Option<StockReportSummaryDto>> {
        self.http
            .get(ctx, "/api/stock/summary", &QueryParams::new())
            .await
    }

    pub async fn stock_data(&self, ctx: &CallContext, sku: &str) -> Result<Option<ListingReportDto>> {
        self.http
            .get(ctx, &format!("/api/sku/{}", sku), &QueryParams::new())
            .await
    }
}
