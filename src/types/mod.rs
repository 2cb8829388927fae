//! 数据类型模块：客户 API 的请求与响应记录。
//!
//! # Types Module
//!
//! Request and response records exchanged with the customer API. Field names
//! are camelCase on the wire. Records the client only passes through keep any
//! fields it does not model in a flattened `extra` (or `fields`) map, so nothing
//! the server sends is lost on a round trip.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`customer`] | Registration, login, profile and pricing |
//! | [`order`] | Orders, packaging, couriers, listings and stock |
//! | [`account`] | Ledger, invoices, pagination and generic envelopes |

pub mod account;
pub mod customer;
pub mod order;

pub use account::{DateListDto, InvoiceDto, LedgerDto, PageDto, SuccessResponse};
pub use customer::{
    CustomerDto, CustomerUpdateRequest, LoginResponse, PasswordResetRequest,
    PasswordResetRequestRequest, PricingChangedResponse, PricingDto, RegistrationRequest,
    RegistrationResponse, SalesTickerResponse, UserNameAvailableResponse,
};
pub use order::{
    BookCourierRequest, CustomerOrderDto, CustomerOrderUpdateRequest, ListingReportDto,
    NewOrderRequest, PackagingQuantities, PackagingRequestDto, StockReportSummaryDto,
};
