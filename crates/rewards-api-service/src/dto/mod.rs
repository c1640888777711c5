//! 对外接口的请求与响应结构

pub mod request;
pub mod response;

pub use request::{
    BankDetailRequest, CancelOrderHttpRequest, ChangePasswordRequest, CompanyDetailRequest,
    OrderLineRequest, PlaceOrderHttpRequest, UpdateProfileRequest,
};
pub use response::{
    AdminOrderDto, AdminOrderListDto, ApiResponse, BankDetailDto, CompanyDetailDto,
    DashboardTotals, DealerDto, OrderActionDto, ProductDto, ProductOptionDto, ProfileDto,
};
