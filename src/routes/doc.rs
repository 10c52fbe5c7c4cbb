use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    cart::{AppliedCoupon, Cart, CartItem},
    dto::{
        auth::{LoginRequest, LoginResponse},
        cart::{AddCartItemRequest, ApplyCouponRequest, CartLine, CartView, UpdateCartItemRequest},
        coupons::{CouponList, UpsertCouponRequest},
        orders::{CheckoutRequest, OrderConfirmation, OrderList},
        products::{CreateProductRequest, ProductList, ProductView},
    },
    models::{Admin, Coupon, Order, Product},
    pricing::CartTotals,
    response::{ApiResponse, Meta},
    routes::{admin, auth, cart, health, orders, params, products},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::readiness,
        products::list_products,
        products::get_product,
        cart::create_cart,
        cart::get_cart,
        cart::add_item,
        cart::update_item,
        cart::remove_item,
        cart::apply_coupon,
        cart::remove_coupon,
        cart::checkout,
        orders::get_order,
        auth::login,
        auth::logout,
        auth::me,
        admin::list_products,
        admin::create_product,
        admin::delete_product,
        admin::list_coupons,
        admin::upsert_coupon,
        admin::delete_coupon,
        admin::list_orders
    ),
    components(
        schemas(
            Admin,
            Product,
            ProductView,
            ProductList,
            CreateProductRequest,
            Coupon,
            CouponList,
            UpsertCouponRequest,
            Cart,
            CartItem,
            AppliedCoupon,
            CartLine,
            CartView,
            CartTotals,
            AddCartItemRequest,
            UpdateCartItemRequest,
            ApplyCouponRequest,
            CheckoutRequest,
            OrderConfirmation,
            Order,
            OrderList,
            LoginRequest,
            LoginResponse,
            params::Pagination,
            params::ProductQuery,
            params::SortOrder,
            params::ProductSortBy,
            Meta,
            ApiResponse<ProductView>,
            ApiResponse<ProductList>,
            ApiResponse<CartView>,
            ApiResponse<OrderConfirmation>,
            ApiResponse<OrderList>,
            ApiResponse<CouponList>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and readiness"),
        (name = "Products", description = "Catalog"),
        (name = "Cart", description = "Shopper carts and coupons"),
        (name = "Orders", description = "Checkout and order confirmation"),
        (name = "Auth", description = "Admin sign-in"),
        (name = "Admin", description = "Catalog, coupon and order administration"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
