use utoipa::{OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub business_name: String,
}

#[derive(ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema)]
pub struct VendorUpdateRequest {
    pub name: Option<String>,
    pub business_name: Option<String>,
}

#[derive(ToSchema)]
pub struct RegisterCustomerRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(ToSchema)]
pub struct CustomerUpdateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(ToSchema)]
pub struct CreateCardRequest {
    pub customer_id: String,
    pub reward_threshold: i32,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::me,
        crate::routes::auth::update_me,
        crate::routes::customers::register,
        crate::routes::customers::all,
        crate::routes::customers::get,
        crate::routes::customers::update,
        crate::routes::customers::delete,
        crate::routes::loyalty_cards::create,
        crate::routes::loyalty_cards::list,
        crate::routes::loyalty_cards::get,
        crate::routes::loyalty_cards::punch,
        crate::routes::loyalty_cards::redeem,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            VendorUpdateRequest,
            RegisterCustomerRequest,
            CustomerUpdateRequest,
            CreateCardRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "customer"),
        (name = "loyaltyCard")
    )
)]
pub struct ApiDoc;
