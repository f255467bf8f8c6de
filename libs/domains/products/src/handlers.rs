//! HTTP handlers for the product catalog

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestPathResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
    ParsedPath, ValidatedJson,
};
use database::Repository;
use sea_orm::DbErr;
use tracing::info;
use utoipa::OpenApi;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductInput};
use crate::repository::ProductRepository;
use crate::unit_of_work::{UnitOfWork, UnitOfWorkFactory};

/// OpenAPI documentation for the products endpoints
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        list_available_products,
        get_product,
        update_product,
        delete_product,
        list_product_range,
    ),
    components(
        schemas(Product, ProductInput),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestPathResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Products router; every request gets its own unit of work from `factory`
pub fn router<F: UnitOfWorkFactory>(factory: F) -> Router {
    Router::new()
        .route("/", get(list_products::<F>).post(create_product::<F>))
        .route("/available", get(list_available_products::<F>))
        .route(
            "/{id}",
            get(get_product::<F>)
                .put(update_product::<F>)
                .delete(delete_product::<F>),
        )
        .route("/{start}/{count}", get(list_product_range::<F>))
        .with_state(factory)
}

/// 200 with the list, or 204 when there is nothing to return
fn collection(products: Vec<Product>) -> Response {
    if products.is_empty() {
        StatusCode::NO_CONTENT.into_response()
    } else {
        Json(products).into_response()
    }
}

/// List all products
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    responses(
        (status = 200, description = "All products in id order", body = Vec<Product>),
        (status = 204, description = "No products"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<F: UnitOfWorkFactory>(
    State(factory): State<F>,
) -> ProductResult<Response> {
    let uow = factory.begin();
    let products = uow.products().get_all().await?;
    Ok(collection(products))
}

/// Create a product
///
/// The id may be supplied by the client; otherwise the store assigns one.
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = ProductInput,
    responses(
        (status = 201, description = "Product created", body = Product,
            headers(("Location" = String, description = "URI of the new product"))),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<F: UnitOfWorkFactory>(
    State(factory): State<F>,
    ValidatedJson(input): ValidatedJson<ProductInput>,
) -> ProductResult<Response> {
    let uow = factory.begin();

    uow.products().add(input).await?;
    let product = uow
        .save()
        .await?
        .inserted
        .into_iter()
        .next()
        .ok_or(DbErr::RecordNotInserted)?;

    info!(product_id = product.id, "Product created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/products/{}", product.id))],
        Json(product),
    )
        .into_response())
}

/// List products that are available
#[utoipa::path(
    get,
    path = "/available",
    tag = "Products",
    responses(
        (status = 200, description = "Available products in id order", body = Vec<Product>),
        (status = 204, description = "No product is available"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_available_products<F: UnitOfWorkFactory>(
    State(factory): State<F>,
) -> ProductResult<Response> {
    let uow = factory.begin();
    let products = uow.products().get_available_products().await?;
    Ok(collection(products))
}

/// Get a product by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestPathResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<F: UnitOfWorkFactory>(
    State(factory): State<F>,
    ParsedPath(id): ParsedPath<i32>,
) -> ProductResult<Json<Product>> {
    let uow = factory.begin();
    let product = uow
        .products()
        .get_by_id(id)
        .await?
        .ok_or(ProductError::NotFound(id))?;
    Ok(Json(product))
}

/// Replace a product
///
/// The route id wins over any id in the body.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product id")
    ),
    request_body = ProductInput,
    responses(
        (status = 204, description = "Product replaced"),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<F: UnitOfWorkFactory>(
    State(factory): State<F>,
    ParsedPath(id): ParsedPath<i32>,
    ValidatedJson(input): ValidatedJson<ProductInput>,
) -> ProductResult<StatusCode> {
    let uow = factory.begin();

    uow.products().update_product(input.into_product(id)).await?;
    uow.save().await.map_err(|e| e.or_not_found(id))?;

    info!(product_id = id, "Product updated");
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product id")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, response = BadRequestPathResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<F: UnitOfWorkFactory>(
    State(factory): State<F>,
    ParsedPath(id): ParsedPath<i32>,
) -> ProductResult<StatusCode> {
    let uow = factory.begin();

    if !uow.products().delete(id).await? {
        return Err(ProductError::NotFound(id));
    }
    uow.save().await?;

    info!(product_id = id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// List `count` products after skipping `start`
#[utoipa::path(
    get,
    path = "/{start}/{count}",
    tag = "Products",
    params(
        ("start" = u64, Path, description = "Products to skip"),
        ("count" = u64, Path, description = "Maximum products to return")
    ),
    responses(
        (status = 200, description = "Products in id order", body = Vec<Product>),
        (status = 204, description = "Nothing in range"),
        (status = 400, response = BadRequestPathResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_product_range<F: UnitOfWorkFactory>(
    State(factory): State<F>,
    ParsedPath((start, count)): ParsedPath<(u64, u64)>,
) -> ProductResult<Response> {
    // SQL OFFSET/LIMIT are signed 64-bit
    let limit = i64::MAX as u64;
    if start > limit || count > limit {
        return Err(ProductError::Validation(format!(
            "start and count must not exceed {limit}"
        )));
    }

    let uow = factory.begin();
    let products = uow.products().get_many(start, count).await?;
    Ok(collection(products))
}
