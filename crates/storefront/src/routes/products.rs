//! Product route handlers.
//!
//! The product page renders in two phases. The product itself (with the
//! variant the API resolved for the requested options) is awaited; the full
//! variant list is spawned and streamed in afterwards to correct the option
//! picker's availability.

use askama::Template;
use axum::{
    Form,
    extract::{OriginalUri, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use impact_core::cart::CartFormInput;
use impact_core::types::{Image, ProductVariant};
use impact_core::variant::{
    ProductLocation, SelectedOptions, SelectionController, VariantCatalog, VariantOption,
};
use serde::Deserialize;
use tracing::instrument;

use crate::deferred::{Deferred, DeferredChunk, streamed_html};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::CspNonce;
use crate::shopify::types::Product;
use crate::shopify::{ShopifyError, StorefrontClient};
use crate::state::AppState;

use super::{found, render};

/// Element id of the option picker and add-to-cart section.
pub const PRODUCT_FORM_TARGET: &str = "product-form";

/// Inline message when the full variant list cannot be loaded.
pub const VARIANTS_ERROR: &str = "There was a problem loading product variants";

/// Image display data for templates.
#[derive(Clone)]
pub struct ImageView {
    pub url: String,
    pub alt: String,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

impl From<&Image> for ImageView {
    fn from(image: &Image) -> Self {
        Self {
            url: image.url.clone(),
            alt: image.alt_text.clone().unwrap_or_default(),
            width: image.width,
            height: image.height,
        }
    }
}

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub handle: String,
    pub title: String,
    pub vendor: String,
    pub description_html: String,
    pub seo_title: String,
    pub seo_description: String,
    pub image: Option<ImageView>,
    pub gallery: Vec<ImageView>,
}

/// Price block for the selected variant.
#[derive(Clone)]
pub struct PriceView {
    pub price: String,
    pub compare_at_price: Option<String>,
}

impl ProductView {
    fn new(product: &Product, selected_variant: Option<&ProductVariant>) -> Self {
        let image = selected_variant
            .and_then(|variant| variant.image.as_ref())
            .or_else(|| product.images.first())
            .map(ImageView::from);

        Self {
            handle: product.handle.clone(),
            title: product.title.clone(),
            vendor: product.vendor.clone(),
            description_html: product.description_html.clone(),
            seo_title: product
                .seo
                .title
                .clone()
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| product.title.clone()),
            seo_description: product
                .seo
                .description
                .clone()
                .filter(|description| !description.is_empty())
                .unwrap_or_else(|| product.description.clone()),
            image,
            gallery: product.images.iter().map(ImageView::from).collect(),
        }
    }
}

impl From<&ProductVariant> for PriceView {
    fn from(variant: &ProductVariant) -> Self {
        Self {
            price: variant.price.display(),
            compare_at_price: variant
                .is_on_sale()
                .then(|| variant.compare_at_price.as_ref().map(|money| money.display()))
                .flatten(),
        }
    }
}

/// Product detail page shell.
#[derive(Template)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
    pub price: Option<PriceView>,
    pub sku: Option<String>,
    /// Pre-rendered option picker and add-to-cart form.
    pub product_form: String,
}

/// Option picker plus add-to-cart form.
#[derive(Template)]
#[template(path = "partials/product_form.html")]
pub struct ProductFormTemplate {
    pub target: &'static str,
    /// Action for the option forms: the POST endpoint with the current query.
    pub action: String,
    pub options: Vec<VariantOption>,
    pub cart_input: Option<String>,
    pub can_add_to_cart: bool,
}

impl ProductFormTemplate {
    fn new(controller: &SelectionController, catalog: &VariantCatalog) -> Self {
        let location = controller.location();
        let action = match location.search() {
            "" => format!("{}/options", location.product_path()),
            search => format!("{}/options?{search}", location.product_path()),
        };

        let cart_input = controller.selected_variant().and_then(|variant| {
            CartFormInput::add_variant(variant)
                .to_json()
                .map_err(|e| tracing::error!(error = %e, "Failed to encode cart form input"))
                .ok()
        });

        Self {
            target: PRODUCT_FORM_TARGET,
            action,
            options: controller.option_values(catalog),
            cart_input,
            can_add_to_cart: controller.can_add_to_cart(),
        }
    }
}

/// Inline error in place of the product form.
#[derive(Template)]
#[template(path = "partials/deferred_error.html")]
pub struct DeferredErrorTemplate {
    pub target: &'static str,
    pub message: &'static str,
}

/// Form posted by the option picker.
#[derive(Debug, Deserialize)]
pub struct OptionForm {
    pub option: String,
    pub value: String,
}

/// Display product detail page.
///
/// - A product whose first variant is the "Default Title" placeholder shows
///   that variant.
/// - A request with no option parameters is redirected (`302`) to the first
///   variant's URL.
/// - Otherwise the page shows whatever the API resolved for the requested
///   options, which may be nothing ("Sold out").
#[instrument(skip(state, uri, nonce))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    OriginalUri(uri): OriginalUri,
    nonce: CspNonce,
) -> Result<Response> {
    if handle.is_empty() {
        return Err(AppError::Internal(
            "Expected product handle to be defined".to_string(),
        ));
    }

    let query = uri.query().unwrap_or_default();
    let location = ProductLocation::new(handle.as_str(), uri.path(), query);
    let requested = SelectedOptions::from_query(query);

    let product = load_product(state.storefront(), &handle, &requested).await?;

    let selected_variant = match product.first_variant.as_ref() {
        Some(first) if first.is_default_title() => Some(first.clone()),
        Some(first) if requested.retain_known(&product.options).is_empty() => {
            tracing::debug!("No options requested, redirecting to first variant");
            return Ok(found(&location.variant_url(&first.selected_options)));
        }
        _ => product.selected_variant.clone(),
    };

    let variants = spawn_variants(state.storefront().clone(), handle.clone());

    add_breadcrumb(
        "navigation",
        "Viewed product page",
        Some(&[("handle", handle.as_str())]),
    );

    let controller = SelectionController::new(location, product.options.clone(), selected_variant);
    let partial = VariantCatalog::partial(
        product
            .first_variant
            .iter()
            .chain(controller.selected_variant()),
    )
    .map_err(ShopifyError::from)?;

    let shell = render(&ProductShowTemplate {
        product: ProductView::new(&product, controller.selected_variant()),
        price: controller.selected_variant().map(PriceView::from),
        sku: controller
            .selected_variant()
            .and_then(|variant| variant.sku.clone()),
        product_form: render(&ProductFormTemplate::new(&controller, &partial))?,
    })?;

    Ok(streamed_html(shell, async move {
        let content = complete_product_form(&controller, variants).await;
        DeferredChunk {
            target: PRODUCT_FORM_TARGET,
            nonce: nonce.value(),
            content: &content,
        }
        .to_html()
    }))
}

/// Handle an option change from the picker form.
///
/// Answers `303 See Other` to the canonical URL for the new selection. An
/// option the product does not have leaves the selection as it was.
#[instrument(skip(state, uri))]
pub async fn select_option(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    OriginalUri(uri): OriginalUri,
    Form(form): Form<OptionForm>,
) -> Result<Response> {
    if handle.is_empty() {
        return Err(AppError::Internal(
            "Expected product handle to be defined".to_string(),
        ));
    }

    let query = uri.query().unwrap_or_default();
    let requested = SelectedOptions::from_query(query);
    let product = load_product(state.storefront(), &handle, &requested).await?;

    let location = ProductLocation::new(handle.as_str(), uri.path(), query);
    let mut controller = SelectionController::new(
        location,
        product.options.clone(),
        product.selected_variant.clone(),
    );

    let target = match controller.select(&form.option, &form.value) {
        Some(navigation) => navigation.to,
        None => {
            tracing::debug!(option = %form.option, "Unknown option, keeping selection");
            controller
                .location()
                .variant_url(controller.selection())
        }
    };

    Ok(Redirect::to(&target).into_response())
}

/// Fetch a product, mapping a missing handle to an empty `404`.
async fn load_product(
    storefront: &StorefrontClient,
    handle: &str,
    requested: &SelectedOptions,
) -> Result<Product> {
    match storefront.product(handle, requested).await {
        Ok(product) => Ok(product),
        Err(ShopifyError::NotFound(_)) => Err(AppError::NotFound(String::new())),
        Err(e) => Err(e.into()),
    }
}

fn spawn_variants(
    storefront: StorefrontClient,
    handle: String,
) -> Deferred<std::result::Result<Vec<ProductVariant>, ShopifyError>> {
    Deferred::spawn(async move { storefront.product_variants(&handle).await })
}

/// Render the product form against the full variant list, or the inline
/// error if it could not be loaded.
async fn complete_product_form(
    controller: &SelectionController,
    variants: Deferred<std::result::Result<Vec<ProductVariant>, ShopifyError>>,
) -> String {
    let catalog = match variants.resolve().await {
        Ok(Ok(variants)) => VariantCatalog::complete(variants).map_err(ShopifyError::from),
        Ok(Err(e)) => Err(e),
        Err(e) => {
            tracing::error!(error = %e, "Variant task failed");
            return variants_error();
        }
    };

    match catalog {
        Ok(catalog) => ProductFormTemplate::new(controller, &catalog)
            .render()
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "Failed to render product form");
                variants_error()
            }),
        Err(e) => {
            let event_id = sentry::capture_error(&e);
            tracing::error!(error = %e, sentry_event_id = %event_id, "Failed to load product variants");
            variants_error()
        }
    }
}

fn variants_error() -> String {
    DeferredErrorTemplate {
        target: PRODUCT_FORM_TARGET,
        message: VARIANTS_ERROR,
    }
    .render()
    .unwrap_or_else(|_| VARIANTS_ERROR.to_string())
}
