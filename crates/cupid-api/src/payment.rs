use axum::{Json, extract::State};
use axum_extra::extract::WithRejection;
use tracing::{info, warn};

use cupid_crypto::signature::verify_payment_signature;
use cupid_types::api::{Ack, CreateOrderRequest, OrderResponse, VerifyPaymentRequest};

use crate::error::ApiError;
use crate::gateway::{NewOrder, OrderNotes};
use crate::pricing::{BundleType, DEFAULT_TIMEZONE, resolve_pricing, to_minor_units};
use crate::state::{AppState, db_call};

/// POST /payment/create-order: prices the bundle for the caller's region
/// and opens a gateway order with the valentine id as receipt.
pub async fn create_order(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<CreateOrderRequest>, ApiError>,
) -> Result<Json<OrderResponse>, ApiError> {
    let timezone = req
        .timezone
        .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
    let bundle = BundleType::parse_or_default(req.bundle_type.as_deref());
    let table = resolve_pricing(&timezone);
    let display_amount = table.price(bundle);

    let order = NewOrder {
        amount: to_minor_units(display_amount),
        currency: table.currency.to_string(),
        receipt: req.valentine_id,
        notes: OrderNotes {
            bundle_type: bundle.as_str().to_string(),
            timezone,
        },
    };

    let created = state.gateway.create_order(&order).await?;
    info!(
        "Order {} created for valentine {} ({} {})",
        created.id, order.receipt, created.amount, created.currency
    );

    Ok(Json(OrderResponse {
        order_id: created.id,
        amount: created.amount,
        currency: created.currency,
        bundle_type: bundle.as_str().to_string(),
        display_amount,
    }))
}

/// POST /payment/verify: checks the checkout signature, then marks the
/// valentine paid. Nothing is written when the signature is wrong.
///
/// The update is a plain assignment: it does not require the valentine to
/// exist or to still be pending, so replaying a valid callback is harmless.
pub async fn verify_payment(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<VerifyPaymentRequest>, ApiError>,
) -> Result<Json<Ack>, ApiError> {
    let valid = verify_payment_signature(
        &state.payment_secret,
        &req.razorpay_order_id,
        &req.razorpay_payment_id,
        &req.razorpay_signature,
    )?;

    if !valid {
        warn!(
            "Rejected payment signature for order {} (valentine {})",
            req.razorpay_order_id, req.valentine_id
        );
        return Err(ApiError::InvalidSignature);
    }

    let valentine_id = req.valentine_id.clone();
    let payment_id = req.razorpay_payment_id.clone();
    let updated =
        db_call(&state, move |db| db.mark_valentine_paid(&valentine_id, &payment_id)).await?;

    if updated == 0 {
        warn!(
            "Verified payment {} references unknown valentine {}",
            req.razorpay_payment_id, req.valentine_id
        );
    } else {
        info!(
            "Payment {} verified for valentine {}",
            req.razorpay_payment_id, req.valentine_id
        );
    }

    Ok(Json(Ack::new("Payment verified successfully")))
}
