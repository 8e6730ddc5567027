//! Payment link issuance and tracking.

pub mod engine;

pub use engine::{
    validate_link_request, CheckoutRequest, LinkEngine, PaymentLinkRecord, PaymentLinkRequest,
};
