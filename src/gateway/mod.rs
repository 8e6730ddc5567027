//! Payment provider clients.
//!
//! Pass-through wrappers over the providers' REST APIs with response
//! shaping only; amounts, states and ids are relayed, never recomputed.

pub mod phonepe;
pub mod razorpay;
pub mod types;

pub use phonepe::PhonePeClient;
pub use razorpay::{CreateLinkParams, RazorpayClient};
pub use types::{CallbackResult, CheckoutSession, OrderState, OrderStatus, PaymentLink};
