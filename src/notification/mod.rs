//! Delivery clients for the external push endpoint.
//!
//! The relay talks to the push-delivery service through the `PushClient`
//! trait defined in `core`, so the concrete HTTP client here can be swapped
//! out for a fake in tests.
pub mod expo;
