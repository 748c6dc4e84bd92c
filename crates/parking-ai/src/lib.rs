//! Discount coupon allocation engine for parking management portal automation.
//!
//! The surrounding system logs into third-party parking portals, looks up a
//! vehicle, and redeems discount coupons on its behalf. This crate owns the
//! decision-making half of that system: given a tenant's coupon catalog, the
//! vehicle's usage history, and the coupons currently in stock, it computes
//! which coupons to apply so the tenant's target discount duration is met or
//! exceeded. Browser scripting, credential handling, and notification
//! delivery stay behind the [`workflows::redemption::PortalGateway`] and
//! [`workflows::redemption::CouponExecutor`] seams.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod tenants;
pub mod workflows;
