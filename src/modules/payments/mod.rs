// Payment provider integration: deposit checkout and paid-evidence webhooks.

pub mod controllers;
pub mod services;

pub use services::{
    ChargeRequest, ChargeResponse, ChargeStatus, MercadoPagoProvider, PaymentEvent,
    PaymentProvider, PaymentService,
};
