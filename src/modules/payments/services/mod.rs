pub mod mercadopago;
pub mod payment_service;
pub mod provider;

pub use mercadopago::MercadoPagoProvider;
pub use payment_service::PaymentService;
pub use provider::{ChargeRequest, ChargeResponse, ChargeStatus, PaymentEvent, PaymentProvider};
