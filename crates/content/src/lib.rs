//! `promostore-content` — landing-page content domain.
//!
//! Hero carousel images (explicit ordering), service blurbs, social links,
//! and contact-form messages. Pure domain logic; persistence and SMTP live in
//! `promostore-infra`.

pub mod contact;
pub mod hero;
pub mod service;
pub mod social;

pub use contact::ContactMessage;
pub use hero::{order_assignments, HeroImage};
pub use service::{NewService, Service, ServiceUpdate};
pub use social::SocialLink;
