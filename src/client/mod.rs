//! Client-side pieces: the reset-password form model and the HTTP calls it
//! makes against the backend.

pub mod api;
pub mod password_reset_form;

pub use api::{ApiFailure, HttpResetPasswordApi, ResetPasswordApi};
pub use password_reset_form::{Navigator, PasswordResetForm};
