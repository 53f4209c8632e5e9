mod client;
mod types;

pub use client::{RegistrationClient, RegistrationTransport};
pub use types::{
    FailureKind, RegistrationError, RegistrationForm, RegistrationReceipt, SelectedFile,
};
