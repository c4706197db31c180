pub mod fields;
pub mod mpesa;
pub mod rules;
