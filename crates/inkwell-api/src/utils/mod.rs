pub mod form;
pub mod ssrf_validation;
