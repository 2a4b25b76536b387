// Application layer - Use case services over the record backend
pub mod pool_service;
pub mod reading_repository;
pub mod reading_service;
pub mod streaming_service;
pub mod treatment_service;

#[cfg(test)]
pub mod test_support;
