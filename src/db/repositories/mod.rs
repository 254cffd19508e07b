pub mod availability_repository;
pub mod meeting_repository;
