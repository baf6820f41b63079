pub mod appointments;
pub mod auth;
pub mod booking;
pub mod business;
pub mod catalog;
pub mod customers;
pub mod dashboard;
pub mod locations;
pub mod metrics;
pub mod schedule;
pub mod staff;
pub mod tenants;
