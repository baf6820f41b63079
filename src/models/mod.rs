pub mod appointment;
pub mod auth;
pub mod business;
pub mod customer;
pub mod dashboard;
pub mod location;
pub mod schedule;
pub mod service;
pub mod staff;
pub mod tenant;
pub mod user;
