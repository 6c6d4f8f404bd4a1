//! Unit tests for SMS module

mod create_service_tests;
