mod generator_tests;
mod service_tests;
