mod create_dispatcher_tests;
mod expo_tests;
