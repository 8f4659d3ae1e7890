mod countdown_tests;
mod session_tests;
